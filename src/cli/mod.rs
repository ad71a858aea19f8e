pub mod channels;
pub mod completions;
pub mod output;
pub mod workspace;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};

use slack_cmd::api::{ClientConfig, SlackClient, DEFAULT_BASE_URL};
use slack_cmd::store::CredentialStore;

/// Slack CLI: register workspace tokens, list channels, send messages and upload files
#[derive(Parser, Debug)]
#[command(name = "slack-cmd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Credential store file (default: ~/.slack_uploader.toml)
    #[arg(long, env = "SLACK_CMD_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Slack Web API root
    #[arg(long, env = "SLACK_API_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a workspace token
    AddToken {
        /// Slack API token
        token: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Switch the current workspace
    Switch {
        /// Workspace id or name (prompts when omitted)
        workspace: Option<String>,
    },

    /// List registered workspaces
    Workspaces,

    /// List channels you can post to
    List,

    /// Send a message to a channel
    Message {
        /// Channel id or name
        channel: String,

        /// Message text
        text: String,
    },

    /// Upload a file to a channel
    Upload {
        /// Channel id or name
        channel: String,

        /// File to upload
        path: PathBuf,

        /// Title of the uploaded file
        #[arg(short, long)]
        title: Option<String>,

        /// Initial comment posted with the file
        #[arg(short = 'm', long)]
        comment: Option<String>,
    },

    /// Generate shell completions
    Completions(completions::CompletionsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table output
    #[default]
    Table,
    /// Plain output (minimal, for scripting)
    Plain,
}

/// Settings every command runs with, built once from the command line
pub struct Context {
    pub format: OutputFormat,
    store_path: Option<PathBuf>,
    base_url: String,
    timeout: Option<Duration>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            store_path: cli.store.clone(),
            base_url: cli.base_url.clone(),
            timeout: cli.timeout.map(Duration::from_secs),
        }
    }

    /// The store at `--store`, or the one in the home directory
    pub fn load_store(&self) -> Result<CredentialStore> {
        let store = match &self.store_path {
            Some(path) => CredentialStore::load_from(path)?,
            None => CredentialStore::load()?,
        };
        Ok(store)
    }

    pub fn save_store(&self, store: &CredentialStore) -> Result<()> {
        match &self.store_path {
            Some(path) => store.save_to(path)?,
            None => store.save()?,
        }
        Ok(())
    }

    pub fn client(&self, token: &str) -> Result<SlackClient> {
        let config = ClientConfig {
            base_url: Some(self.base_url.clone()),
            http: None,
            timeout: self.timeout,
        };
        Ok(SlackClient::new(token, config)?)
    }

    /// Client for the current workspace, with that workspace's name
    pub fn current_client(&self) -> Result<(String, SlackClient)> {
        let store = self.load_store()?;
        let (name, token) = store.resolve_current();
        let client = self
            .client(token)
            .context("No workspace token is registered. Run 'slack-cmd add-token <token>' first")?;
        Ok((name.to_string(), client))
    }
}

pub async fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli);
    match cli.command {
        Commands::AddToken { token, yes } => workspace::add_token(&ctx, &token, yes).await,
        Commands::Switch { workspace } => workspace::switch(&ctx, workspace.as_deref()),
        Commands::Workspaces => workspace::list(&ctx),
        Commands::List => channels::list(&ctx).await,
        Commands::Message { channel, text } => channels::message(&ctx, &channel, &text).await,
        Commands::Upload {
            channel,
            path,
            title,
            comment,
        } => channels::upload(&ctx, &channel, &path, title.as_deref(), comment.as_deref()).await,
        Commands::Completions(cmd) => completions::execute(cmd),
    }
}
