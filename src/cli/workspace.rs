use anyhow::{Context as _, Result};
use dialoguer::{Confirm, Select};
use serde::Serialize;
use tabled::Tabled;

use slack_cmd::store::{CredentialStore, Registration};
use slack_cmd::types::Workspace;

use super::output::{print_info, print_output, print_success, print_warning};
use super::Context;

#[derive(Debug, Serialize, Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Domain")]
    domain: String,
}

impl WorkspaceRow {
    fn new(workspace: &Workspace, store: &CredentialStore) -> Self {
        Self {
            current: if store.is_current(workspace) { "*" } else { "" }.to_string(),
            name: workspace.name.clone(),
            id: workspace.id.clone(),
            domain: workspace.domain.clone(),
        }
    }
}

/// Validate `token` against the API, confirm, then add or overwrite its workspace
pub async fn add_token(ctx: &Context, token: &str, yes: bool) -> Result<()> {
    let client = ctx.client(token)?;
    let workspace = client
        .team_info()
        .await
        .context("Failed to validate token")?;

    let mut store = ctx.load_store()?;
    let prompt = match store.find(&workspace.id) {
        Some(_) => format!("Are you sure to overwrite workspace {}?", workspace.name),
        None => format!("Are you sure to add workspace {}?", workspace.name),
    };
    if !yes && !Confirm::new().with_prompt(prompt).default(false).interact()? {
        print_info("Operation cancelled.");
        return Ok(());
    }

    let name = workspace.name.clone();
    let outcome = store.register_or_update(workspace);
    ctx.save_store(&store)?;

    match outcome {
        Registration::Added => print_success(&format!("Workspace {} registered.", name)),
        Registration::Updated => print_success(&format!("Workspace {} updated.", name)),
    }
    Ok(())
}

/// Make another registered workspace current, by argument or by prompt
pub fn switch(ctx: &Context, target: Option<&str>) -> Result<()> {
    let mut store = ctx.load_store()?;
    if store.workspaces.is_empty() {
        print_info("No workspace is registered.");
        return Ok(());
    }

    let name = match target {
        Some(target) => store.switch_current(target)?.name.clone(),
        None => match select_workspace(&store)? {
            Some(index) => store.switch_to_index(index)?.name.clone(),
            None => {
                print_info("Operation cancelled.");
                return Ok(());
            }
        },
    };

    ctx.save_store(&store)?;
    print_success(&format!("Switched to {}", name));
    Ok(())
}

fn select_workspace(store: &CredentialStore) -> Result<Option<usize>> {
    let (current_name, _) = store.resolve_current();
    let default = store
        .workspaces
        .iter()
        .position(|w| store.is_current(w))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(format!(
            "Current workspace is \"{}\". Select workspace",
            current_name
        ))
        .items(&store.list_names())
        .default(default)
        .interact_opt()?;
    Ok(selection)
}

/// Registered workspaces in stored order; tokens are never shown
pub fn list(ctx: &Context) -> Result<()> {
    let store = ctx.load_store()?;
    if store.workspaces.is_empty() {
        print_info("No workspace is registered.");
        return Ok(());
    }
    if store.current().is_none() {
        print_warning("The current token does not belong to any registered workspace.");
    }

    let rows: Vec<WorkspaceRow> = store
        .workspaces
        .iter()
        .map(|workspace| WorkspaceRow::new(workspace, &store))
        .collect();
    print_output(&rows, ctx.format)
}
