use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use slack_cmd::channels::{collect_joined_channels, find_channel};
use slack_cmd::types::Channel;

use super::output::{print_info, print_output, print_success};
use super::{Context, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct ChannelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Channel> for ChannelRow {
    fn from(channel: &Channel) -> Self {
        Self {
            name: channel.name.clone(),
            id: channel.id.clone(),
            description: channel.description(),
        }
    }
}

/// Channels and direct messages in the current workspace
pub async fn list(ctx: &Context) -> Result<()> {
    let (workspace, client) = ctx.current_client()?;
    let channels = collect_joined_channels(&client).await?;

    let mut rows: Vec<ChannelRow> = channels.iter().map(ChannelRow::from).collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    if matches!(ctx.format, OutputFormat::Table) {
        print_info(&format!("Channels you join in workspace {}", workspace));
    }
    print_output(&rows, ctx.format)
}

pub async fn message(ctx: &Context, channel: &str, text: &str) -> Result<()> {
    let (_, client) = ctx.current_client()?;
    let channels = collect_joined_channels(&client).await?;
    let target = find_channel(&channels, channel)?;

    print_info(&format!("Sending message to {}", target.name));
    client.send_message(&target.id, text).await?;
    print_success("Message successfully sent");
    Ok(())
}

pub async fn upload(
    ctx: &Context,
    channel: &str,
    path: &Path,
    title: Option<&str>,
    comment: Option<&str>,
) -> Result<()> {
    let (_, client) = ctx.current_client()?;
    let channels = collect_joined_channels(&client).await?;
    let target = find_channel(&channels, channel)?;

    print_info(&format!("Uploading {} to {}", path.display(), target.name));
    client.upload_file(&target.id, path, title, comment).await?;
    print_success("File upload completed.");
    Ok(())
}
