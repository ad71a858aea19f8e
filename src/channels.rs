//! Collects the channels a token's owner has joined.
//!
//! Four listing endpoints are queried one after another and merged by id
//! (first occurrence wins), keeping only joined channels and direct
//! messages. Direct messages are then named after their peer using the
//! member directory, which is a hard requirement of the whole pass.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::api::ListingEndpoint;
use crate::error::{Error, Result};
use crate::types::{Channel, User};

/// Name given to a direct message whose peer is missing from the directory
pub const UNKNOWN_PEER_NAME: &str = "Direct Message to ???";

/// Read-only view of the API the aggregator needs
#[allow(async_fn_in_trait)]
pub trait ChannelSource {
    async fn list_channels(&self, endpoint: ListingEndpoint) -> Result<Vec<Channel>>;

    async fn list_members(&self) -> Result<Vec<User>>;
}

/// Member directory used as a lookup table keyed by user id
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: Vec<User>,
}

impl Directory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn user_name(&self, id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .map(|user| user.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Channels kept so far, each id admitted at most once
#[derive(Debug, Default)]
struct JoinedChannels {
    seen: HashSet<String>,
    channels: Vec<Channel>,
}

impl JoinedChannels {
    /// Admit a record unless its id is already present or it is not joined.
    /// Returns whether it was kept.
    fn insert_if_absent(&mut self, channel: Channel) -> bool {
        if !channel.is_joined() || self.seen.contains(&channel.id) {
            return false;
        }
        self.seen.insert(channel.id.clone());
        self.channels.push(channel);
        true
    }

    fn into_vec(self) -> Vec<Channel> {
        self.channels
    }
}

/// Merge per-endpoint batches given in query order, then name direct messages.
///
/// The returned order carries no meaning.
pub fn merge_listings<I>(batches: I, directory: &Directory) -> Vec<Channel>
where
    I: IntoIterator<Item = Vec<Channel>>,
{
    let mut joined = JoinedChannels::default();
    for batch in batches {
        for channel in batch {
            let id = channel.id.clone();
            if !joined.insert_if_absent(channel) {
                debug!(channel_id = %id, "skipping duplicate or unjoined channel");
            }
        }
    }

    joined
        .into_vec()
        .into_iter()
        .map(|channel| name_direct_message(channel, directory))
        .collect()
}

fn name_direct_message(mut channel: Channel, directory: &Directory) -> Channel {
    if !channel.is_direct_message {
        return channel;
    }
    channel.name = channel
        .peer()
        .and_then(|peer| directory.user_name(peer))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_PEER_NAME.to_string());
    channel
}

/// Fetch every listing endpoint and the member directory, returning the
/// deduplicated set of joined channels. Any failed call aborts the pass.
pub async fn collect_joined_channels<S: ChannelSource>(source: &S) -> Result<Vec<Channel>> {
    let mut batches = Vec::with_capacity(ListingEndpoint::ALL.len());
    for endpoint in ListingEndpoint::ALL {
        let records = source.list_channels(endpoint).await.inspect_err(|err| {
            warn!(endpoint = endpoint.method(), error = %err, "listing channels failed");
        })?;
        debug!(endpoint = endpoint.method(), count = records.len(), "listed channels");
        batches.push(records);
    }

    let users = source.list_members().await.map_err(|err| {
        warn!(error = %err, "fetching member directory failed");
        Error::Directory(Box::new(err))
    })?;
    let directory = Directory::new(users);
    debug!(members = directory.len(), "naming direct messages");

    Ok(merge_listings(batches, &directory))
}

/// Find a channel by id, falling back to the first whose name matches
pub fn find_channel<'a>(channels: &'a [Channel], name_or_id: &str) -> Result<&'a Channel> {
    channels
        .iter()
        .find(|channel| channel.id == name_or_id)
        .or_else(|| channels.iter().find(|channel| channel.name == name_or_id))
        .ok_or_else(|| Error::ChannelNotFound(name_or_id.to_string()))
}
