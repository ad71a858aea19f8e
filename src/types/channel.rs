use serde::{Deserialize, Serialize};

use super::null_to_default;

/// Free-text purpose attached to a channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purpose {
    #[serde(default)]
    pub value: String,
}

/// Conversation record from any of the listing endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub members: Vec<String>,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub purpose: Purpose,
    #[serde(rename = "is_im", default)]
    pub is_direct_message: bool,
    /// Peer of a direct message; absent on every other kind of channel
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub peer_user_id: Option<String>,
}

impl Channel {
    /// Whether the token's owner can post here
    pub fn is_joined(&self) -> bool {
        self.is_member || self.is_direct_message
    }

    pub fn peer(&self) -> Option<&str> {
        if self.is_direct_message {
            self.peer_user_id.as_deref()
        } else {
            None
        }
    }

    /// One-line description used by the channel listing
    pub fn description(&self) -> String {
        if self.is_direct_message {
            format!("Direct message to {}.", self.name)
        } else {
            self.purpose.value.clone()
        }
    }
}

/// Body of a listing call. Which field is populated depends on the endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListing {
    #[serde(default, deserialize_with = "null_to_default")]
    pub channels: Vec<Channel>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub groups: Vec<Channel>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub ims: Vec<Channel>,
}

impl ChannelListing {
    /// The first non-empty of `channels`, `groups`, `ims`
    pub fn into_records(self) -> Vec<Channel> {
        if !self.channels.is_empty() {
            self.channels
        } else if !self.groups.is_empty() {
            self.groups
        } else {
            self.ims
        }
    }
}
