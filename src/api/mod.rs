pub mod client;

pub use client::*;

/// Root of the Slack Web API
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

// Web API methods
pub const TEAM_INFO: &str = "team.info";
pub const USERS_LIST: &str = "users.list";
pub const CHAT_POST_MESSAGE: &str = "chat.postMessage";
pub const FILES_UPLOAD: &str = "files.upload";

/// Listing calls the channel aggregator queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingEndpoint {
    PublicChannels,
    Conversations,
    PrivateGroups,
    DirectMessages,
}

impl ListingEndpoint {
    /// Query order; earlier endpoints win when the same id shows up twice
    pub const ALL: [ListingEndpoint; 4] = [
        ListingEndpoint::PublicChannels,
        ListingEndpoint::Conversations,
        ListingEndpoint::PrivateGroups,
        ListingEndpoint::DirectMessages,
    ];

    pub fn method(self) -> &'static str {
        match self {
            ListingEndpoint::PublicChannels => "channels.list",
            ListingEndpoint::Conversations => "conversations.list",
            ListingEndpoint::PrivateGroups => "groups.list",
            ListingEndpoint::DirectMessages => "im.list",
        }
    }
}
