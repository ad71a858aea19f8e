//! slack-cmd - Slack Web API client for the terminal
//!
//! Registers workspace tokens, collects the channels a token's owner has
//! joined, sends messages and uploads files.

pub mod api;
pub mod channels;
pub mod error;
pub mod store;
pub mod types;

pub use api::client::{ClientConfig, SlackClient};
pub use error::{Error, Result};
pub use store::CredentialStore;
