mod channel;
mod user;
mod workspace;

pub use channel::*;
pub use user::*;
pub use workspace::*;

use serde::{Deserialize, Deserializer, Serialize};

/// Envelope every Web API response carries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub error: String,
}

/// `team.info` response body
#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    pub team: Workspace,
}

/// `users.list` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberList {
    #[serde(default, deserialize_with = "null_to_default")]
    pub members: Vec<User>,
}

/// Treat an explicit `null` the same as a missing field
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
