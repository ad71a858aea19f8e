use std::path::Path;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{ListingEndpoint, CHAT_POST_MESSAGE, DEFAULT_BASE_URL, FILES_UPLOAD, TEAM_INFO, USERS_LIST};
use crate::channels::ChannelSource;
use crate::error::{Error, Result};
use crate::types::*;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transport settings recognised by [`SlackClient::new`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Endpoint root, defaults to [`DEFAULT_BASE_URL`]
    pub base_url: Option<String>,
    /// Preconfigured HTTP client; `timeout` is ignored when this is set
    pub http: Option<Client>,
    /// Per-request timeout for the HTTP client built here
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }
}

/// Slack Web API client bound to one token
pub struct SlackClient {
    token: String,
    base_url: String,
    http: Client,
}

impl SlackClient {
    /// Create a new client. Fails on an empty token before any request is made.
    pub fn new(token: &str, config: ClientConfig) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::EmptyToken);
        }

        let http = match config.http {
            Some(http) => http,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = config.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|source| Error::Http {
                    operation: "client setup".to_string(),
                    source,
                })?
            }
        };

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token: token.to_string(),
            base_url,
            http,
        })
    }

    fn url(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    /// GET an API method and return the body once both status and `ok` check out
    pub async fn get(&self, operation: &str) -> Result<String> {
        debug!(operation, "GET");
        let request = self
            .authorized(self.http.get(self.url(operation)))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        self.send(operation, request).await
    }

    /// POST a form-encoded body to an API method
    pub async fn post(&self, operation: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!(operation, "POST");
        let request = self
            .authorized(self.http.post(self.url(operation)))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .form(form);
        self.send(operation, request).await
    }

    /// POST a multipart body carrying one file part plus string fields
    pub async fn post_multipart(
        &self,
        operation: &str,
        file_name: String,
        contents: Vec<u8>,
        fields: Vec<(String, String)>,
    ) -> Result<String> {
        debug!(operation, file_name = %file_name, bytes = contents.len(), "POST multipart");
        let mut form = Form::new().part("file", Part::bytes(contents).file_name(file_name));
        for (key, value) in fields {
            form = form.text(key, value);
        }
        let request = self
            .authorized(self.http.post(self.url(operation)))
            .multipart(form);
        self.send(operation, request).await
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<String> {
        let res = request.send().await.map_err(|source| Error::Http {
            operation: operation.to_string(),
            source,
        })?;

        let status = res.status();
        if status != StatusCode::OK {
            warn!(operation, %status, "unexpected response status");
            return Err(Error::Status {
                operation: operation.to_string(),
                status,
            });
        }

        let body = res.text().await.map_err(|source| Error::Http {
            operation: operation.to_string(),
            source,
        })?;
        check_envelope(operation, &body)?;
        Ok(body)
    }

    /// Identity of the workspace this token belongs to
    pub async fn team_info(&self) -> Result<Workspace> {
        let body = self.get(TEAM_INFO).await?;
        let info: TeamInfo = decode(TEAM_INFO, &body)?;
        let mut workspace = info.team;
        workspace.token = self.token.clone();
        Ok(workspace)
    }

    /// Every member of the workspace
    pub async fn list_members(&self) -> Result<Vec<User>> {
        let body = self.get(USERS_LIST).await?;
        let list: MemberList = decode(USERS_LIST, &body)?;
        debug!(count = list.members.len(), "fetched member directory");
        Ok(list.members)
    }

    /// Raw records from one listing endpoint
    pub async fn list_channels(&self, endpoint: ListingEndpoint) -> Result<Vec<Channel>> {
        let operation = endpoint.method();
        let body = self.get(operation).await?;
        let listing: ChannelListing = decode(operation, &body)?;
        Ok(listing.into_records())
    }

    /// Post a text message as the token's owner
    pub async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        self.post(
            CHAT_POST_MESSAGE,
            &[("channel", channel_id), ("text", text), ("as_user", "true")],
        )
        .await?;
        info!(channel_id, "message sent");
        Ok(())
    }

    /// Upload a local file into a channel
    pub async fn upload_file(
        &self,
        channel_id: &str,
        path: &Path,
        title: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let contents = tokio::fs::read(path).await.map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut fields = vec![
            ("channels".to_string(), channel_id.to_string()),
            ("token".to_string(), self.token.clone()),
        ];
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            fields.push(("title".to_string(), title.to_string()));
        }
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            fields.push(("initial_comment".to_string(), comment.to_string()));
        }

        self.post_multipart(FILES_UPLOAD, file_name, contents, fields)
            .await?;
        info!(channel_id, path = %path.display(), "file uploaded");
        Ok(())
    }
}

impl ChannelSource for SlackClient {
    async fn list_channels(&self, endpoint: ListingEndpoint) -> Result<Vec<Channel>> {
        SlackClient::list_channels(self, endpoint).await
    }

    async fn list_members(&self) -> Result<Vec<User>> {
        SlackClient::list_members(self).await
    }
}

/// Application-level check: the body must decode and carry `ok: true`
pub fn check_envelope(operation: &str, body: &str) -> Result<()> {
    let envelope: Envelope = decode(operation, body)?;
    if envelope.ok {
        Ok(())
    } else {
        warn!(operation, code = %envelope.error, "request rejected by Slack");
        Err(Error::Api {
            operation: operation.to_string(),
            code: envelope.error,
        })
    }
}

fn decode<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::Decode {
        operation: operation.to_string(),
        source,
    })
}
