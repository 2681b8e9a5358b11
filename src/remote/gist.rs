//! Gist-backed remote document
//!
//! `GET /gists/{id}` returns the gist with a `files` map; the snapshot lives
//! as text in one named file. `PATCH /gists/{id}` with
//! `{"files": {"<name>": {"content": "..."}}}` replaces that file wholesale.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::RemoteDocument;
use crate::config::RemoteSettings;
use crate::error::SyncError;
use crate::store::Snapshot;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct GistDocument {
    #[serde(default)]
    files: HashMap<String, Option<GistFile>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct GistFile {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct GistPatch<'a> {
    files: HashMap<&'a str, GistFile>,
}

#[derive(Clone, Debug)]
pub struct GistClient {
    client: Client,
    url: Url,
    file_name: String,
    token: String,
}

impl GistClient {
    pub fn new(settings: &RemoteSettings, token: String) -> Result<Self, SyncError> {
        let url = settings.gist_url()?;
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            client,
            url,
            file_name: settings.file_name.clone(),
            token,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("post-ignorer/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn auth_header(&self) -> Result<HeaderValue, SyncError> {
        HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| SyncError::InvalidCredential)
    }

    async fn check(resp: Response) -> Result<Response, SyncError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(SyncError::Status { status, body })
    }
}

#[async_trait]
impl RemoteDocument for GistClient {
    async fn fetch(&self) -> Result<Snapshot, SyncError> {
        let resp = self
            .client
            .get(self.url.clone())
            .header(AUTHORIZATION, self.auth_header()?)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;
        let bytes = Self::check(resp).await?.bytes().await?;

        let gist: GistDocument = serde_json::from_slice(&bytes)?;
        let content = gist
            .files
            .get(&self.file_name)
            .and_then(|file| file.as_ref())
            .and_then(|file| file.content.as_deref())
            .ok_or_else(|| SyncError::MissingFile(self.file_name.clone()))?;

        Ok(serde_json::from_str(content)?)
    }

    async fn write(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        let body = GistPatch {
            files: HashMap::from([(
                self.file_name.as_str(),
                GistFile {
                    content: Some(content),
                },
            )]),
        };

        let resp = self
            .client
            .patch(self.url.clone())
            .header(AUTHORIZATION, self.auth_header()?)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RemoteSettings {
        RemoteSettings::new("https://api.example.com", "abc123", "list.json").unwrap()
    }

    #[test]
    fn test_url_points_at_gist() {
        let client = GistClient::new(&settings(), "tok".into()).unwrap();
        assert_eq!(client.url().as_str(), "https://api.example.com/gists/abc123");
    }

    #[test]
    fn test_auth_header_is_bearer() {
        let client = GistClient::new(&settings(), "tok".into()).unwrap();
        let header = client.auth_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer tok");
    }

    #[test]
    fn test_control_characters_in_token_are_rejected() {
        let client = GistClient::new(&settings(), "bad\ntoken".into()).unwrap();
        assert!(matches!(
            client.auth_header(),
            Err(SyncError::InvalidCredential)
        ));
    }

    #[test]
    fn test_patch_body_shape() {
        let body = GistPatch {
            files: HashMap::from([(
                "list.json",
                GistFile {
                    content: Some("{}".into()),
                },
            )]),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"files": {"list.json": {"content": "{}"}}}));
    }

    #[test]
    fn test_deleted_file_entry_parses_as_none() {
        let gist: GistDocument =
            serde_json::from_str(r#"{"id":"abc","files":{"list.json":null}}"#).unwrap();
        assert!(gist.files["list.json"].is_none());
    }
}
