//! Local paths and remote endpoint settings

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_FILE_NAME: &str = "ignored_users.json";

/// Get the local store path
/// - macOS: ~/Library/Application Support/post-ignorer/store.db
/// - Linux: ~/.local/share/post-ignorer/store.db
/// - Windows: %APPDATA%/post-ignorer/store.db
pub fn default_db_path() -> Result<PathBuf> {
    let data = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data.join("post-ignorer").join("store.db"))
}

/// Where the shared remote document lives
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_base: Url,
    pub gist_id: String,
    pub file_name: String,
}

impl RemoteSettings {
    pub fn new(api_base: &str, gist_id: &str, file_name: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            api_base: Url::parse(api_base)?,
            gist_id: gist_id.trim().to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// `{api_base}/gists/{gist_id}`, keeping any path prefix on `api_base`
    pub fn gist_url(&self) -> Result<Url, url::ParseError> {
        let mut base = self.api_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("gists/{}", self.gist_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_exist() {
        // Should not panic
        let _ = default_db_path();
    }

    #[test]
    fn test_gist_url() {
        let settings = RemoteSettings::new(DEFAULT_API_BASE, "abc", DEFAULT_FILE_NAME).unwrap();
        assert_eq!(
            settings.gist_url().unwrap().as_str(),
            "https://api.github.com/gists/abc"
        );
    }

    #[test]
    fn test_gist_url_keeps_prefix() {
        let settings =
            RemoteSettings::new("https://ghe.example.com/api/v3", " abc ", DEFAULT_FILE_NAME)
                .unwrap();
        assert_eq!(
            settings.gist_url().unwrap().as_str(),
            "https://ghe.example.com/api/v3/gists/abc"
        );
    }

    #[test]
    fn test_invalid_base_is_rejected() {
        assert!(RemoteSettings::new("not a url", "abc", DEFAULT_FILE_NAME).is_err());
    }
}
