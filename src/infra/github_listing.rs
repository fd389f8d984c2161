use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::app::ports::ListingPort;
use crate::common::error::{CatalogError, Result};
use crate::common::types::{DirectoryEntry, EntryKind};
use crate::config::SyncConfig;

const USER_AGENT: &str = concat!("design-catalog-sync/", env!("CARGO_PKG_VERSION"));

/// One item of the GitHub contents API response
#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default = "unknown_kind")]
    kind: EntryKind,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

fn unknown_kind() -> EntryKind {
    EntryKind::Other
}

impl From<ContentItem> for DirectoryEntry {
    fn from(item: ContentItem) -> Self {
        DirectoryEntry {
            name: item.name,
            kind: item.kind,
            content_url: non_empty(item.download_url).or_else(|| non_empty(item.html_url)),
        }
    }
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

/// Lists repository directories through the GitHub contents API.
pub struct GithubListing {
    client: reqwest::Client,
    api_base_url: String,
    owner: String,
    repo: String,
    branch: String,
    token: Option<String>,
}

impl GithubListing {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured client; timeouts and user agent are the caller's responsibility.
    pub fn with_client(client: reqwest::Client, config: &SyncConfig) -> Self {
        Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            owner: config.repo_owner.clone(),
            repo: config.repo_name.clone(),
            branch: config.branch.clone(),
            token: config.github_token.clone(),
        }
    }

    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base_url,
            self.owner,
            self.repo,
            path.trim_matches('/'),
            self.branch
        )
    }
}

#[async_trait]
impl ListingPort for GithubListing {
    #[instrument(skip(self), fields(owner = %self.owner, repo = %self.repo, branch = %self.branch))]
    async fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let url = self.contents_url(path);
        debug!(%url, "requesting directory listing");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CatalogError::transport(path, e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::transport(path, e.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::transport(
                path,
                format!("HTTP {}{}", status.as_u16(), api_message(&body)),
            ));
        }

        let entries = parse_listing(path, &body)?;
        info!(path, entries = entries.len(), "fetched directory listing");
        Ok(entries)
    }
}

/// Decode a contents API body. Anything other than a JSON array is an error,
/// which is what the API returns when `path` names a single file.
pub fn parse_listing(path: &str, body: &str) -> Result<Vec<DirectoryEntry>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CatalogError::transport(path, format!("invalid JSON: {}", e)))?;
    if !value.is_array() {
        return Err(CatalogError::transport(path, "unexpected response, expected a listing"));
    }
    let items: Vec<ContentItem> = serde_json::from_value(value)
        .map_err(|e| CatalogError::transport(path, format!("malformed listing entry: {}", e)))?;
    Ok(items.into_iter().map(DirectoryEntry::from).collect())
}

/// GitHub error bodies carry a `message`; surface it next to the status.
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_maps_urls_and_kinds() {
        let body = r#"[
            {"name": "panel.dxf", "type": "file",
             "download_url": "https://raw.githubusercontent.com/o/r/main/assets/files/panel.dxf",
             "html_url": "https://github.com/o/r/blob/main/assets/files/panel.dxf"},
            {"name": "big.pdf", "type": "file", "download_url": null,
             "html_url": "https://github.com/o/r/blob/main/assets/files/big.pdf"},
            {"name": "old", "type": "dir", "download_url": null,
             "html_url": "https://github.com/o/r/tree/main/assets/files/old"},
            {"name": "lib", "type": "submodule"}
        ]"#;

        let entries = parse_listing("assets/files", body).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(
            entries[0].content_url.as_deref(),
            Some("https://raw.githubusercontent.com/o/r/main/assets/files/panel.dxf")
        );
        assert_eq!(
            entries[1].content_url.as_deref(),
            Some("https://github.com/o/r/blob/main/assets/files/big.pdf")
        );
        assert_eq!(entries[2].kind, EntryKind::Dir);
        assert_eq!(entries[3].kind, EntryKind::Other);
        assert_eq!(entries[3].content_url, None);
    }

    #[test]
    fn test_empty_download_url_falls_back() {
        let body = r#"[
            {"name": "a.dxf", "type": "file", "download_url": "",
             "html_url": "https://github.com/o/r/blob/main/a.dxf"},
            {"name": "b.dxf", "type": "file", "download_url": "", "html_url": ""}
        ]"#;
        let entries = parse_listing("assets/files", body).unwrap();
        assert_eq!(
            entries[0].content_url.as_deref(),
            Some("https://github.com/o/r/blob/main/a.dxf")
        );
        assert_eq!(entries[1].content_url, None);
    }

    #[test]
    fn test_parse_listing_rejects_non_array() {
        let body = r#"{"name": "panel.dxf", "type": "file"}"#;
        let err = parse_listing("assets/files/panel.dxf", body).unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }));
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        assert!(parse_listing("assets/files", "<html>").is_err());
    }

    #[test]
    fn test_api_message() {
        assert_eq!(api_message(r#"{"message": "Not Found"}"#), ": Not Found");
        assert_eq!(api_message("oops"), "");
    }

    #[test]
    fn test_contents_url() {
        let config = SyncConfig {
            api_base_url: "https://api.github.com/".to_string(),
            ..SyncConfig::default()
        };
        let listing = GithubListing::new(&config).unwrap();
        assert_eq!(
            listing.contents_url("/assets/files/"),
            "https://api.github.com/repos/ayoubbadou18-jpg/laser-designs/contents/assets/files?ref=main"
        );
    }

    /// Answer one HTTP request with `status_line` and `body`, returning the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn listing_for(base_url: String) -> GithubListing {
        let config = SyncConfig {
            api_base_url: base_url,
            ..SyncConfig::default()
        };
        // Local test server must not be routed through any proxy from the environment
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        GithubListing::with_client(client, &config)
    }

    #[tokio::test]
    async fn test_list_directory_not_found_is_transport_error() {
        let base = serve_once("HTTP/1.1 404 Not Found", r#"{"message":"Not Found"}"#).await;
        let listing = listing_for(base);

        let err = listing.list_directory("assets/files").await.unwrap_err();

        match err {
            CatalogError::Transport { path, message } => {
                assert_eq!(path, "assets/files");
                assert_eq!(message, "HTTP 404: Not Found");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_directory_rejects_object_body() {
        let base = serve_once("HTTP/1.1 200 OK", r#"{"name":"a.dxf","type":"file"}"#).await;
        let listing = listing_for(base);

        let err = listing.list_directory("assets/files/a.dxf").await.unwrap_err();

        match err {
            CatalogError::Transport { message, .. } => {
                assert_eq!(message, "unexpected response, expected a listing");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_directory_success() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"name":"a.dxf","type":"file","download_url":"https://raw/a.dxf","html_url":"https://gh/a.dxf"}]"#,
        )
        .await;
        let listing = listing_for(base);

        let entries = listing.list_directory("assets/files").await.unwrap();

        assert_eq!(entries, vec![DirectoryEntry::file("a.dxf", "https://raw/a.dxf")]);
    }
}
