// src/fetch/tag_mapping.rs
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};
use url::Url;

use crate::transform::{TagMapping, TagMappingEntry};

pub const TAG_MAPPING_URL: &str = "https://6719768f7fc4c5ff8f4d84f1.mockapi.io/api/v1/tags";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

async fn try_fetch(client: &Client, url: &str, timeout: Duration) -> Result<Vec<TagMappingEntry>> {
    let url = Url::parse(url).with_context(|| format!("parsing tag mapping URL {}", url))?;
    let resp = client
        .get(url.as_str())
        .timeout(timeout)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?;
    if !resp.status().is_success() {
        return Err(anyhow!("HTTP error: {}", resp.status()));
    }
    resp.json::<Vec<TagMappingEntry>>()
        .await
        .with_context(|| format!("decoding tag mapping from {}", url))
}

/// Fetch `{name, mapped_name}` pairs from `url`. Any failure (bad URL,
/// network, timeout, non-2xx, malformed body) yields an empty mapping.
#[tracing::instrument(level = "info", skip(client))]
pub async fn fetch_tag_mapping(client: &Client, url: &str, timeout: Duration) -> TagMapping {
    match try_fetch(client, url, timeout).await {
        Ok(entries) => {
            let mapping = TagMapping::from_entries(entries);
            info!(entries = mapping.len(), "loaded tag mapping");
            mapping
        }
        Err(err) => {
            warn!("tag mapping unavailable, keeping tags as-is: {:#}", err);
            TagMapping::new()
        }
    }
}

/// Read the same JSON list from disk. Unlike the network fetch, a file the
/// user pointed at that cannot be read is an error.
pub fn load_tag_mapping_file(path: impl AsRef<Path>) -> Result<TagMapping> {
    let path = path.as_ref();
    let data = fs::read(path)
        .with_context(|| format!("reading tag mapping file {}", path.display()))?;
    let entries: Vec<TagMappingEntry> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing tag mapping file {}", path.display()))?;
    Ok(TagMapping::from_entries(entries))
}

/// Where the tag mapping comes from for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSource {
    /// Keep tags as-is.
    Disabled,
    File(PathBuf),
    Remote { url: String, timeout: Duration },
}

impl MappingSource {
    /// Resolve to a concrete mapping. Only `File` can fail; the HTTP client is
    /// built for `Remote` alone, and a client that cannot be built degrades to
    /// an empty mapping like any other fetch failure.
    pub async fn resolve(&self) -> Result<TagMapping> {
        match self {
            MappingSource::Disabled => {
                info!("tag mapping disabled");
                Ok(TagMapping::new())
            }
            MappingSource::File(path) => load_tag_mapping_file(path),
            MappingSource::Remote { url, timeout } => match Client::builder().build() {
                Ok(client) => Ok(fetch_tag_mapping(&client, url, *timeout).await),
                Err(err) => {
                    warn!("http client unavailable, keeping tags as-is: {}", err);
                    Ok(TagMapping::new())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn fetches_and_normalizes_entries() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/tags");
                then.status(200).json_body(serde_json::json!([
                    { "id": "1", "name": "Donor", "mapped_name": "Major Donor" },
                    { "id": "2", "name": " Board ", "mapped_name": "Board of Trustees " },
                    { "id": "3", "name": "Empty", "mapped_name": "" }
                ]));
            })
            .await;

        let mapping = fetch_tag_mapping(&Client::new(), &server.url("/tags"), DEFAULT_TIMEOUT).await;

        mock.assert_async().await;
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("donor"), Some("Major Donor"));
        assert_eq!(mapping.get("BOARD"), Some("Board of Trustees"));
    }

    #[tokio::test]
    async fn server_error_yields_empty_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tags");
                then.status(500).body("boom");
            })
            .await;

        let mapping = fetch_tag_mapping(&Client::new(), &server.url("/tags"), DEFAULT_TIMEOUT).await;
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_yields_empty_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tags");
                then.status(200).body("{\"not\": \"a list\"}");
            })
            .await;

        let mapping = fetch_tag_mapping(&Client::new(), &server.url("/tags"), DEFAULT_TIMEOUT).await;
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn slow_server_times_out_to_empty_mapping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tags");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(serde_json::json!([{ "name": "a", "mapped_name": "b" }]));
            })
            .await;

        let mapping =
            fetch_tag_mapping(&Client::new(), &server.url("/tags"), Duration::from_millis(100)).await;
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn invalid_url_yields_empty_mapping() {
        let mapping = fetch_tag_mapping(&Client::new(), "not a url", DEFAULT_TIMEOUT).await;
        assert!(mapping.is_empty());
    }

    #[tokio::test]
    async fn disabled_source_resolves_empty() -> Result<()> {
        let mapping = MappingSource::Disabled.resolve().await?;
        assert!(mapping.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn remote_source_fetches_through_its_own_client() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/tags");
                then.status(200)
                    .json_body(serde_json::json!([{ "name": "Donor", "mapped_name": "Major Donor" }]));
            })
            .await;

        let source = MappingSource::Remote {
            url: server.url("/tags"),
            timeout: DEFAULT_TIMEOUT,
        };
        let mapping = source.resolve().await?;

        mock.assert_async().await;
        assert_eq!(mapping.get("donor"), Some("Major Donor"));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_remote_source_resolves_empty() -> Result<()> {
        let source = MappingSource::Remote {
            url: "http://127.0.0.1:9/tags".to_string(),
            timeout: Duration::from_millis(500),
        };
        assert!(source.resolve().await?.is_empty());
        Ok(())
    }

    #[test]
    fn loads_mapping_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(br#"[{"name": "Donor", "mapped_name": "Major Donor"}]"#)?;

        let mapping = load_tag_mapping_file(tmp.path())?;
        assert_eq!(mapping.get("donor"), Some("Major Donor"));
        Ok(())
    }

    #[test]
    fn unreadable_mapping_file_is_an_error() {
        let err = load_tag_mapping_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("reading tag mapping file"));
    }
}
