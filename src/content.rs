//! Document content providers.
//!
//! Documents arrive wrapped in a `{ success, data, message }` envelope,
//! either from files on disk or from a content API.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::Document;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Kind of content to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Bulletin,
    Template,
    Card,
}

impl ContentKind {
    /// Collection name used in paths and URLs (`bulletins`, `templates`, `cards`).
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Bulletin => "bulletins",
            ContentKind::Template => "templates",
            ContentKind::Card => "cards",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Bulletin => "bulletin",
            ContentKind::Template => "template",
            ContentKind::Card => "card",
        };
        f.write_str(name)
    }
}

/// Response envelope returned by content sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A source of document content.
pub trait ContentProvider {
    /// Fetch one piece of content by kind and id.
    fn get_content(&self, kind: ContentKind, id: &str) -> Result<ContentResponse>;
}

/// Reads envelopes from `{root}/{kind}s/{id}.json`.
#[derive(Debug, Clone)]
pub struct FileContentProvider {
    root: PathBuf,
}

impl FileContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the envelope file for `(kind, id)`.
    pub fn path_for(&self, kind: ContentKind, id: &str) -> PathBuf {
        self.root
            .join(kind.collection())
            .join(format!("{}.json", id))
    }
}

impl ContentProvider for FileContentProvider {
    fn get_content(&self, kind: ContentKind, id: &str) -> Result<ContentResponse> {
        let path = self.path_for(kind, id);
        if !path.exists() {
            return Ok(ContentResponse {
                success: false,
                data: None,
                message: Some(format!("{} {} not found", kind, id)),
            });
        }
        log::debug!("Reading {} {} from {}", kind, id, path.display());
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Fetches envelopes with `GET {base_url}/{kind}s/{id}`.
pub struct HttpContentProvider {
    base_url: String,
    client: Client,
}

impl HttpContentProvider {
    /// Build a provider with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build a provider with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the resource for `(kind, id)`.
    pub fn url_for(&self, kind: ContentKind, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.collection(), id)
    }
}

impl ContentProvider for HttpContentProvider {
    fn get_content(&self, kind: ContentKind, id: &str) -> Result<ContentResponse> {
        let url = self.url_for(kind, id);
        log::debug!("Fetching {} {} from {}", kind, id, url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        // Error statuses usually still carry an envelope with a message.
        let message = serde_json::from_str::<ContentResponse>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| format!("content service returned HTTP {}", status.as_u16()));
        Ok(ContentResponse {
            success: false,
            data: None,
            message: Some(message),
        })
    }
}

/// Fetch and decode a document.
pub fn load_document(provider: &dyn ContentProvider, kind: ContentKind, id: &str) -> Result<Document> {
    let response = provider.get_content(kind, id)?;
    if !response.success {
        return Err(Error::Content(
            response
                .message
                .unwrap_or_else(|| format!("failed to load {} {}", kind, id)),
        ));
    }
    let data = response
        .data
        .ok_or_else(|| Error::Content(format!("{} {} has no data", kind, id)))?;
    Ok(serde_json::from_value(data)?)
}

/// Read a document from a JSON file.
///
/// Accepts either a bare document or a `{ success, data, message }` envelope.
pub fn load_document_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let text = fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&text)?;
    let is_envelope = value.get("success").is_some() && value.get("sections").is_none();
    if is_envelope {
        let response: ContentResponse = serde_json::from_value(value)?;
        if !response.success {
            return Err(Error::Content(
                response
                    .message
                    .unwrap_or_else(|| format!("{} is not a loadable document", path.as_ref().display())),
            ));
        }
        let data = response
            .data
            .ok_or_else(|| Error::Content(format!("{} has no data", path.as_ref().display())))?;
        return Ok(serde_json::from_value(data)?);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn bulletin_json() -> Value {
        json!({
            "name": "Boletín Puno",
            "sections": [
                { "name": "Portada", "blocks": [] },
                { "name": "Pronóstico", "blocks": [
                    { "fields": [ { "type": "list", "field_config": { "max_items_per_page": 2 },
                                    "value": [1, 2, 3] } ] }
                ] }
            ]
        })
    }

    #[test]
    fn test_file_provider_reads_envelope() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("bulletins")).unwrap();
        let envelope = json!({ "success": true, "data": bulletin_json() });
        fs::write(dir.path().join("bulletins/abc.json"), envelope.to_string()).unwrap();

        let provider = FileContentProvider::new(dir.path());
        let doc = load_document(&provider, ContentKind::Bulletin, "abc").unwrap();
        assert_eq!(doc.name, "Boletín Puno");
        assert_eq!(doc.section_count(), 2);
    }

    #[test]
    fn test_file_provider_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = FileContentProvider::new(dir.path());
        match load_document(&provider, ContentKind::Template, "nope") {
            Err(Error::Content(msg)) => assert_eq!(msg, "template nope not found"),
            other => panic!("Expected Content error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsuccessful_envelope_surfaces_message() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("cards")).unwrap();
        fs::write(
            dir.path().join("cards/x.json"),
            json!({ "success": false, "message": "card archived" }).to_string(),
        )
        .unwrap();

        let provider = FileContentProvider::new(dir.path());
        match load_document(&provider, ContentKind::Card, "x") {
            Err(Error::Content(msg)) => assert_eq!(msg, "card archived"),
            other => panic!("Expected Content error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_is_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("bulletins")).unwrap();
        fs::write(
            dir.path().join("bulletins/empty.json"),
            json!({ "success": true }).to_string(),
        )
        .unwrap();

        let provider = FileContentProvider::new(dir.path());
        assert!(matches!(
            load_document(&provider, ContentKind::Bulletin, "empty"),
            Err(Error::Content(_))
        ));
    }

    #[test]
    fn test_http_provider() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/bulletins/42")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "success": true, "data": bulletin_json() }).to_string())
            .create();

        let provider = HttpContentProvider::new(format!("{}/", server.url())).unwrap();
        assert_eq!(provider.url_for(ContentKind::Bulletin, "42"), format!("{}/bulletins/42", server.url()));

        let doc = load_document(&provider, ContentKind::Bulletin, "42").unwrap();
        assert_eq!(doc.section_count(), 2);
        mock.assert();
    }

    #[test]
    fn test_http_provider_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/templates/7")
            .with_status(404)
            .with_body(json!({ "success": false, "message": "template not found" }).to_string())
            .create();

        let provider = HttpContentProvider::new(server.url()).unwrap();
        match load_document(&provider, ContentKind::Template, "7") {
            Err(Error::Content(msg)) => assert_eq!(msg, "template not found"),
            other => panic!("Expected Content error, got {:?}", other),
        }

        let _plain = server.mock("GET", "/templates/8").with_status(500).with_body("oops").create();
        match load_document(&provider, ContentKind::Template, "8") {
            Err(Error::Content(msg)) => assert_eq!(msg, "content service returned HTTP 500"),
            other => panic!("Expected Content error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_document_file_accepts_bare_and_envelope() {
        let dir = TempDir::new().unwrap();
        let bare = dir.path().join("bare.json");
        fs::write(&bare, bulletin_json().to_string()).unwrap();
        assert_eq!(load_document_file(&bare).unwrap().section_count(), 2);

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, json!({ "success": true, "data": bulletin_json() }).to_string()).unwrap();
        assert_eq!(load_document_file(&wrapped).unwrap().name, "Boletín Puno");
    }
}
