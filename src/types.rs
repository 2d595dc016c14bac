use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Error;

// =============================================================================
// Binary attachment types
// =============================================================================

/// Attachment set of one workflow item, keyed by binary property name.
pub type BinaryMap = BTreeMap<String, BinaryData>;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    /// Base64-encoded payload.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
}

impl BinaryData {
    pub fn from_bytes(bytes: &[u8], file_name: Option<&str>, mime_type: Option<&str>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            file_name: file_name.map(String::from),
            mime_type: mime_type.map(String::from),
            file_extension: file_name
                .and_then(|n| n.rsplit_once('.'))
                .map(|(_, ext)| ext.to_string()),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>, Error> {
        STANDARD
            .decode(self.data.trim())
            .map_err(|e| Error::BadRequest(format!("invalid base64 binary data: {e}")))
    }

    /// Filename sent in the multipart part; falls back to the property key.
    pub fn upload_file_name<'a>(&'a self, key: &'a str) -> &'a str {
        match self.file_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => key,
        }
    }

    pub fn upload_mime_type(&self) -> &str {
        match self.mime_type.as_deref() {
            Some(mime) if !mime.is_empty() => mime,
            _ => DEFAULT_MIME_TYPE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowItem {
    #[serde(default)]
    pub json: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryMap>,
}

// =============================================================================
// Node parameter types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Authentication {
    #[default]
    None,
    Bearer,
    CustomHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Post,
    Put,
    Patch,
}

impl RequestMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    #[serde(default)]
    pub form_fields: Vec<NameValue>,
    #[serde(default)]
    pub headers: Vec<NameValue>,
    #[serde(default)]
    pub query_parameters: Vec<NameValue>,
    /// Milliseconds. Zero or absent leaves the client default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default, rename = "ignoreSSL")]
    pub ignore_ssl: bool,
}

fn default_file_pattern() -> String {
    "*".into()
}

fn default_binary_property_name() -> String {
    "data".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParameters {
    #[serde(default)]
    pub authentication: Authentication,
    #[serde(default)]
    pub request_method: RequestMethod,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default = "default_binary_property_name")]
    pub binary_property_name: String,
    #[serde(default)]
    pub options: UploadOptions,
}

impl UploadParameters {
    pub fn new(url: &str) -> Self {
        Self {
            authentication: Authentication::None,
            request_method: RequestMethod::Post,
            url: url.into(),
            file_pattern: default_file_pattern(),
            binary_property_name: default_binary_property_name(),
            options: UploadOptions::default(),
        }
    }
}

// =============================================================================
// Output types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub json: serde_json::Value,
    pub paired_item: usize,
}

// =============================================================================
// App state
// =============================================================================

pub struct AppState {
    pub config: crate::config::Config,
}

// =============================================================================
// Tests
// =============================================================================
