use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::credentials::CredentialSet;
use crate::error::Error;
use crate::filter::{filter_binary_files, select_binary_properties};
use crate::types::*;

// =============================================================================
// Request model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEntry {
    File(FilePart),
    Text(String),
}

/// A fully-built outbound upload, ready to hand to the HTTP client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub method: RequestMethod,
    pub url: String,
    pub authentication: Authentication,
    pub form: BTreeMap<String, FormEntry>,
    pub query: BTreeMap<String, String>,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
    pub ignore_ssl: bool,
}

impl UploadRequest {
    pub fn build(item: &WorkflowItem, params: &UploadParameters) -> Result<Self, Error> {
        if params.url.trim().is_empty() {
            return Err(Error::MissingInput("URL is required".into()));
        }

        let binary = item.binary.as_ref().ok_or_else(|| {
            Error::MissingInput(
                "No binary data found in input. Please connect a node that provides binary data."
                    .into(),
            )
        })?;

        let selected = select_binary_properties(binary, &params.binary_property_name);
        let files = filter_binary_files(selected, &params.file_pattern);
        if files.is_empty() {
            return Err(Error::NoMatch(params.file_pattern.clone()));
        }

        let mut form = BTreeMap::new();
        for (key, data) in &files {
            form.insert(
                key.clone(),
                FormEntry::File(FilePart {
                    file_name: data.upload_file_name(key).to_string(),
                    mime_type: data.upload_mime_type().to_string(),
                    bytes: data.bytes()?,
                }),
            );
        }

        let opts = &params.options;
        for field in opts.form_fields.iter().filter(|f| !f.name.is_empty()) {
            form.insert(field.name.clone(), FormEntry::Text(field.value.clone()));
        }

        let query = opts
            .query_parameters
            .iter()
            .filter(|p| !p.name.is_empty())
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect();

        let mut headers = HeaderMap::new();
        for header in opts.headers.iter().filter(|h| !h.name.is_empty()) {
            let (name, value) = header_pair(&header.name, &header.value)?;
            headers.insert(name, value);
        }

        Ok(Self {
            method: params.request_method,
            url: params.url.trim().to_string(),
            authentication: params.authentication,
            form,
            query,
            headers,
            timeout: opts.timeout.filter(|ms| *ms > 0).map(Duration::from_millis),
            ignore_ssl: opts.ignore_ssl,
        })
    }

    pub fn file_count(&self) -> usize {
        self.form
            .values()
            .filter(|e| matches!(e, FormEntry::File(_)))
            .count()
    }

    fn client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        } else {
            builder = builder.timeout(Duration::from_secs(30));
        }
        if self.ignore_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))
    }

    fn multipart_form(&self) -> Result<multipart::Form, Error> {
        let mut form = multipart::Form::new();
        for (name, entry) in &self.form {
            form = match entry {
                FormEntry::Text(value) => form.text(name.clone(), value.clone()),
                FormEntry::File(file) => {
                    let part = multipart::Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime_type)
                        .map_err(|e| {
                            Error::BadRequest(format!(
                                "invalid mime type '{}': {e}",
                                file.mime_type
                            ))
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }

    pub async fn send(&self, credentials: &CredentialSet) -> Result<serde_json::Value, Error> {
        let mut headers = self.headers.clone();
        if let Some((name, value)) = credentials.auth_header(self.authentication)? {
            let (name, value) = header_pair(&name, &value)?;
            headers.insert(name, value);
        }

        tracing::info!(
            "{:?} {} with {} file(s)",
            self.method,
            self.url,
            self.file_count()
        );

        let resp = self
            .client()?
            .request(self.method.as_reqwest(), &self.url)
            .query(&self.query)
            .headers(headers)
            .multipart(self.multipart_form()?)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        match status.as_u16() {
            401 => return Err(Error::Auth("Authentication failed (401)".into())),
            403 => return Err(Error::Auth("Access forbidden (403)".into())),
            _ if status.is_success() => {}
            code => {
                tracing::warn!("Upload to {} failed: HTTP {code}", self.url);
                return Err(Error::Network(format!("HTTP {code}: {body}")));
            }
        }

        Ok(response_json(&body))
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), Error> {
    let header_name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|_| Error::BadRequest(format!("invalid header name '{name}'")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| Error::BadRequest(format!("invalid value for header '{name}'")))?;
    Ok((header_name, header_value))
}

/// JSON objects pass through; anything else is wrapped under `data`.
fn response_json(body: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(other) => serde_json::json!({ "data": other }),
        Err(_) => serde_json::json!({ "data": body }),
    }
}

// =============================================================================
// Tests
// =============================================================================
