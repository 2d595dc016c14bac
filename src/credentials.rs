use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::Authentication;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomHeader {
    pub header_name: String,
    pub header_value: String,
}

/// Credentials available to an execution. Either kind may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<BearerToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_header: Option<CustomHeader>,
}

impl CredentialSet {
    /// Per-kind overlay: kinds present in `other` replace ours.
    pub fn merged_with(&self, other: &CredentialSet) -> CredentialSet {
        CredentialSet {
            bearer_token: other
                .bearer_token
                .clone()
                .or_else(|| self.bearer_token.clone()),
            custom_header: other
                .custom_header
                .clone()
                .or_else(|| self.custom_header.clone()),
        }
    }

    /// Header to inject for the selected authentication mode, if any.
    pub fn auth_header(&self, auth: Authentication) -> Result<Option<(String, String)>, Error> {
        match auth {
            Authentication::None => Ok(None),
            Authentication::Bearer => {
                let cred = self
                    .bearer_token
                    .as_ref()
                    .ok_or_else(|| Error::MissingCredentials("bearer token".into()))?;
                if cred.token.is_empty() {
                    return Err(Error::BadRequest("bearer token must not be empty".into()));
                }
                Ok(Some((
                    "Authorization".to_string(),
                    format!("Bearer {}", cred.token),
                )))
            }
            Authentication::CustomHeader => {
                let cred = self
                    .custom_header
                    .as_ref()
                    .ok_or_else(|| Error::MissingCredentials("custom header".into()))?;
                if cred.header_name.trim().is_empty() {
                    return Err(Error::BadRequest(
                        "custom header name must not be empty".into(),
                    ));
                }
                Ok(Some((
                    cred.header_name.trim().to_string(),
                    cred.header_value.clone(),
                )))
            }
        }
    }
}
