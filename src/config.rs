use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::credentials::{BearerToken, CredentialSet, CustomHeader};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub credentials: CredentialSet,
    pub continue_on_fail: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.into(),
            credentials: CredentialSet::default(),
            continue_on_fail: false,
        }
    }
}

impl Config {
    /// Build from the config file, falling back to `MULTI_UPLOAD_*` variables
    /// looked up through `env` for keys the file does not set.
    pub fn load(path: &Path, env: impl Fn(&str) -> Option<String>) -> Config {
        let file = parse_config_file(path);
        let get = |key: &str| {
            file.get(key).cloned().or_else(|| {
                let var = format!("MULTI_UPLOAD_{}", key.replace('-', "_").to_uppercase());
                env(&var)
            })
        };

        let bearer_token = get("bearer-token")
            .filter(|t| !t.is_empty())
            .map(|token| BearerToken { token });

        let custom_header = match (get("header-name"), get("header-value")) {
            (Some(header_name), value) if !header_name.is_empty() => Some(CustomHeader {
                header_name,
                header_value: value.unwrap_or_default(),
            }),
            _ => None,
        };

        let continue_on_fail = get("continue-on-fail")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(false);

        Config {
            listen: get("listen").unwrap_or_else(|| DEFAULT_LISTEN.into()),
            credentials: CredentialSet {
                bearer_token,
                custom_header,
            },
            continue_on_fail,
        }
    }
}

pub fn resolve_config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| {
            std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".config"))
                .ok()
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parse a simple key = value config file.
/// Lines starting with # are comments. Blank lines are ignored.
fn parse_config_file(path: &Path) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if path.exists() {
                tracing::warn!("Failed to read config {}: {e}", path.display());
            }
            return map;
        }
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}
