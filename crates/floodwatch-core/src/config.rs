//! Provider configuration.
//!
//! Credentials and endpoint URLs for the imagery providers. Values are
//! layered: built-in endpoint defaults, then an optional TOML file, then
//! environment variables. Client id/secret have no default and must come
//! from the file or the environment.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_TOKEN_URL: &str =
    "https://identity.dataspace.copernicus.eu/auth/realms/CDSE/protocol/openid-connect/token";
const DEFAULT_CATALOG_URL: &str =
    "https://sh.dataspace.copernicus.eu/api/v1/catalog/1.0.0/search";
const DEFAULT_PROCESS_URL: &str = "https://sh.dataspace.copernicus.eu/api/v1/process";
const DEFAULT_RENDER_URL: &str = "https://earthengine.googleapis.com";

/// Everything the outbound clients need to talk to the providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub catalog_url: String,
    pub process_url: String,
    pub render_url: String,
    /// Service-account key material for the render provider, as a file path.
    pub render_key_file: Option<String>,
    /// Applied to every outbound call so a stalled provider cannot hang a
    /// request forever.
    pub request_timeout_secs: u64,
}

impl ProviderSettings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            process_url: DEFAULT_PROCESS_URL.to_string(),
            render_url: DEFAULT_RENDER_URL.to_string(),
            render_key_file: None,
            request_timeout_secs: 30,
        }
    }

    /// Load from `FLOODWATCH_*` environment variables, with an optional TOML
    /// file underneath (`FLOODWATCH_CONFIG` names the file).
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match env::var("FLOODWATCH_CONFIG") {
            Ok(path) => Some(FileSettings::load(Path::new(&path))?),
            Err(_) => None,
        };
        let file = file.unwrap_or_default();

        let client_id = env::var("FLOODWATCH_CLIENT_ID")
            .ok()
            .or(file.client_id)
            .ok_or_else(|| ConfigError::Missing {
                key: "FLOODWATCH_CLIENT_ID".to_string(),
            })?;

        let client_secret = env::var("FLOODWATCH_CLIENT_SECRET")
            .ok()
            .or(file.client_secret)
            .ok_or_else(|| ConfigError::Missing {
                key: "FLOODWATCH_CLIENT_SECRET".to_string(),
            })?;

        let request_timeout_secs = match env::var("FLOODWATCH_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "FLOODWATCH_REQUEST_TIMEOUT_SECS".to_string(),
                reason: format!("expected seconds as an integer, got {raw:?}"),
            })?,
            Err(_) => file.request_timeout_secs.unwrap_or(30),
        };

        Ok(Self {
            client_id,
            client_secret,
            token_url: layered(
                "FLOODWATCH_TOKEN_URL",
                file.token_url,
                DEFAULT_TOKEN_URL,
            ),
            catalog_url: layered(
                "FLOODWATCH_CATALOG_URL",
                file.catalog_url,
                DEFAULT_CATALOG_URL,
            ),
            process_url: layered(
                "FLOODWATCH_PROCESS_URL",
                file.process_url,
                DEFAULT_PROCESS_URL,
            ),
            render_url: layered(
                "FLOODWATCH_RENDER_URL",
                file.render_url,
                DEFAULT_RENDER_URL,
            ),
            render_key_file: env::var("FLOODWATCH_RENDER_KEY_FILE").ok().or(file.render_key_file),
            request_timeout_secs,
        })
    }
}

fn layered(env_key: &str, file_value: Option<String>, default: &str) -> String {
    env::var(env_key)
        .ok()
        .or(file_value)
        .unwrap_or_else(|| default.to_string())
}

/// Optional TOML file shape; every field may be omitted.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: Option<String>,
    catalog_url: Option<String>,
    process_url: Option<String>,
    render_url: Option<String>,
    render_key_file: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl FileSettings {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Invalid {
            key: "FLOODWATCH_CONFIG".to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            key: "FLOODWATCH_CONFIG".to_string(),
            reason: format!("failed to parse TOML: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_point_at_the_data_space() {
        let settings = ProviderSettings::new("id", "secret");
        assert!(settings.token_url.contains("identity.dataspace.copernicus.eu"));
        assert!(settings.catalog_url.ends_with("/catalog/1.0.0/search"));
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn file_settings_accept_partial_content() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
client_id = "from-file"
client_secret = "also-from-file"
request_timeout_secs = 10
"#
        )
        .unwrap();

        let settings = FileSettings::load(file.path()).unwrap();
        assert_eq!(settings.client_id.as_deref(), Some("from-file"));
        assert_eq!(settings.request_timeout_secs, Some(10));
        assert!(settings.token_url.is_none());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "client_id = [not valid").unwrap();
        assert!(FileSettings::load(file.path()).is_err());
    }
}
