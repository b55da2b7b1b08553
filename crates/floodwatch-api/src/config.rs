use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Directory band rasters are saved under.
    pub image_dir: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("FLOODWATCH_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin = env::var("FLOODWATCH_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let image_dir = env::var("FLOODWATCH_IMAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("image_dump"));

        Self {
            port,
            cors_origin,
            image_dir,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_uses_the_port() {
        let config = ApiConfig {
            port: 4100,
            cors_origin: "http://localhost:3000".to_string(),
            image_dir: PathBuf::from("image_dump"),
        };
        assert_eq!(config.bind_address(), "0.0.0.0:4100");
    }
}
