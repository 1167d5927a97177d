use http::HeaderValue;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::store::{FileStateRepository, InMemoryStateRepository, StateRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
}

impl StoreKind {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            other => Err(format!(
                "Invalid MARKET_STATE_STORE: {}. Must be 'memory' or 'file'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: String,
    pub state_dir: PathBuf,
    pub cors_allow_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            store: "memory".to_string(),
            state_dir: PathBuf::from("."),
            cors_allow_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid PORT: {}", raw))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            store: std::env::var("MARKET_STATE_STORE").unwrap_or(defaults.store),
            state_dir: std::env::var("MARKET_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must not be 0".to_string());
        }
        self.host
            .parse::<IpAddr>()
            .map_err(|_| format!("Invalid HOST: {}", self.host))?;
        StoreKind::parse(&self.store)?;
        if let Some(origin) = &self.cors_allow_origin {
            HeaderValue::from_str(origin)
                .map_err(|_| format!("Invalid CORS_ALLOW_ORIGIN: {}", origin))?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| format!("Invalid HOST: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Repository chosen once at startup; shared logic never probes for it.
    pub fn state_repository(&self) -> Result<Arc<dyn StateRepository>, String> {
        Ok(match StoreKind::parse(&self.store)? {
            StoreKind::Memory => Arc::new(InMemoryStateRepository::new()),
            StoreKind::File => Arc::new(FileStateRepository::new(&self.state_dir)),
        })
    }

    pub fn cors_layer(&self) -> CorsLayer {
        match self
            .cors_allow_origin
            .as_deref()
            .and_then(|origin| HeaderValue::from_str(origin).ok())
        {
            Some(origin) => CorsLayer::new().allow_origin(origin).allow_methods(Any),
            None => CorsLayer::permissive(),
        }
    }
}
