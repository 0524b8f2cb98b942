use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Serve Swagger UI at `/docs` alongside the raw document.
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            swagger_ui: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source; `from_env` passes
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let host = lookup("APP_HOST")
            .map(|val| val.parse::<IpAddr>())
            .unwrap_or(Ok(defaults.host))
            .map_err(|_| AppError::configuration("APP_HOST must be a valid IP address"))?;
        let port = lookup("APP_PORT")
            .map(|val| val.parse::<u16>())
            .unwrap_or(Ok(defaults.port))
            .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?;
        let swagger_ui = lookup("SWAGGER_UI_ENABLED")
            .map(|val| parse_flag(&val))
            .unwrap_or(Some(defaults.swagger_ui))
            .ok_or_else(|| AppError::configuration("SWAGGER_UI_ENABLED must be true or false"))?;

        Ok(Self { host, port, swagger_ui })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
