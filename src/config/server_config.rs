//! HTTP server configuration parsing from environment variables.

use super::parse_env;
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("SERVER_PORT", 8000)?,
        })
    }

    /// Resolve the listen address. Accepts IP literals (including bare IPv6
    /// such as `::`) and hostnames such as `localhost`.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address found for {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str, port: u16) -> ServerEnvConfig {
        ServerEnvConfig {
            host: host.to_string(),
            port,
        }
    }

    #[tokio::test]
    async fn test_socket_addr() {
        let addr = ServerEnvConfig::default().socket_addr().await.unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }

    #[tokio::test]
    async fn test_socket_addr_accepts_bare_ipv6_and_hostnames() {
        let addr = config("::", 9000).socket_addr().await.unwrap();
        assert!(addr.is_ipv6());
        assert!(addr.ip().is_unspecified());

        let addr = config("localhost", 9001).socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9001);
    }

    #[tokio::test]
    async fn test_socket_addr_rejects_garbage() {
        assert!(config("not a host", 1).socket_addr().await.is_err());
    }
}
