//! Server settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Bind address and store selection.
///
/// Values come from CLI flags, `GREENCARE_*` environment variables and
/// configuration files, in increasing order of precedence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GREENCARE")]
pub struct ServerSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving; on unless set to `false`.
    pub run_migrations: Option<bool>,
    /// In-memory mode only: seed a demo user reachable with this bearer token.
    pub dev_token: Option<String>,
}

impl ServerSettings {
    /// Host and port in the form `HttpServer::bind` accepts.
    pub fn bind_addr(&self) -> (String, u16) {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(DEFAULT_HOST);
        (host.to_owned(), self.port.unwrap_or(DEFAULT_PORT))
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn dev_token(&self) -> Option<&str> {
        self.dev_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
