//! Server configuration, loaded from the environment.

use crate::TurnstileError;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// The prefix every configuration variable carries.
pub const ENV_PREFIX: &str = "TURNSTILE_";

/// Where the server listens.
///
/// # Environment Variables
///
/// - `TURNSTILE_HOST` (optional): the interface to bind, defaults to `0.0.0.0`
/// - `TURNSTILE_PORT` (optional): the port to bind, defaults to `3006`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    /// The interface to bind.
    pub host: IpAddr,
    #[serde(default = "default_port")]
    /// The port to bind.
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3006
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first, if there is
    /// one; variables already set in the environment take precedence.
    ///
    /// # Errors
    /// Fails if a variable is set but cannot be parsed (e.g. a port that is
    /// not a number).
    pub fn from_env() -> Result<Self, TurnstileError> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .map_err(TurnstileError::Config)
    }

    /// Loads the configuration from the given `(name, value)` pairs, using
    /// the same rules as [`ServerConfig::from_env`].
    ///
    /// # Errors
    /// The same as [`ServerConfig::from_env`].
    ///
    /// # Examples
    /// ```rust
    /// # use turnstile::ServerConfig;
    /// let vars = vec![("TURNSTILE_PORT".to_string(), "8080".to_string())];
    /// let config = ServerConfig::from_vars(vars).unwrap();
    /// assert_eq!(config.address().to_string(), "0.0.0.0:8080");
    /// ```
    pub fn from_vars<I>(vars: I) -> Result<Self, TurnstileError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(TurnstileError::Config)
    }

    /// The socket address to listen on.
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
