//! Configuration for the lobby TCP server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `LOBBY_BIND_ADDR`   (default: "0.0.0.0")
//! - `LOBBY_PORT`        (default: "9000")
//! - `LOBBY_MAX_CLIENTS` (default: "1024")
//! - `LOBBY_MAX_PLAYERS` (default: "6")

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use lobby_core::DEFAULT_MAX_PLAYERS;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected sessions.
    pub max_clients: usize,

    /// Seats per table.
    pub max_players: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 9000,
            max_clients: 1024,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            bind_addr: env::var("LOBBY_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: read_env_or_default("LOBBY_PORT", defaults.port)?,
            max_clients: read_env_or_default("LOBBY_MAX_CLIENTS", defaults.max_clients)?,
            max_players: read_env_or_default("LOBBY_MAX_PLAYERS", defaults.max_players)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_players == 0 {
            bail!("LOBBY_MAX_PLAYERS must be at least 1");
        }
        if self.max_clients == 0 {
            bail!("LOBBY_MAX_CLIENTS must be at least 1");
        }
        Ok(())
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, val)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.socket_addr_string(), "0.0.0.0:9000");
        assert_eq!(config.max_players, 6);
    }

    #[test]
    fn zero_seats_is_rejected() {
        let config = Config {
            max_players: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unset_variable_falls_back() {
        let port: u16 = read_env_or_default("LOBBY_TEST_UNSET_PORT_VARIABLE", 4242).unwrap();
        assert_eq!(port, 4242);
    }

    #[test]
    fn unparsable_variable_is_an_error_naming_the_key() {
        let key = "LOBBY_TEST_GARBAGE_PORT_VARIABLE";
        std::env::set_var(key, "abc");

        let err = read_env_or_default::<u16>(key, 9000).unwrap_err();
        std::env::remove_var(key);

        let text = format!("{:#}", err);
        assert!(text.contains(key), "error text was: {}", text);
        assert!(text.contains("abc"), "error text was: {}", text);
    }
}
