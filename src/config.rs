//! Router configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Variable        | Default        |
//! |-----------------|----------------|
//! | `LISTEN_ADDR`   | `0.0.0.0:3000` |
//! | `WS_PATH`       | `/ws`          |
//! | `DISPATCH_MODE` | `true`         |
//! | `STATIC_DIR`    | unset          |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::DispatchMode;
use crate::error::RouterError;

/// Top-level service configuration.
///
/// Loaded once at startup via [`RouterConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Path the WebSocket endpoint is mounted on.
    pub ws_path: String,

    /// Which router branches are enabled.
    pub dispatch_mode: DispatchMode,

    /// Directory served for non-API paths. Created at setup if missing.
    pub static_dir: Option<PathBuf>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ws_path: "/ws".to_string(),
            dispatch_mode: DispatchMode::Both,
            static_dir: None,
        }
    }
}

impl RouterConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidConfig`] if `LISTEN_ADDR` cannot be
    /// parsed or `WS_PATH` does not start with `/`.
    pub fn from_env() -> Result<Self, RouterError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`RouterConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RouterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|err| {
                RouterError::InvalidConfig(format!("LISTEN_ADDR `{raw}`: {err}"))
            })?,
            None => defaults.listen_addr,
        };

        let ws_path = lookup("WS_PATH").unwrap_or(defaults.ws_path);
        if !ws_path.starts_with('/') {
            return Err(RouterError::InvalidConfig(format!(
                "WS_PATH `{ws_path}` must start with `/`"
            )));
        }

        let dispatch_mode = lookup("DISPATCH_MODE")
            .map_or(defaults.dispatch_mode, |raw| DispatchMode::from(raw.as_str()));

        let static_dir = lookup("STATIC_DIR")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            ws_path,
            dispatch_mode,
            static_dir,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<RouterConfig, RouterError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RouterConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.ws_path, "/ws");
        assert_eq!(config.dispatch_mode, DispatchMode::Both);
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn reads_every_key() {
        let Ok(config) = load(&[
            ("LISTEN_ADDR", "127.0.0.1:8080"),
            ("WS_PATH", "/events"),
            ("DISPATCH_MODE", "passthrough"),
            ("STATIC_DIR", "public"),
        ]) else {
            panic!("config should load");
        };
        assert_eq!(config.listen_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.ws_path, "/events");
        assert_eq!(config.dispatch_mode, DispatchMode::PassthroughOnly);
        assert_eq!(config.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn dispatch_mode_false_disables_router() {
        let Ok(config) = load(&[("DISPATCH_MODE", "false")]) else {
            panic!("config should load");
        };
        assert_eq!(config.dispatch_mode, DispatchMode::None);
    }

    #[test]
    fn bad_listen_addr_is_rejected() {
        let Err(err) = load(&[("LISTEN_ADDR", "not-an-addr")]) else {
            panic!("expected error");
        };
        assert!(matches!(err, RouterError::InvalidConfig(_)));
    }

    #[test]
    fn relative_ws_path_is_rejected() {
        assert!(load(&[("WS_PATH", "ws")]).is_err());
    }

    #[test]
    fn blank_static_dir_is_unset() {
        let Ok(config) = load(&[("STATIC_DIR", "  ")]) else {
            panic!("config should load");
        };
        assert!(config.static_dir.is_none());
    }
}
