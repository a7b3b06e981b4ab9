//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path given with `-f`), then applies the `BFHL_*` env overrides.

use std::{
    env,
    fs,
    path::Path,
};

use serde::Deserialize;

use crate::{error::AppError, logger};

/// Default config path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the listener to.
    pub bind: String,
    /// Attach a CORS layer accepting any origin, method and header, with credentials.
    pub cors: bool,
}

/// Identity metadata echoed in every successful `POST /bfhl` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_id: String,
    pub email: String,
    pub roll_number: String,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub server: ServerConfig,
    pub identity: IdentityConfig,
}

/// Values that replace what the TOML file says. `None` keeps the file value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bind: Option<String>,
    pub log_level: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
}

impl Overrides {
    /// Collect overrides from `BFHL_BIND`, `BFHL_LOG_LEVEL`, `BFHL_USER_ID`,
    /// `BFHL_EMAIL` and `BFHL_ROLL_NUMBER`.
    pub fn from_env() -> Self {
        Self {
            bind: env::var("BFHL_BIND").ok(),
            log_level: env::var("BFHL_LOG_LEVEL").ok(),
            user_id: env::var("BFHL_USER_ID").ok(),
            email: env::var("BFHL_EMAIL").ok(),
            roll_number: env::var("BFHL_ROLL_NUMBER").ok(),
        }
    }
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    identity: RawIdentity,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Defaults to `true`: the endpoint is meant to be called from browsers.
    #[serde(default = "default_true")]
    cors: bool,
}

#[derive(Deserialize, Default)]
struct RawIdentity {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roll_number: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            cors: true,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Load config from `path` (or [`DEFAULT_CONFIG_PATH`]), then apply env-var overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let path = Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH));
    load_from(path, &Overrides::from_env())
}

/// Loader with an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &Overrides) -> Result<Config, AppError> {
    let pick = |over: &Option<String>, file: String| over.clone().unwrap_or(file);

    let s = parsed.server;
    let i = parsed.identity;

    let identity = IdentityConfig {
        user_id: pick(&overrides.user_id, i.user_id),
        email: pick(&overrides.email, i.email),
        roll_number: pick(&overrides.roll_number, i.roll_number),
    };

    for (field, value) in [
        ("user_id", &identity.user_id),
        ("email", &identity.email),
        ("roll_number", &identity.roll_number),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Config(format!("identity.{field} must not be empty")));
        }
    }

    let log_level = pick(&overrides.log_level, s.log_level);
    logger::parse_level(&log_level)
        .map_err(|e| AppError::Config(format!("server.log_level: {e}")))?;

    Ok(Config {
        log_level,
        server: ServerConfig {
            bind: pick(&overrides.bind, s.bind),
            cors: s.cors,
        },
        identity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[identity]
user_id = "john_doe_17091999"
email = "john@xyz.com"
roll_number = "ABCD123"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:8000");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.server.cors);
        assert_eq!(cfg.identity.user_id, "john_doe_17091999");
        assert_eq!(cfg.identity.email, "john@xyz.com");
        assert_eq!(cfg.identity.roll_number, "ABCD123");
    }

    #[test]
    fn server_section_is_read() {
        let f = write_toml(&format!(
            "{MINIMAL_TOML}\n[server]\nbind = \"127.0.0.1:9000\"\nlog_level = \"debug\"\ncors = false\n"
        ));
        let cfg = load_from(f.path(), &Overrides::default()).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert_eq!(cfg.log_level, "debug");
        assert!(!cfg.server.cors);
    }

    #[test]
    fn overrides_win_over_file() {
        let f = write_toml(MINIMAL_TOML);
        let overrides = Overrides {
            bind: Some("127.0.0.1:1234".into()),
            log_level: Some("trace".into()),
            user_id: Some("jane_01012000".into()),
            email: None,
            roll_number: Some("XYZ9".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:1234");
        assert_eq!(cfg.log_level, "trace");
        assert_eq!(cfg.identity.user_id, "jane_01012000");
        assert_eq!(cfg.identity.email, "john@xyz.com");
        assert_eq!(cfg.identity.roll_number, "XYZ9");
    }

    #[test]
    fn missing_identity_section_errors() {
        let f = write_toml("[server]\nbind = \"127.0.0.1:8000\"\n");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn empty_identity_field_errors() {
        let f = write_toml("[identity]\nuser_id = \"u\"\nemail = \"\"\nroll_number = \"r\"\n");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("identity.email"));
    }

    #[test]
    fn override_fills_empty_identity_field() {
        let f = write_toml("[identity]\nuser_id = \"u\"\nroll_number = \"r\"\n");
        let overrides = Overrides { email: Some("e@x.com".into()), ..Default::default() };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.identity.email, "e@x.com");
    }

    #[test]
    fn unknown_log_level_errors() {
        let f = write_toml(&format!("{MINIMAL_TOML}\n[server]\nlog_level = \"verbose\"\n"));
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("server.log_level"));
        assert!(msg.contains("verbose"));
    }

    #[test]
    fn unknown_log_level_override_errors() {
        let f = write_toml(MINIMAL_TOML);
        let overrides = Overrides { log_level: Some("loud".into()), ..Default::default() };
        assert!(load_from(f.path(), &overrides).is_err());
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &Overrides::default());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("cannot read"));
    }

    #[test]
    fn malformed_toml_errors() {
        let f = write_toml("[identity\nuser_id = ");
        let msg = load_from(f.path(), &Overrides::default()).unwrap_err().to_string();
        assert!(msg.contains("parse error"));
    }

    #[test]
    fn shipped_default_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let cfg = load_from(&path, &Overrides::default()).unwrap();
        assert!(!cfg.identity.user_id.is_empty());
    }
}
