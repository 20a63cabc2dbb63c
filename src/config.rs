//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a default so the server starts with no environment at all:
//! it binds `0.0.0.0:8000`, serves the bundled demo catalog, allows any CORS
//! origin and disables classification until an LLM key is configured.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CLASSIFY_MAX_TOKENS: u32 = 512;

/// Allowed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    pub static_dir: Option<PathBuf>,
    pub prompts_path: Option<PathBuf>,
    pub prd_path: Option<PathBuf>,
    pub classify_max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            cors_origins: CorsOrigins::Any,
            static_dir: None,
            prompts_path: None,
            prd_path: None,
            classify_max_tokens: DEFAULT_CLASSIFY_MAX_TOKENS,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `CORS_ORIGINS`, `STATIC_DIR`, `PROMPTS_PATH`,
    /// `PRD_PATH` and `CLASSIFY_MAX_TOKENS`. Unparseable numbers fall back to
    /// their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env_string("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: env_parse("PORT", DEFAULT_PORT),
            cors_origins: parse_cors_origins(env_string("CORS_ORIGINS").as_deref()),
            static_dir: env_string("STATIC_DIR").map(PathBuf::from),
            prompts_path: env_string("PROMPTS_PATH").map(PathBuf::from),
            prd_path: env_string("PRD_PATH").map(PathBuf::from),
            classify_max_tokens: env_parse("CLASSIFY_MAX_TOKENS", DEFAULT_CLASSIFY_MAX_TOKENS),
        }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an env var, falling back to `default` when unset or invalid.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Non-empty trimmed value of an env var.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn parse_cors_origins(raw: Option<&str>) -> CorsOrigins {
    let Some(raw) = raw else {
        return CorsOrigins::Any;
    };
    if raw == "*" {
        return CorsOrigins::Any;
    }
    let list: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if list.is_empty() { CorsOrigins::Any } else { CorsOrigins::List(list) }
}

/// Serializes tests that mutate the process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
