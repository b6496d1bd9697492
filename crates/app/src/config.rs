use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

const DEFAULT_DB_URL: &str = "sqlite:dev.sqlite3";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
pub(crate) enum ConfigError {
    InvalidDbUrl { raw: String },
    InvalidBindAddr { raw: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ConfigError::InvalidBindAddr { raw } => {
                write!(f, "invalid PORTAL_BIND_ADDR value: {raw}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Pick the database URL from the flag, then `PORTAL_DB_URL`, then the default.
pub(crate) fn db_url(flag: Option<String>, env_value: Option<String>) -> Result<String, ConfigError> {
    let raw = flag
        .or(env_value)
        .unwrap_or_else(|| DEFAULT_DB_URL.to_string());
    if raw.trim().is_empty() {
        return Err(ConfigError::InvalidDbUrl { raw });
    }
    Ok(normalize_sqlite_url(raw))
}

/// Combine `PORTAL_BIND_ADDR` with `--host`/`--port` overrides.
pub(crate) fn bind_addr(
    env_value: Option<String>,
    host: Option<IpAddr>,
    port: Option<u16>,
) -> Result<SocketAddr, ConfigError> {
    let mut addr = match env_value.filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr { raw })?,
        None => SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
    };
    if let Some(host) = host {
        addr.set_ip(host);
    }
    if let Some(port) = port {
        addr.set_port(port);
    }
    Ok(addr)
}

/// Turn a bare path or relative `sqlite:` URL into an absolute `sqlite://` URL.
pub(crate) fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and its directory) so the pool can open it.
pub(crate) fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}
