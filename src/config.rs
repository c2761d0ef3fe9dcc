use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4630";
const DEFAULT_DB_URL: &str = "sqlite://zipvault.sqlite3";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Minimum length of `SESSION_KEY`, the cookie key needs 512 bits.
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub session_key: Option<String>,
    pub cookie_secure: bool,
    pub max_upload_size: usize,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: DEFAULT_DB_URL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            session_key: None,
            cookie_secure: false,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Builds the config from the process environment (after `.env` was loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        if let Some(url) = lookup("SQLITE_DB_URL") {
            cfg.database_url = url;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            cfg.upload_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("SESSION_KEY") {
            if key.len() < MIN_SESSION_KEY_LEN {
                bail!(
                    "SESSION_KEY must be at least {} bytes, got {}",
                    MIN_SESSION_KEY_LEN,
                    key.len()
                );
            }
            cfg.session_key = Some(key);
        }
        if let Some(v) = lookup("COOKIE_SECURE") {
            cfg.cookie_secure = parse_var("COOKIE_SECURE", &v)?;
        }
        if let Some(v) = lookup("MAX_UPLOAD_SIZE") {
            cfg.max_upload_size = parse_var("MAX_UPLOAD_SIZE", &v)?;
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            let cost: u32 = parse_var("BCRYPT_COST", &v)?;
            if !(4..=31).contains(&cost) {
                bail!("BCRYPT_COST must be between 4 and 31, got {}", cost);
            }
            cfg.bcrypt_cost = cost;
        }

        Ok(cfg)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}: {:?}", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
        assert!(cfg.session_key.is_none());
        assert!(!cfg.cookie_secure);
        assert_eq!(cfg.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn reads_overrides() {
        let key = "k".repeat(MIN_SESSION_KEY_LEN);
        let cfg = Config::from_lookup(lookup_from(&[
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("UPLOAD_DIR", "/tmp/up"),
            ("SESSION_KEY", &key),
            ("COOKIE_SECURE", "true"),
            ("MAX_UPLOAD_SIZE", "1024"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.upload_dir, PathBuf::from("/tmp/up"));
        assert_eq!(cfg.session_key.as_deref(), Some(key.as_str()));
        assert!(cfg.cookie_secure);
        assert_eq!(cfg.max_upload_size, 1024);
        assert_eq!(cfg.bcrypt_cost, 4);
    }

    #[test]
    fn rejects_short_session_key() {
        assert!(Config::from_lookup(lookup_from(&[("SESSION_KEY", "short")])).is_err());
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert!(Config::from_lookup(lookup_from(&[("MAX_UPLOAD_SIZE", "lots")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("BCRYPT_COST", "2")])).is_err());
    }
}
