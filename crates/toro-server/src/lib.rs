//! Configuration for the TORO server binary.
//!
//! Settings are layered: built-in defaults, then the optional TOML file, then
//! `TORO_*` environment variables (e.g. `TORO_PORT=9000`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;
use toro_api::RetryPolicy;

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Attempts per store operation when the database reports busy/locked.
  pub retry_attempts:   u32,
  pub retry_backoff_ms: u64,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "toro.db")?
      .set_default("retry_attempts", 3_i64)?
      .set_default("retry_backoff_ms", 50_i64)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("TORO").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.retry_attempts.max(1),
      backoff:      Duration::from_millis(self.retry_backoff_ms),
    }
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_without_a_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/toro-config.toml")).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.retry_policy().max_attempts, 3);
  }

  #[test]
  fn file_values_override_defaults() {
    let path = std::env::temp_dir().join(format!("toro-config-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "port = 9100\nstore_path = \"/var/lib/toro/records.db\"\nretry_attempts = 0\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.address(), "127.0.0.1:9100");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/toro/records.db"));
    // Zero attempts still runs each operation once.
    assert_eq!(cfg.retry_policy().max_attempts, 1);
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/toro.db"));
    assert_eq!(expanded, PathBuf::from(home).join("toro.db"));
    assert_eq!(expand_tilde(Path::new("/tmp/toro.db")), PathBuf::from("/tmp/toro.db"));
  }
}
