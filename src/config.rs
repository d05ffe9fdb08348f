use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 5;

/// Mapping from virtual host name to its document root.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct VirtualHosts(HashMap<String, PathBuf>);

impl VirtualHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: impl Into<String>, doc_root: impl Into<PathBuf>) {
        self.0.insert(host.into(), doc_root.into());
    }

    pub fn doc_root(&self, host: &str) -> Option<&Path> {
        self.0.get(host).map(|p| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(host, root)| (host.as_str(), root.as_path()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks that every document root is a directory and rewrites it to its
    /// canonical absolute form.
    pub fn canonicalize(&mut self) -> anyhow::Result<()> {
        for (host, root) in self.0.iter_mut() {
            let canonical = std::fs::canonicalize(&*root).with_context(|| {
                format!("document root {} for host {host} is not accessible", root.display())
            })?;
            if !canonical.is_dir() {
                bail!(
                    "document root {} for host {host} is not a directory",
                    canonical.display()
                );
            }
            *root = canonical;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    listen_addr: Option<String>,
    idle_timeout_secs: Option<u64>,
    #[serde(default)]
    virtual_hosts: VirtualHosts,
}

/// Process-wide server settings. Read-only once the listener starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub idle_timeout: Duration,
    pub virtual_hosts: VirtualHosts,
}

impl Config {
    /// Reads and validates the YAML config at `path`.
    ///
    /// The `LISTEN` environment variable, when set, replaces the file's
    /// listen address.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::load_with_listen(path, std::env::var("LISTEN").ok())
    }

    /// Like [`Config::load`], with the listen override passed in rather
    /// than read from the environment.
    pub fn load_with_listen(
        path: impl AsRef<Path>,
        listen_addr: Option<String>,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut cfg = Self::from_yaml(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;

        if let Some(listen_addr) = listen_addr {
            cfg.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a config document without touching the filesystem.
    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(raw)?;
        Ok(Self {
            listen_addr: file
                .listen_addr
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            idle_timeout: Duration::from_secs(
                file.idle_timeout_secs.unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS),
            ),
            virtual_hosts: file.virtual_hosts,
        })
    }

    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.virtual_hosts.is_empty() {
            bail!("no virtual hosts configured");
        }
        if self.idle_timeout.is_zero() {
            bail!("idle timeout must be greater than zero");
        }
        self.virtual_hosts.canonicalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let cfg = Config::from_yaml("virtual_hosts:\n  a: /tmp\n").unwrap();
        assert_eq!(cfg.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(cfg.idle_timeout, Duration::from_secs(5));
        assert_eq!(cfg.virtual_hosts.doc_root("a"), Some(Path::new("/tmp")));
    }

    #[test]
    fn empty_host_table_is_rejected() {
        let mut cfg = Config::from_yaml("listen_addr: \"0.0.0.0:1\"\n").unwrap();
        assert!(cfg.validate().is_err());
    }
}
