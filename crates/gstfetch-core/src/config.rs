use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DirCache;
use crate::http::HttpOptions;
use crate::installer::PkgInstaller;
use crate::package::{RemoteLayout, DEFAULT_ARCH, DEFAULT_BASE_URL, DEFAULT_PACKAGE_NAME};

/// Transfer limits (`[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole transfer, checksum or package.
    pub timeout_secs: u64,
    /// Abort a transfer slower than this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 1800,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
        }
    }
}

/// `[verify]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Fail verification when the checksum file names a different package.
    pub strict_filename: bool,
}

/// `[installer]` section: how verified packages are handed to the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub program: String,
    pub target: String,
    /// Run the installer through `sudo`.
    pub sudo: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        let installer = PkgInstaller::default();
        Self {
            program: installer.program,
            target: installer.target,
            sudo: installer.sudo,
        }
    }
}

/// Global configuration loaded from `~/.config/gstfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GstConfig {
    /// Origin serving `/data/pkg/osx/<version>/...`.
    pub base_url: String,
    pub package_name: String,
    pub arch: String,
    /// Package cache root. None = `~/.cache/gstfetch/packages`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub http: HttpConfig,
    pub verify: VerifyConfig,
    pub installer: InstallerConfig,
}

impl Default for GstConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            arch: DEFAULT_ARCH.to_string(),
            cache_dir: None,
            http: HttpConfig::default(),
            verify: VerifyConfig::default(),
            installer: InstallerConfig::default(),
        }
    }
}

impl GstConfig {
    /// Reject settings that would only fail later, mid-acquisition.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("base_url must be http or https, got {:?}", self.base_url);
        }
        if self.package_name.trim().is_empty() || self.arch.trim().is_empty() {
            anyhow::bail!("package_name and arch must not be empty");
        }
        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn layout(&self) -> RemoteLayout {
        RemoteLayout::new(&self.base_url, &self.package_name, &self.arch)
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            timeout: Duration::from_secs(self.http.timeout_secs),
            low_speed_limit: self.http.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.http.low_speed_time_secs),
        }
    }

    pub fn installer(&self) -> PkgInstaller {
        PkgInstaller {
            program: self.installer.program.clone(),
            target: self.installer.target.clone(),
            sudo: self.installer.sudo,
        }
    }

    pub fn cache_root(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => DirCache::default_root(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gstfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GstConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GstConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load an explicit config file (`--config`). A missing file is an error here.
pub fn load_from_path(path: &Path) -> Result<GstConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: GstConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
