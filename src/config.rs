use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::package_manager::{Options, SUPPORTED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interactive: bool,
    pub dry_run: bool,
    pub verbose: bool,
    /// 后端检测顺序
    pub managers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interactive: false,
            dry_run: false,
            verbose: false,
            managers: SUPPORTED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/syspkg/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 以配置为默认值构造单次调用的选项
    pub fn options(&self) -> Options {
        Options {
            interactive: self.interactive,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}
