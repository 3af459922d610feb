//! dnf 后端
//!
//! 目前只提供可用性检测，其余操作返回 `Error::Unsupported`。

use super::runner::binary_available;
use super::types::{Options, PackageInfo};
use super::PackageManager;
use crate::error::{Error, Result};

pub const PM: &str = "dnf";

/// dnf 命令行参数，后续实现 install/remove 等操作时使用
pub const ARGS_ASSUME_YES: &str = "-y";
pub const ARGS_ASSUME_NO: &str = "--assumeno";
pub const ARGS_QUIET: &str = "-q";
pub const ARGS_NO_AUTO_REMOVE: &str = "--no-autoremove";

#[derive(Debug, Clone, Copy, Default)]
pub struct DnfManager;

impl DnfManager {
    pub fn new() -> Self {
        Self
    }
}

fn unsupported<T>(operation: &'static str) -> Result<T> {
    Err(Error::Unsupported { manager: PM, operation })
}

impl PackageManager for DnfManager {
    fn name(&self) -> &'static str {
        PM
    }

    fn is_available(&self) -> bool {
        binary_available(PM)
    }

    fn install(&self, _packages: &[String], _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("install")
    }

    fn delete(&self, _packages: &[String], _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("delete")
    }

    fn refresh(&self, _opts: &Options) -> Result<()> {
        unsupported("refresh")
    }

    fn find(&self, _keywords: &[String], _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("find")
    }

    fn list_installed(&self, _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("list-installed")
    }

    fn list_upgradable(&self, _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("list-upgradable")
    }

    fn upgrade(&self, _packages: &[String], _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("upgrade")
    }

    fn upgrade_all(&self, _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("upgrade-all")
    }

    fn get_package_info(&self, _package: &str, _opts: &Options) -> Result<PackageInfo> {
        unsupported("info")
    }

    fn clean(&self, _opts: &Options) -> Result<()> {
        unsupported("clean")
    }

    fn auto_remove(&self, _opts: &Options) -> Result<Vec<PackageInfo>> {
        unsupported("autoremove")
    }
}
