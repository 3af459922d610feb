//! 包管理器模块 — 对 apt / dnf 等系统包管理器的统一封装

pub mod apt;
pub mod dnf;
pub mod runner;
pub mod types;

// 重新导出常用类型和函数
pub use apt::AptManager;
pub use dnf::DnfManager;
pub use runner::{CommandRunner, SystemRunner};
pub use types::{CommandOutput, Options, PackageInfo, PackageStatus};

use crate::error::{Error, Result};

/// 所有后端都实现的统一接口
pub trait PackageManager {
    /// 后端标识，同时写入每条记录的 `package_manager` 字段
    fn name(&self) -> &'static str;

    /// 后端的可执行文件是否在 PATH 中
    fn is_available(&self) -> bool;

    // ===== 变更 =====

    fn install(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>>;

    fn delete(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>>;

    /// 刷新软件源索引
    fn refresh(&self, opts: &Options) -> Result<()>;

    fn upgrade(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>>;

    fn upgrade_all(&self, opts: &Options) -> Result<Vec<PackageInfo>>;

    fn clean(&self, opts: &Options) -> Result<()>;

    fn auto_remove(&self, opts: &Options) -> Result<Vec<PackageInfo>>;

    // ===== 查询 =====

    fn find(&self, keywords: &[String], opts: &Options) -> Result<Vec<PackageInfo>>;

    fn list_installed(&self, opts: &Options) -> Result<Vec<PackageInfo>>;

    fn list_upgradable(&self, opts: &Options) -> Result<Vec<PackageInfo>>;

    fn get_package_info(&self, package: &str, opts: &Options) -> Result<PackageInfo>;
}

/// 已知后端的名称
pub const SUPPORTED: [&str; 2] = [apt::PM, dnf::PM];

/// 按名称构造后端（不检查是否可用）
pub fn by_name(name: &str) -> Result<Box<dyn PackageManager>> {
    match name {
        apt::PM => Ok(Box::new(AptManager::new())),
        dnf::PM => Ok(Box::new(DnfManager::new())),
        other => Err(Error::UnknownPackageManager(other.to_string())),
    }
}

/// 按给定顺序检测系统中可用的后端
pub fn detect(preferred: &[String]) -> Result<Vec<Box<dyn PackageManager>>> {
    let mut found = Vec::new();
    for name in preferred {
        let manager = by_name(name)?;
        if manager.is_available() {
            log::debug!("detected package manager: {}", name);
            found.push(manager);
        }
    }
    if found.is_empty() {
        return Err(Error::NoPackageManager);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_knows_every_supported_backend() {
        for name in SUPPORTED {
            assert_eq!(by_name(name).unwrap().name(), name);
        }
    }

    #[test]
    fn by_name_rejects_unknown_backends() {
        let err = by_name("pacman").err().unwrap();
        assert!(matches!(err, Error::UnknownPackageManager(ref name) if name == "pacman"));
    }

    #[test]
    fn detect_with_no_candidates_fails() {
        assert!(matches!(detect(&[]), Err(Error::NoPackageManager)));
    }

    #[test]
    fn detect_propagates_unknown_names() {
        let err = detect(&["zypper".to_string()]).err().unwrap();
        assert!(matches!(err, Error::UnknownPackageManager(_)));
    }
}
