//! PackageManager 相关数据类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 包的安装状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    Installed,
    Upgradable,
    Available,
    #[default]
    Unknown,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Installed => "installed",
            PackageStatus::Upgradable => "upgradable",
            PackageStatus::Available => "available",
            PackageStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 统一的包信息记录，所有后端的解析器都产出这一结构
///
/// `version` 通常是已安装（或可用）的版本；但来自 `apt list --upgradable`
/// 的记录中，`version` 是当前已安装的旧版本，`new_version` 才是候选版本。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    /// 普通的已安装/可用列表中为空
    pub new_version: String,
    pub status: PackageStatus,
    pub category: String,
    pub arch: String,
    pub package_manager: String,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, package_manager: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_manager: package_manager.into(),
            ..Self::default()
        }
    }
}

/// 单次调用的选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub interactive: bool,
    pub dry_run: bool,
    /// 解析时逐行输出调试日志
    pub verbose: bool,
}

/// 命令输出结果
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// 进程被信号终止时为 `None`
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PackageStatus::Upgradable).unwrap();
        assert_eq!(json, "\"upgradable\"");
        assert_eq!(PackageStatus::Installed.to_string(), "installed");
    }

    #[test]
    fn new_record_starts_unknown() {
        let pkg = PackageInfo::new("curl", "apt");
        assert_eq!(pkg.name, "curl");
        assert_eq!(pkg.package_manager, "apt");
        assert_eq!(pkg.status, PackageStatus::Unknown);
        assert!(pkg.version.is_empty());
    }

    #[test]
    fn exit_code_zero_is_success() {
        let ok = CommandOutput { code: Some(0), ..Default::default() };
        let failed = CommandOutput { code: Some(1), ..Default::default() };
        let killed = CommandOutput { code: None, ..Default::default() };
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }

    #[test]
    fn combined_output_appends_stderr() {
        let out = CommandOutput {
            stdout: "foo install ok installed 1.0\n".to_string(),
            stderr: "dpkg-query: no packages found matching bar\n".to_string(),
            code: Some(1),
        };
        assert_eq!(
            out.combined_output(),
            "foo install ok installed 1.0\ndpkg-query: no packages found matching bar\n"
        );
    }
}
