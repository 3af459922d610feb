//! syspkg — 对系统原生包管理器（apt、dnf）的统一封装
//!
//! 每个后端调用对应的系统命令，并把其文本输出解析为统一的 [`PackageInfo`]。

pub mod config;
pub mod error;
pub mod package_manager;
pub mod report;

pub use config::Config;
pub use error::{Error, Result};
pub use package_manager::{
    AptManager, CommandOutput, CommandRunner, DnfManager, Options, PackageInfo, PackageManager, PackageStatus,
    SystemRunner,
};
