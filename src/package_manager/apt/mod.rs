//! apt 后端 — 对 apt / apt-cache / dpkg-query 的封装

pub mod parser;

use super::runner::{binary_available, check_status, CommandRunner, SystemRunner};
use super::types::{Options, PackageInfo};
use super::PackageManager;
use crate::error::{Error, Result};

pub use parser::{
    parse_deleted_output, parse_dpkg_query_output, parse_install_output, parse_list_installed_output,
    parse_list_upgradable_output, parse_package_info_output, parse_search_candidates, reconcile_candidates,
    StatusResolution,
};

pub const PM: &str = "apt";

const APT: &str = "apt";
const APT_CACHE: &str = "apt-cache";
const DPKG_QUERY: &str = "dpkg-query";

pub const ARGS_ASSUME_YES: &str = "-y";
pub const ARGS_DRY_RUN: &str = "--dry-run";
pub const ARGS_ONLY_UPGRADE: &str = "--only-upgrade";

/// 所有 apt/dpkg 命令都在非交互环境中运行，输出保持英文以便解析
pub const ENV_NON_INTERACTIVE: [(&str, &str); 3] = [
    ("LC_ALL", "C"),
    ("DEBIAN_FRONTEND", "noninteractive"),
    ("DEBCONF_NONINTERACTIVE_SEEN", "true"),
];

const STATUS_FORMAT: &str = "${binary:Package} ${Status} ${Version}\n";
const INSTALLED_FORMAT: &str = "${binary:Package} ${Version}\n";
const NOT_FOUND_MARKER: &str = "no packages found matching";

#[derive(Debug, Clone, Default)]
pub struct AptManager<R = SystemRunner> {
    runner: R,
}

impl AptManager<SystemRunner> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> AptManager<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn run(&self, program: &str, args: Vec<String>) -> Result<String> {
        let output = self.runner.run(program, &args, &ENV_NON_INTERACTIVE)?;
        Ok(check_status(program, output)?.stdout)
    }

    /// `apt <subcommand> [-y] [--dry-run] [extra...] packages...`
    fn mutating_args(subcommand: &str, extra: &[&str], packages: &[String], opts: &Options) -> Vec<String> {
        let mut args = vec![subcommand.to_string()];
        if !opts.interactive {
            args.push(ARGS_ASSUME_YES.to_string());
        }
        if opts.dry_run {
            args.push(ARGS_DRY_RUN.to_string());
        }
        args.extend(extra.iter().map(|s| s.to_string()));
        args.extend(packages.iter().cloned());
        args
    }

    /// 通过 dpkg-query 确认搜索候选包的真实安装状态
    ///
    /// 部分包名不存在时 dpkg-query 以退出码 1 结束并输出
    /// "no packages found matching"，这种情况不视为错误。
    pub fn get_package_status(&self, candidates: &[PackageInfo]) -> Result<Vec<PackageInfo>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["-W".to_string(), "--showformat".to_string(), STATUS_FORMAT.to_string()];
        args.extend(candidates.iter().map(|pkg| pkg.name.clone()));

        let output = self.runner.run(DPKG_QUERY, &args, &ENV_NON_INTERACTIVE)?;
        let combined = output.combined_output();
        if !output.success() {
            if output.code == Some(1) && combined.contains(NOT_FOUND_MARKER) {
                log::warn!("{}: dpkg-query could not find some packages", PM);
            } else {
                return Err(Error::CommandFailed {
                    program: DPKG_QUERY.to_string(),
                    code: output.code,
                    output: combined,
                });
            }
        }

        let resolution = parse_dpkg_query_output(&combined, candidates, PM);
        Ok(reconcile_candidates(candidates, resolution))
    }

    /// 解析 `apt search` 输出并补全安装状态
    pub fn parse_find_output(&self, output: &str, opts: &Options) -> Result<Vec<PackageInfo>> {
        let candidates = parse_search_candidates(output, PM, opts);
        self.get_package_status(&candidates)
    }
}

impl<R: CommandRunner> PackageManager for AptManager<R> {
    fn name(&self) -> &'static str {
        PM
    }

    fn is_available(&self) -> bool {
        binary_available(APT)
    }

    fn install(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = Self::mutating_args("install", &[], packages, opts);
        let output = self.run(APT, args)?;
        Ok(parse_install_output(&output, PM, opts))
    }

    fn delete(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = Self::mutating_args("remove", &[], packages, opts);
        let output = self.run(APT, args)?;
        Ok(parse_deleted_output(&output, PM, opts))
    }

    fn refresh(&self, _opts: &Options) -> Result<()> {
        self.run(APT, vec!["update".to_string()])?;
        Ok(())
    }

    fn find(&self, keywords: &[String], opts: &Options) -> Result<Vec<PackageInfo>> {
        let mut args = vec!["search".to_string()];
        args.extend(keywords.iter().cloned());
        let output = self.run(APT, args)?;
        self.parse_find_output(&output, opts)
    }

    fn list_installed(&self, opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = vec!["-W".to_string(), "-f".to_string(), INSTALLED_FORMAT.to_string()];
        let output = self.run(DPKG_QUERY, args)?;
        Ok(parse_list_installed_output(&output, PM, opts))
    }

    fn list_upgradable(&self, opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = vec!["list".to_string(), "--upgradable".to_string()];
        let output = self.run(APT, args)?;
        Ok(parse_list_upgradable_output(&output, PM, opts))
    }

    fn upgrade(&self, packages: &[String], opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = Self::mutating_args("install", &[ARGS_ONLY_UPGRADE], packages, opts);
        let output = self.run(APT, args)?;
        Ok(parse_install_output(&output, PM, opts))
    }

    fn upgrade_all(&self, opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = Self::mutating_args("upgrade", &[], &[], opts);
        let output = self.run(APT, args)?;
        Ok(parse_install_output(&output, PM, opts))
    }

    fn get_package_info(&self, package: &str, opts: &Options) -> Result<PackageInfo> {
        let args = vec!["show".to_string(), package.to_string()];
        let output = self.run(APT_CACHE, args)?;
        Ok(parse_package_info_output(&output, PM, opts))
    }

    fn clean(&self, _opts: &Options) -> Result<()> {
        self.run(APT, vec!["autoclean".to_string()])?;
        Ok(())
    }

    fn auto_remove(&self, opts: &Options) -> Result<Vec<PackageInfo>> {
        let args = Self::mutating_args("autoremove", &[], &[], opts);
        let output = self.run(APT, args)?;
        Ok(parse_deleted_output(&output, PM, opts))
    }
}
