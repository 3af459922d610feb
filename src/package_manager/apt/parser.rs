//! apt / dpkg 输出解析函数
//!
//! 所有解析器都是尽力而为：格式不符的行直接跳过，不返回错误。

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::package_manager::types::{Options, PackageInfo, PackageStatus};

const SETTING_UP_MARKER: &str = "Setting up";
const REMOVING_MARKER: &str = "Removing";
const LISTING_BANNER: &str = "Listing...";
const SEARCH_BANNERS: [&str; 2] = ["Sorting...", "Full Text Search..."];
const DPKG_QUERY_DIAGNOSTIC: &str = "dpkg-query:";
const PARENS: &[char] = &['(', ')'];

fn search_entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.+-]+/[\w.,+-]+").expect("valid search entry regex"))
}

/// 拆分 `name:arch`，没有架构后缀时 arch 为空
fn split_arch(token: &str) -> (&str, &str) {
    token.split_once(':').unwrap_or((token, ""))
}

fn trace_line(pm: &str, opts: &Options, line: &str) {
    if opts.verbose {
        log::debug!("{}: {}", pm, line);
    }
}

/// 解析 `apt install` / `apt upgrade` 的输出
///
/// 只关心 `Setting up NAME[:ARCH] (VERSION) ...` 行。
pub fn parse_install_output(output: &str, pm: &str, opts: &Options) -> Vec<PackageInfo> {
    let mut packages = Vec::new();

    for line in output.lines() {
        trace_line(pm, opts, line);
        if !line.starts_with(SETTING_UP_MARKER) {
            continue;
        }

        // ["Setting", "up", name, "(version)", ...]
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }

        let (name, arch) = split_arch(parts[2]);
        if name.is_empty() {
            continue;
        }
        let version = parts[3].trim_matches(PARENS);

        packages.push(PackageInfo {
            name: name.to_string(),
            version: version.to_string(),
            new_version: version.to_string(),
            status: PackageStatus::Installed,
            category: String::new(),
            arch: arch.to_string(),
            package_manager: pm.to_string(),
        });
    }

    packages
}

/// 解析 `apt remove` / `apt autoremove` 的输出
///
/// 被移除的包仍在索引中，状态记为 available。
pub fn parse_deleted_output(output: &str, pm: &str, opts: &Options) -> Vec<PackageInfo> {
    let mut packages = Vec::new();

    for line in output.lines() {
        trace_line(pm, opts, line);
        if !line.starts_with(REMOVING_MARKER) {
            continue;
        }

        // ["Removing", name, "(version)", ...]
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        if opts.verbose {
            log::debug!("{}: parts: {:?}", pm, parts);
        }

        let (name, arch) = split_arch(parts[1]);
        if name.is_empty() {
            continue;
        }

        packages.push(PackageInfo {
            name: name.to_string(),
            version: parts[2].trim_matches(PARENS).to_string(),
            new_version: String::new(),
            status: PackageStatus::Available,
            category: String::new(),
            arch: arch.to_string(),
            package_manager: pm.to_string(),
        });
    }

    packages
}

/// 解析 `dpkg-query -W -f '${binary:Package} ${Version}\n'` 的输出
pub fn parse_list_installed_output(output: &str, pm: &str, opts: &Options) -> Vec<PackageInfo> {
    let mut packages = Vec::new();

    for line in output.lines() {
        trace_line(pm, opts, line);
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let (name, arch) = split_arch(parts[0]);
        if name.is_empty() {
            continue;
        }

        packages.push(PackageInfo {
            name: name.to_string(),
            version: parts[1].to_string(),
            new_version: String::new(),
            status: PackageStatus::Installed,
            category: String::new(),
            arch: arch.to_string(),
            package_manager: pm.to_string(),
        });
    }

    packages
}

/// 解析 `apt list --upgradable` 的输出
///
/// ```text
/// Listing...
/// cloudflared/unknown 2023.4.0 amd64 [upgradable from: 2023.3.1]
/// libllvm15/jammy-updates 1:15.0.7-0ubuntu0.22.04.1 amd64 [upgradable from: 1:15.0.6-3~ubuntu0.22.04.2]
/// ```
///
/// 注意这里 `version` 是当前已安装的旧版本，`new_version` 是可升级到的版本。
pub fn parse_list_upgradable_output(output: &str, pm: &str, opts: &Options) -> Vec<PackageInfo> {
    let mut packages = Vec::new();

    for line in output.lines() {
        trace_line(pm, opts, line);
        if line.starts_with(LISTING_BANNER) {
            continue;
        }

        // [name/category, new_version, arch, "[upgradable", "from:", "old]"]
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            continue;
        }
        let Some((name, category)) = parts[0].split_once('/') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        packages.push(PackageInfo {
            name: name.to_string(),
            version: parts[5].trim_end_matches(']').to_string(),
            new_version: parts[1].to_string(),
            status: PackageStatus::Upgradable,
            category: category.to_string(),
            arch: parts[2].to_string(),
            package_manager: pm.to_string(),
        });
    }

    packages
}

/// 解析 `apt search` 的输出，得到待确认状态的候选包
///
/// ```text
/// Sorting...
/// Full Text Search...
/// zutty/jammy 0.11.2.20220109.192032+dfsg1-1 amd64
///   Efficient full-featured X11 terminal emulator
///
/// zvbi/jammy 0.2.35-19 amd64
///   Vertical Blanking Interval (VBI) utilities
/// ```
///
/// 候选包的状态保持 unknown，需要再经过 dpkg-query 确认。
/// 同名条目后出现的覆盖先出现的，但保留首次出现的位置。
pub fn parse_search_candidates(output: &str, pm: &str, opts: &Options) -> Vec<PackageInfo> {
    let mut candidates: Vec<PackageInfo> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut block_start = true;
    let mut in_banner = true;

    for line in output.lines() {
        trace_line(pm, opts, line);

        if in_banner && SEARCH_BANNERS.iter().any(|banner| line.starts_with(banner)) {
            continue;
        }
        in_banner = false;

        if line.trim().is_empty() {
            block_start = true;
            continue;
        }
        // 描述行（缩进的续行）不会匹配
        let is_head = block_start && search_entry_regex().is_match(line);
        block_start = false;
        if !is_head {
            continue;
        }

        // [name/category, version, arch, ...]
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let Some((name, category)) = parts[0].split_once('/') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let candidate = PackageInfo {
            name: name.to_string(),
            version: parts[1].to_string(),
            new_version: parts[1].to_string(),
            status: PackageStatus::Unknown,
            category: category.to_string(),
            arch: parts[2].to_string(),
            package_manager: pm.to_string(),
        };

        match index.get(name) {
            Some(&i) => candidates[i] = candidate,
            None => {
                index.insert(name.to_string(), candidates.len());
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// dpkg-query 的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusResolution {
    /// 按 dpkg-query 输出顺序排列的已确认记录
    pub packages: Vec<PackageInfo>,
    /// dpkg-query 给出过答复（包括 "no packages found"）的包名
    pub resolved: HashSet<String>,
}

/// 解析 `dpkg-query -W --showformat '${binary:Package} ${Status} ${Version}\n'` 的输出
///
/// ```text
/// foo install ok installed 1.0-1
/// baz deinstall ok config-files 2.3
/// dpkg-query: no packages found matching bar
/// ```
///
/// 每一行补全 `candidates` 中同名的候选记录；不在候选中的包名从空记录开始。
pub fn parse_dpkg_query_output(output: &str, candidates: &[PackageInfo], pm: &str) -> StatusResolution {
    let lookup: HashMap<&str, &PackageInfo> =
        candidates.iter().map(|pkg| (pkg.name.as_str(), pkg)).collect();
    let mut resolution = StatusResolution::default();

    for line in output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&last) = parts.last() else {
            continue;
        };

        let diagnostic = parts[0].starts_with(DPKG_QUERY_DIAGNOSTIC);
        // 诊断行至少要带一个包名，普通行至少要有包名和状态
        if parts.len() < 2 {
            continue;
        }

        // 诊断行的包名在行尾
        let name_token = if diagnostic { last } else { parts[0] };
        let (name, arch) = split_arch(name_token);
        if name.is_empty() {
            continue;
        }

        let version = if last.starts_with(|c: char| c.is_ascii_digit()) { last } else { "" };

        let mut pkg = match lookup.get(name) {
            Some(candidate) => (*candidate).clone(),
            None => PackageInfo::new(name, pm),
        };
        // 多架构包每个架构各占一行，以 dpkg-query 报告的架构为准
        if !arch.is_empty() {
            pkg.arch = arch.to_string();
        }

        if diagnostic {
            pkg.status = PackageStatus::Unknown;
            pkg.version = String::new();
        } else if parts[parts.len() - 2] == "installed" {
            pkg.status = PackageStatus::Installed;
            pkg.version = version.to_string();
        } else {
            pkg.status = PackageStatus::Available;
            pkg.version = version.to_string();
        }

        resolution.resolved.insert(name.to_string());
        resolution.packages.push(pkg);
    }

    resolution
}

/// 合并 dpkg-query 的结果：已确认的在前，未得到答复的候选以 unknown 状态追加在后
pub fn reconcile_candidates(candidates: &[PackageInfo], resolution: StatusResolution) -> Vec<PackageInfo> {
    let StatusResolution { mut packages, resolved } = resolution;

    for candidate in candidates.iter().filter(|pkg| !resolved.contains(&pkg.name)) {
        log::warn!("{}: package not found by dpkg-query: {}", candidate.package_manager, candidate.name);
        packages.push(PackageInfo {
            status: PackageStatus::Unknown,
            ..candidate.clone()
        });
    }

    packages
}

/// 解析 `apt-cache show` 的输出
///
/// 多个版本时只取第一段（apt 的候选版本）。
pub fn parse_package_info_output(output: &str, pm: &str, opts: &Options) -> PackageInfo {
    let mut pkg = PackageInfo::new("", pm);

    for line in output.lines() {
        trace_line(pm, opts, line);
        if line.trim().is_empty() {
            if !pkg.name.is_empty() {
                break;
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "Package" => pkg.name = value.to_string(),
            "Version" => pkg.version = value.to_string(),
            "Architecture" => pkg.arch = value.to_string(),
            "Section" => pkg.category = value.to_string(),
            _ => {}
        }
    }

    pkg
}
