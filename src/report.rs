//! 把解析结果格式化为终端文本或 JSON

use crate::error::Result;
use crate::package_manager::PackageInfo;

const HEADERS: [&str; 6] = ["NAME", "VERSION", "NEW VERSION", "STATUS", "ARCH", "CATEGORY"];

fn row(pkg: &PackageInfo) -> [String; 6] {
    [
        pkg.name.clone(),
        pkg.version.clone(),
        pkg.new_version.clone(),
        pkg.status.to_string(),
        pkg.arch.clone(),
        pkg.category.clone(),
    ]
}

/// 按列对齐的文本表格，末尾带换行
pub fn render_table(packages: &[PackageInfo]) -> String {
    if packages.is_empty() {
        return "No packages found.\n".to_string();
    }

    let rows: Vec<[String; 6]> = packages.iter().map(row).collect();
    let mut widths = HEADERS.map(str::len);
    for r in &rows {
        for (width, cell) in widths.iter_mut().zip(r.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    for cells in std::iter::once(header.as_slice()).chain(rows.iter().map(|r| r.as_slice())) {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

pub fn render_json(packages: &[PackageInfo]) -> Result<String> {
    Ok(serde_json::to_string_pretty(packages)?)
}
