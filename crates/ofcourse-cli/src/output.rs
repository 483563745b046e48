use ofcourse_core::scaffold::ScaffoldReport;
use serde::Serialize;
use std::path::Path;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One `  <status>: <path>` line per file, paths shown relative to `root`.
pub fn print_report(root: &Path, report: &ScaffoldReport) {
    for (path, status) in &report.files {
        let shown = path.strip_prefix(root).unwrap_or(path);
        let label = format!("{}:", status.as_str());
        println!("  {label:<10} {}", shown.display());
    }
}
