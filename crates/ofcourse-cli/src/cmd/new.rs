use crate::output::print_report;
use anyhow::Context;
use ofcourse_core::scaffold::{self, FileStatus};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Creating course site in: {}", root.display());

    let today = chrono::Local::now().date_naive();
    let report = scaffold::new_course(root, today)
        .with_context(|| format!("failed to create course in {}", root.display()))?;
    print_report(root, &report);

    let kept = report.count(FileStatus::Exists);
    if kept > 0 {
        println!("\n{kept} existing file(s) left untouched.");
    }
    println!("\nCourse created.");
    println!("Next: edit site.yaml and assignments.yaml, then run `ofcourse validate`");
    Ok(())
}
