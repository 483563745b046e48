use crate::output::print_report;
use crate::terminal::TerminalPrompter;
use anyhow::Context;
use ofcourse_core::prompt::Prompter;
use ofcourse_core::scaffold::{self, FileStatus};
use ofcourse_core::OfcourseError;
use std::path::Path;

const SYNC_PROMPT: &str = "Replace templates/ and static/ with the versions shipped with this \
                           ofcourse? Local edits to those files will be lost";

pub fn run(root: &Path, yes: bool) -> anyhow::Result<()> {
    if !yes && !TerminalPrompter.confirm(SYNC_PROMPT)? {
        println!("Sync cancelled.");
        return Ok(());
    }

    println!("Syncing course site in: {}", root.display());
    let report = match scaffold::sync_templates(root) {
        Ok(report) => report,
        Err(OfcourseError::TemplatesMissing(dir)) => anyhow::bail!(
            "no templates directory at {dir}; is this a course site? \
             Run `ofcourse new` to create one"
        ),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to sync {}", root.display()));
        }
    };

    print_report(root, &report);

    if report.count(FileStatus::Updated) == 0 {
        println!("\nTemplates already up to date.");
        return Ok(());
    }
    println!("\nTemplates updated. Review and commit them:");
    println!("  git diff templates static");
    println!("  git add templates static && git commit -m \"Sync ofcourse templates\"");
    println!("To undo, discard the changes:");
    println!("  git checkout -- templates static");
    Ok(())
}
