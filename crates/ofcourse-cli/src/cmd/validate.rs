use crate::output::print_json;
use ofcourse_core::validate::validate_course;
use std::path::Path;

/// Validate the course at `root` and report. Returns the number of errors.
pub fn run(root: &Path, json: bool) -> anyhow::Result<usize> {
    let result = validate_course(root);

    if json {
        print_json(&result)?;
        return Ok(result.len());
    }

    for error in result.iter() {
        let shown = error.file.strip_prefix(root).unwrap_or(&error.file);
        if error.field.is_empty() {
            println!("{}: {}", shown.display(), error.message);
        } else {
            println!("{}: {}: {}", shown.display(), error.field, error.message);
        }
    }

    if result.is_valid() {
        println!("All course files are valid.");
    } else {
        println!("\n{} error(s) found.", result.len());
    }
    Ok(result.len())
}

/// Process exit code for `errors` failures. Exit statuses wrap at 256, so
/// large counts are pinned to 255 rather than reading as success.
pub fn exit_code(errors: usize) -> i32 {
    errors.min(255) as i32
}
