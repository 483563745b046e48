use ofcourse_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the course root directory.
///
/// Priority:
/// 1. `--root` flag / `OFCOURSE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `site.yaml`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = current_dir();
    find_upward(&cwd, |dir| dir.join(paths::SITE_FILE).is_file())
        .or_else(|| find_upward(&cwd, |dir| dir.join(".git").is_dir()))
        .unwrap_or(cwd)
}

/// `ofcourse new` never climbs: it builds the course where it is run.
pub fn explicit_or_cwd(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(current_dir)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn find_upward(start: &Path, found: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|dir| found(dir)).map(Path::to_path_buf)
}
