use crate::env::Environment;
use crate::error::StackxError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Locate the delegate executable once, using the caller's `PATH`.
pub fn locate_delegate(program: &str, env: &Environment) -> Result<PathBuf, StackxError> {
    let search_paths = env.get("PATH").unwrap_or_default();
    find_command_path(search_paths, Path::new(program))
        .map(Cow::into_owned)
        .ok_or_else(|| StackxError::DelegateNotFound {
            program: program.to_string(),
        })
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: returned if it is an executable file.
/// - `./foo`, or a relative path with several components (`bin/docker`):
///   returned if it is an executable file relative to the current directory.
/// - Single component: the first executable match in `search_paths` (PATH).
///   Files without an execute bit are skipped, like shells do.
/// - Empty path: `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && is_executable(path) {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
