//! Best-effort folder reveal in the OS file manager.
//!
//! After a successful conversion the shells offer to show the output file's
//! containing folder. The mechanism differs per OS family and is strictly
//! fire-and-forget: a failure here must never fail the conversion, so errors
//! are logged and swallowed.

use std::path::Path;
use std::process::Command;

/// Open the folder containing `file` in the platform file manager.
///
/// Spawns `explorer` on Windows, `open` on macOS, and `xdg-open` elsewhere,
/// without waiting for the child. Failures (missing tool, no parent
/// directory) are logged at warn level and otherwise ignored.
pub fn reveal_containing_folder(file: &Path) {
    let Some(folder) = file.parent().filter(|parent| !parent.as_os_str().is_empty()) else {
        log::warn!("No containing folder to reveal for {}", file.display());
        return;
    };

    let result = open_in_file_manager(folder);
    if let Err(error) = result {
        log::warn!("Could not open folder {}: {error}", folder.display());
    }
}

#[cfg(target_os = "windows")]
fn open_in_file_manager(folder: &Path) -> std::io::Result<()> {
    Command::new("explorer").arg(folder).spawn().map(|_| ())
}

#[cfg(target_os = "macos")]
fn open_in_file_manager(folder: &Path) -> std::io::Result<()> {
    Command::new("open").arg(folder).spawn().map(|_| ())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_in_file_manager(folder: &Path) -> std::io::Result<()> {
    Command::new("xdg-open").arg(folder).spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rootless_path_does_not_panic() {
        // No parent directory: the reveal is skipped, not an error.
        reveal_containing_folder(Path::new("output.mp4"));
    }
}
