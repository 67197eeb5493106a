//! Opening rendered images in the desktop viewer (`--show`).
//!
//! The viewer command comes from `FPSPLOT_VIEWER` when set, otherwise the
//! platform opener. Launch failures are logged, never fatal: the image is
//! already on disk.

use std::path::Path;
use std::process::Command;

/// Environment variable overriding the viewer command.
pub const VIEWER_ENV: &str = "FPSPLOT_VIEWER";

/// Resolve the viewer program and its leading arguments.
pub fn viewer_command(override_cmd: Option<&str>) -> (String, Vec<String>) {
    if let Some(cmd) = override_cmd.map(str::trim).filter(|c| !c.is_empty()) {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        // Non-empty after trim, so there is at least one part.
        let program = parts.next().unwrap_or_default();
        return (program, parts.collect());
    }

    if cfg!(target_os = "macos") {
        ("open".to_string(), Vec::new())
    } else if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec!["/C".to_string(), "start".to_string(), String::new()],
        )
    } else {
        ("xdg-open".to_string(), Vec::new())
    }
}

/// Spawn the viewer on `image` without waiting for it.
pub fn show_image(image: &Path) {
    let override_cmd = std::env::var(VIEWER_ENV).ok();
    let (program, args) = viewer_command(override_cmd.as_deref());

    match Command::new(&program).args(&args).arg(image).spawn() {
        Ok(_) => log::info!("opened {} with {program}", image.display()),
        Err(e) => log::warn!("could not open {} with {program}: {e}", image.display()),
    }
}
