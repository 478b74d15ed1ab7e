// Release builds get no console window
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

#[cfg(target_os = "windows")]
mod windows_main;

use std::process::ExitCode;

use tracing::info;
use vdesk_overlay::{logging, settings::app_data_dir};

fn main() -> ExitCode {
    // Flushes the log file on drop, keep it until the end of main
    let _log_guard = logging::init(app_data_dir().as_deref());
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    #[cfg(target_os = "windows")]
    let code = windows_main::run();

    #[cfg(not(target_os = "windows"))]
    let code = {
        tracing::error!("virtual desktops are a Windows feature; nothing to show on this platform");
        ExitCode::FAILURE
    };

    code
}
