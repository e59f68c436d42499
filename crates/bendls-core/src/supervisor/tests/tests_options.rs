//! Tests for ServerOptions

use crate::supervisor::{LaunchMode, ServerOptions};

#[test]
fn test_for_command_uses_same_command_in_both_modes() {
    let options = ServerOptions::for_command("/storage/bin/bend-language-server");

    assert_eq!(options.run.command, "/storage/bin/bend-language-server");
    assert_eq!(options.debug.command, "/storage/bin/bend-language-server");
    assert!(options.run.args.is_empty());
}

#[test]
fn test_run_mode_logs_at_info() {
    let options = ServerOptions::for_command("bend-language-server");
    assert_eq!(
        options.spec(LaunchMode::Run).env.get("RUST_LOG").map(String::as_str),
        Some("info")
    );
}

#[test]
fn test_debug_mode_logs_at_debug() {
    let options = ServerOptions::for_command("bend-language-server");
    assert_eq!(
        options.spec(LaunchMode::Debug).env.get("RUST_LOG").map(String::as_str),
        Some("debug")
    );
}

#[test]
fn test_default_launch_mode_is_run() {
    assert_eq!(LaunchMode::default(), LaunchMode::Run);
}
