// The default handler aborts the process on fatal failures

use std::process::Command;

const CHILD: &str = "VOUCH_ABORT_CHILD";

#[test]
fn test_default_handler_aborts() {
    if std::env::var_os(CHILD).is_some() {
        vouch::teardown();
        let value = 1;
        vouch::assert!(value == 2, "fatal");
        // Only reached if the handler returned
        std::process::exit(0);
    }

    let exe = std::env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args(["test_default_handler_aborts", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD, "1")
        .env("VOUCH_COLOR", "never")
        .env("VOUCH_STACK_TRACE", "0")
        .env_remove("VOUCH_ACTION")
        .env_remove("VOUCH_CONFIG")
        .output()
        .expect("spawn test binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Assertion failed at "), "{}", stderr);
    assert!(stderr.contains("    assert!(value == 2, ...);\n"));
    assert!(stderr.contains("        value: i32 => 1\n"));
    assert!(stderr.contains("    Message: fatal\n"));
    assert!(!stderr.contains("Stack trace:"));
}

#[test]
fn test_non_fatal_failures_return() {
    let config = vouch::Config {
        stack_trace: false,
        color: vouch::ColorChoice::Never,
        ..vouch::Config::default()
    };
    let mut reached = false;
    vouch::Context::new(config).scope(|| {
        vouch::check!(1 + 1 == 3);
        reached = true;
    });
    assert!(reached);
}
