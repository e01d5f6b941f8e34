// Evaluation semantics of the assertion macros

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use vouch::stacktrace::NoStackTrace;
use vouch::{AssertKind, Context, Severity};

/// Run `f` with a handler that records and continues
fn reports(f: impl FnOnce()) -> Vec<(AssertKind, Severity, String)> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    Context::default()
        .with_stack_trace(NoStackTrace)
        .on_failure(move |kind, severity, report| {
            if let Ok(mut seen) = sink.lock() {
                seen.push((kind, severity, report.render_plain(0)));
            }
        })
        .scope(f);
    let collected = seen.lock().map(|s| s.clone()).unwrap_or_default();
    collected
}

#[test]
fn test_operands_evaluated_once_in_order() {
    let calls = RefCell::new(Vec::new());
    let foo = || {
        calls.borrow_mut().push("foo");
        1
    };
    let bar = || {
        calls.borrow_mut().push("bar");
        2
    };

    vouch::assert!(foo() < bar());
    assert_eq!(*calls.borrow(), ["foo", "bar"]);

    let failed = reports(|| vouch::assert!(foo() > bar()));
    assert_eq!(failed.len(), 1);
    assert_eq!(*calls.borrow(), ["foo", "bar", "foo", "bar"]);
}

#[test]
fn test_logical_operators_short_circuit() {
    let called = RefCell::new(0);
    let side = || {
        *called.borrow_mut() += 1;
        true
    };

    vouch::assert!(true || side());
    assert_eq!(*called.borrow(), 0);

    let failed = reports(|| vouch::assert!(false && side()));
    assert_eq!(*called.borrow(), 0);
    let (_, _, text) = &failed[0];
    assert!(text.contains("        false: bool => false\n"));
    assert!(!text.contains("side(): bool"));

    let failed = reports(|| vouch::assert!(false || !side()));
    assert_eq!(*called.borrow(), 1);
    assert!(failed[0].2.contains("!side(): bool => false"));
}

#[test]
fn test_place_operands_are_borrowed() {
    let names = vec![String::from("a"), String::from("b")];
    vouch::assert!(names == vec!["a", "b"]);
    vouch::assert!(names[1] == "b");
    // still usable: nothing was moved into the assertion
    assert_eq!(names.len(), 2);
}

#[test]
fn test_verify_returns_the_value() {
    let x = 2;
    let left: &i32 = vouch::verify!(x == 2);
    assert_eq!(*left, 2);

    let len = || 3usize;
    let owned: usize = vouch::verify!(len() > 0);
    assert_eq!(owned, 3);

    let flags: u8 = vouch::verify!(0b0110 & 0b0010u8);
    assert_eq!(flags, 0b0010);

    let found = vouch::verify!(Some(5));
    assert_eq!(found, Some(5));
}

#[test]
fn test_failed_verify_hands_back_control() {
    let mut got = 0;
    let failed = reports(|| {
        got = vouch::verify!(1 + 1 == 3);
    });
    assert_eq!(got, 2);
    assert_eq!(failed[0].0, AssertKind::Verify);
    assert!(failed[0].2.starts_with("Verification failed at "));
}

#[test]
fn test_assignments() {
    let mut x = 5;
    vouch::assert!(x += 1);
    assert_eq!(x, 6);

    let failed = reports(|| vouch::assert!(x -= 6));
    assert_eq!(x, 0);
    let text = &failed[0].2;
    assert!(text.contains("    assert!(x -= 6);\n"));
    assert!(text.contains("        x: i32 => 0\n"));
}

#[test]
fn test_extras_may_name_the_assigned_place() {
    let mut x = 1;
    vouch::assert!(x += 1, x);
    assert_eq!(x, 2);

    let failed = reports(|| vouch::assert!(x -= 2, "x after", x));
    assert_eq!(x, 0);
    let text = &failed[0].2;
    assert!(text.contains("    assert!(x -= 2, ...);\n"));
    assert!(text.contains("    Extra diagnostics:\n        x: i32 => 0\n"));
    assert!(text.contains("Message: x after"));
}

#[test]
fn test_extras_only_on_failure() {
    let evaluated = RefCell::new(0);
    let expensive = || {
        *evaluated.borrow_mut() += 1;
        "details"
    };

    vouch::assert!(1 == 1, expensive());
    assert_eq!(*evaluated.borrow(), 0);

    let failed = reports(|| vouch::assert!(1 == 2, expensive()));
    assert_eq!(*evaluated.borrow(), 1);
    assert!(failed[0].2.contains("Message: details"));
}

#[test]
fn test_check_is_non_fatal() {
    let failed = reports(|| vouch::check!(2 + 2 == 5));
    assert_eq!(failed[0].1, Severity::NonFatal);
    assert!(failed[0].2.contains("    check!(2 + 2 == 5);\n"));
}

#[test]
fn test_debug_assert_follows_build_profile() {
    let failed = reports(|| vouch::debug_assert!(1 > 2));
    if cfg!(debug_assertions) {
        assert_eq!(failed[0].0, AssertKind::DebugAssert);
        assert!(failed[0].2.starts_with("Debug assertion failed at "));
    } else {
        assert!(failed.is_empty());
    }
}

#[test]
#[should_panic(expected = "Assertion failed at")]
fn test_panic_action() {
    let config = vouch::Config {
        action: vouch::Action::Panic,
        stack_trace: false,
        ..vouch::Config::default()
    };
    Context::new(config).scope(|| vouch::assert!(1 == 2));
}
