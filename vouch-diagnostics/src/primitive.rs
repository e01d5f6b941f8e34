// Internal invariant checks
//
// These never touch the stringifier or the renderer, so they stay usable while
// a report is being built.

use std::fmt;
use std::io::Write;

/// Print a fixed-format failure for a broken internal invariant and abort.
#[cold]
#[inline(never)]
pub fn primitive_failed(
    verification: bool,
    expression: &str,
    file: &str,
    line: u32,
    module: &str,
    message: Option<fmt::Arguments<'_>>,
) -> ! {
    let (action, name) = if verification {
        ("Verification", "verify")
    } else {
        ("Assertion", "assert")
    };

    let mut output = format!("{} failed at {}:{}: {}", action, file, line, module);
    if let Some(message) = message {
        output.push_str(": ");
        output.push_str(&message.to_string());
    }
    output.push_str(&format!("\n    primitive_{}!({});\n", name, expression));

    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(output.as_bytes());
    let _ = stderr.flush();
    std::process::abort()
}

/// Check an internal invariant in debug builds.
#[macro_export]
macro_rules! primitive_assert {
    ($cond:expr $(,)?) => {
        if ::core::cfg!(debug_assertions) && !$cond {
            $crate::primitive::primitive_failed(
                false,
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!(),
                ::core::module_path!(),
                ::core::option::Option::None,
            )
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if ::core::cfg!(debug_assertions) && !$cond {
            $crate::primitive::primitive_failed(
                false,
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!(),
                ::core::module_path!(),
                ::core::option::Option::Some(::core::format_args!($($arg)+)),
            )
        }
    };
}

/// Check an internal invariant in every build.
#[macro_export]
macro_rules! primitive_verify {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::primitive::primitive_failed(
                true,
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!(),
                ::core::module_path!(),
                ::core::option::Option::None,
            )
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::primitive::primitive_failed(
                true,
                ::core::stringify!($cond),
                ::core::file!(),
                ::core::line!(),
                ::core::module_path!(),
                ::core::option::Option::Some(::core::format_args!($($arg)+)),
            )
        }
    };
}
