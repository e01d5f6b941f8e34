// vouch - assertions that explain themselves
//
//     let values = vec![1, 2, 3];
//     vouch::assert!(values.len() == 4, "three is not enough");
//
// fails with
//
//     Assertion failed at src/main.rs:3: demo::main
//         assert!(values.len() == 4, ...);
//         Where:
//             values.len(): usize => 3
//             4: usize            => 4
//         Message: three is not enough

extern crate self as vouch;

pub mod config;
pub mod context;
mod engine;
pub mod handler;
pub mod printer;
pub mod stacktrace;
pub mod stringify;
pub mod terminal;
mod truthy;

pub use config::{Action, ColorChoice, Config, ConfigError, PathStyle};
pub use context::{current, teardown, Context};
pub use handler::FailureHandler;
pub use printer::ReportPrinter;
pub use stringify::{AsMessage, Stringify};
pub use truthy::Truthy;
pub use vouch_diagnostics::{
    strip_colors, AssertKind, AssertionRecord, Frame, LiteralFormat, Operator, PathMode,
    RenderOptions, Repr, Severity,
};
pub use vouch_macros::{assert, check, debug_assert, verify, Stringify};

/// Used by macro-generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::engine::{
        fail, function_name, type_name_of_val, Capture, Failure, ViaDebug, ViaDisplay,
        ViaMessage, ViaNoMessage, ViaNothing, ViaStringify,
    };
    pub use vouch_diagnostics::Value;
}
