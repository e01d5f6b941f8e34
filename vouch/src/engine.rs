// Runtime half of the assertion macros
//
// The generated code picks a stringification strategy per operand through
// autoref method resolution: `(&&&Capture(x)).__vouch_repr(f)` resolves to
// the first tier whose receiver and bounds match.

use std::fmt::{Debug, Display};

use vouch_diagnostics::{
    AssertKind, AssertionRecord, LiteralFormat, Location, Operator, Repr, Severity, Value,
};

use crate::context;
use crate::stringify::{AsMessage, Stringify};

/// A borrowed operand awaiting stringification
pub struct Capture<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized> Clone for Capture<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Capture<'_, T> {}

pub trait ViaStringify {
    fn __vouch_repr(self, format: LiteralFormat) -> Option<Repr>;
}

impl<T: Stringify + ?Sized> ViaStringify for &&&Capture<'_, T> {
    fn __vouch_repr(self, format: LiteralFormat) -> Option<Repr> {
        Some(self.0.repr(format))
    }
}

pub trait ViaDebug {
    fn __vouch_repr(self, format: LiteralFormat) -> Option<Repr>;
}

impl<T: Debug + ?Sized> ViaDebug for &&Capture<'_, T> {
    fn __vouch_repr(self, _: LiteralFormat) -> Option<Repr> {
        Some(Repr::text(format!("{:?}", self.0), format!("{:#?}", self.0)))
    }
}

pub trait ViaDisplay {
    fn __vouch_repr(self, format: LiteralFormat) -> Option<Repr>;
}

impl<T: Display + ?Sized> ViaDisplay for &Capture<'_, T> {
    fn __vouch_repr(self, _: LiteralFormat) -> Option<Repr> {
        Some(Repr::atom(self.0.to_string()))
    }
}

pub trait ViaNothing {
    fn __vouch_repr(self, format: LiteralFormat) -> Option<Repr>;
}

impl<T: ?Sized> ViaNothing for Capture<'_, T> {
    fn __vouch_repr(self, _: LiteralFormat) -> Option<Repr> {
        None
    }
}

pub trait ViaMessage<'a> {
    fn __vouch_message(self) -> Option<&'a str>;
}

impl<'a, T: AsMessage + ?Sized> ViaMessage<'a> for &&Capture<'a, T> {
    fn __vouch_message(self) -> Option<&'a str> {
        let value: &'a T = self.0;
        Some(value.as_message())
    }
}

pub trait ViaNoMessage<'a> {
    fn __vouch_message(self) -> Option<&'a str>;
}

impl<'a, T: ?Sized> ViaNoMessage<'a> for &Capture<'a, T> {
    fn __vouch_message(self) -> Option<&'a str> {
        None
    }
}

/// Everything the call site knows about a failed check. Nothing in here has
/// been stringified yet.
pub struct Failure<'a> {
    pub kind: AssertKind,
    pub severity: Severity,
    pub macro_name: &'a str,
    pub file: &'a str,
    pub line: u32,
    pub column: u32,
    pub function: &'a str,
    pub expression: &'a str,
    pub operator: Operator,
    pub operands: &'a [Value<'a>],
    pub extras: &'a [Value<'a>],
    /// First extra argument, when it is string-like
    pub message: Option<&'a str>,
}

impl<'a> Failure<'a> {
    pub fn into_record(self) -> AssertionRecord<'a> {
        let extras = match self.message {
            Some(_) => self.extras.get(1..).unwrap_or_default(),
            None => self.extras,
        };
        AssertionRecord {
            kind: self.kind,
            severity: self.severity,
            location: Location {
                file: self.file,
                line: self.line,
                column: self.column,
                function: self.function,
            },
            macro_name: self.macro_name,
            expression: self.expression,
            operator: self.operator,
            operands: self.operands.to_vec(),
            extras: extras.to_vec(),
            message: self.message,
            trace: Vec::new(),
        }
    }
}

/// Entry point for every failed assertion. Stack traces are trimmed at this
/// frame, so it must never be inlined.
#[cold]
#[inline(never)]
pub fn fail(failure: Failure<'_>) {
    let context = context::current();
    context.dispatch(failure.into_record());
}

pub fn type_name_of_val<T: ?Sized>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// Path of the function enclosing an assertion, given the type name of a
/// marker fn item declared inside it.
pub fn function_name(marker: &'static str) -> &'static str {
    marker.strip_suffix("::__vouch_here").unwrap_or(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    #[derive(Debug)]
    struct Debuggable {
        id: u32,
    }

    struct Shown;

    impl Display for Shown {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "shown")
        }
    }

    fn repr_of(value: Option<Repr>) -> Option<String> {
        value.map(|repr| repr.flat())
    }

    #[test]
    fn test_dispatch_tiers() {
        let number = 0x20u32;
        assert_eq!(
            repr_of((&&&Capture(&number)).__vouch_repr(LiteralFormat::Hex)),
            Some("0x20".to_string())
        );

        let debug = Debuggable { id: 3 };
        assert_eq!(
            repr_of((&&&Capture(&debug)).__vouch_repr(LiteralFormat::Unspecified)),
            Some("Debuggable { id: 3 }".to_string())
        );

        assert_eq!(
            repr_of((&&&Capture(&Shown)).__vouch_repr(LiteralFormat::Unspecified)),
            Some("shown".to_string())
        );

        assert_eq!(
            (&&&Capture(&Opaque)).__vouch_repr(LiteralFormat::Unspecified),
            None
        );
    }

    #[test]
    fn test_debug_keeps_pretty_form() {
        let debug = Debuggable { id: 9 };
        match (&&&Capture(&debug)).__vouch_repr(LiteralFormat::Unspecified) {
            Some(Repr::Text { pretty, .. }) => assert!(pretty.contains("\n    id: 9,\n")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_message_detection() {
        let text = "stop";
        let owned = String::from("owned");
        let number = 2;
        assert_eq!((&&Capture(&text)).__vouch_message(), Some("stop"));
        assert_eq!((&&Capture(&owned)).__vouch_message(), Some("owned"));
        assert_eq!((&&Capture(&number)).__vouch_message(), None);
    }

    #[test]
    fn test_function_name() {
        fn __vouch_here() {}
        let name = function_name(type_name_of_val(&__vouch_here));
        assert!(name.ends_with("test_function_name"));
        assert!(name.starts_with("vouch::engine::tests"));
    }
}
