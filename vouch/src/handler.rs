// Failure handlers

use std::io::Write;
use std::sync::Arc;

use vouch_diagnostics::{AssertKind, Severity};

use crate::config::Action;
use crate::printer::ReportPrinter;

/// Decides what happens once an assertion has failed.
///
/// The handler may return for any failure; the assertion then evaluates as
/// if it had passed.
pub trait FailureHandler: Send + Sync {
    fn handle(&self, kind: AssertKind, severity: Severity, report: &ReportPrinter<'_>);
}

/// Adapts a closure
pub struct FnHandler<F>(pub F);

impl<F> FailureHandler for FnHandler<F>
where
    F: Fn(AssertKind, Severity, &ReportPrinter<'_>) + Send + Sync,
{
    fn handle(&self, kind: AssertKind, severity: Severity, report: &ReportPrinter<'_>) {
        (self.0)(kind, severity, report)
    }
}

/// Print to stderr, abort on fatal failures
#[derive(Debug, Default, Clone, Copy)]
pub struct AbortHandler;

impl FailureHandler for AbortHandler {
    fn handle(&self, _: AssertKind, severity: Severity, report: &ReportPrinter<'_>) {
        eprintln!("{}", report.render_for_terminal());
        if severity.is_fatal() {
            std::process::abort();
        }
    }
}

/// Print to stderr, then panic on fatal failures with the report as payload
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicHandler;

impl PanicHandler {
    fn handle_to(&self, severity: Severity, report: &ReportPrinter<'_>, out: &mut dyn Write) {
        if let Err(err) = writeln!(out, "{}", report.render_for_terminal()) {
            log::warn!("could not write assertion report: {}", err);
        }
        if severity.is_fatal() {
            let message = report.render_plain(report.options().width);
            std::panic::panic_any(message);
        }
    }
}

impl FailureHandler for PanicHandler {
    fn handle(&self, _: AssertKind, severity: Severity, report: &ReportPrinter<'_>) {
        self.handle_to(severity, report, &mut std::io::stderr());
    }
}

/// Log through `log::error!` and return
#[derive(Debug, Default, Clone, Copy)]
pub struct ContinueHandler;

impl FailureHandler for ContinueHandler {
    fn handle(&self, _: AssertKind, _: Severity, report: &ReportPrinter<'_>) {
        log::error!("{}", report.render_plain(report.options().width));
    }
}

/// Handler selected by [`Action`]
pub fn builtin(action: Action) -> Arc<dyn FailureHandler> {
    match action {
        Action::Abort => Arc::new(AbortHandler),
        Action::Panic => Arc::new(PanicHandler),
        Action::Continue => Arc::new(ContinueHandler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stacktrace::NoStackTrace;
    use vouch_diagnostics::{AssertionRecord, Location, Operator, RenderOptions};

    fn record(severity: Severity) -> AssertionRecord<'static> {
        AssertionRecord {
            kind: AssertKind::Assert,
            severity,
            location: Location {
                file: "src/demo.rs",
                line: 4,
                column: 5,
                function: "demo::run",
            },
            macro_name: "assert",
            expression: "ready",
            operator: Operator::None,
            operands: Vec::new(),
            extras: Vec::new(),
            message: None,
            trace: Vec::new(),
        }
    }

    fn printer(severity: Severity) -> ReportPrinter<'static> {
        let options = RenderOptions {
            width: 0,
            color: false,
            ..RenderOptions::default()
        };
        ReportPrinter::new(record(severity), options, Arc::new(NoStackTrace))
    }

    #[test]
    fn test_panic_handler_writes_before_panicking() {
        let report = printer(Severity::Fatal);
        let mut out = Vec::new();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            PanicHandler.handle_to(Severity::Fatal, &report, &mut out)
        }));

        let payload = caught.err().and_then(|p| p.downcast::<String>().ok());
        assert!(payload.is_some_and(|p| p.starts_with("Assertion failed at src/demo.rs:4")));
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("Assertion failed at src/demo.rs:4"));
        assert!(written.contains("    assert!(ready);\n"));
    }

    #[test]
    fn test_panic_handler_returns_on_non_fatal() {
        let report = printer(Severity::NonFatal);
        let mut out = Vec::new();
        PanicHandler.handle_to(Severity::NonFatal, &report, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("assert!(ready);"));
    }
}
