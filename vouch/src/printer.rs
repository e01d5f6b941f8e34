// Lazy access to the text of a failure report
//
// Handlers receive a `ReportPrinter` and decide whether they want text at
// all. Nothing is stringified and no stack is walked until they ask.

use std::cell::OnceCell;
use std::sync::Arc;

use vouch_diagnostics::{AssertKind, AssertionRecord, Frame, RenderOptions, Renderer, Severity};

use crate::stacktrace::StackTraceProvider;

pub struct ReportPrinter<'a> {
    record: AssertionRecord<'a>,
    options: RenderOptions,
    provider: Arc<dyn StackTraceProvider>,
    trace: OnceCell<Vec<Frame>>,
}

impl<'a> ReportPrinter<'a> {
    pub fn new(
        record: AssertionRecord<'a>,
        options: RenderOptions,
        provider: Arc<dyn StackTraceProvider>,
    ) -> Self {
        Self {
            record,
            options,
            provider,
            trace: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> AssertKind {
        self.record.kind
    }

    pub fn severity(&self) -> Severity {
        self.record.severity
    }

    /// The failure as captured, without a stack trace
    pub fn record(&self) -> &AssertionRecord<'a> {
        &self.record
    }

    /// Options used by [`render_for_terminal`](Self::render_for_terminal)
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Frames leading to the assertion, captured on first use. Empty when
    /// stack traces are disabled.
    pub fn trace(&self) -> &[Frame] {
        self.trace.get_or_init(|| {
            if !self.options.stack_trace {
                return Vec::new();
            }
            let frames = self.provider.capture();
            log::trace!("captured {} stack frames", frames.len());
            frames
        })
    }

    pub fn render(&self, width: usize, color: bool) -> String {
        let mut record = self.record.clone();
        record.trace = self.trace().to_vec();
        Renderer::new(RenderOptions {
            width,
            color,
            ..self.options
        })
        .render(&record)
    }

    pub fn render_plain(&self, width: usize) -> String {
        self.render(width, false)
    }

    /// Render for the terminal the context probed
    pub fn render_for_terminal(&self) -> String {
        self.render(self.options.width, self.options.color)
    }
}
