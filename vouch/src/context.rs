// Process-wide assertion context
//
// Lookup order at failure time: the innermost `Context::scope` on this
// thread, then the installed context, then a fresh `Context::from_env()`.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use vouch_diagnostics::{AssertKind, AssertionRecord, RenderOptions, Severity};

use crate::config::Config;
use crate::handler::{self, FailureHandler, FnHandler};
use crate::printer::ReportPrinter;
use crate::stacktrace::{BacktraceProvider, StackTraceProvider};
use crate::terminal::{ConsoleProbe, Stream, TerminalInfo, TerminalProbe};

static INSTALLED: RwLock<Option<Arc<Context>>> = RwLock::new(None);

thread_local! {
    static SCOPES: RefCell<Vec<Arc<Context>>> = const { RefCell::new(Vec::new()) };
}

#[derive(Clone)]
pub struct Context {
    config: Config,
    handler: Arc<dyn FailureHandler>,
    stack_trace: Arc<dyn StackTraceProvider>,
    probe: Arc<dyn TerminalProbe>,
    terminal: TerminalInfo,
}

impl Context {
    /// Context with the built-in handler for `config.action`
    pub fn new(config: Config) -> Self {
        let probe: Arc<dyn TerminalProbe> = Arc::new(ConsoleProbe);
        let terminal = probe.probe(Stream::Stderr);
        Self {
            handler: handler::builtin(config.action),
            stack_trace: Arc::new(BacktraceProvider),
            probe,
            terminal,
            config,
        }
    }

    /// Context for [`Config::load`]
    pub fn from_env() -> Self {
        Self::new(Config::load())
    }

    pub fn with_handler<H: FailureHandler + 'static>(mut self, handler: H) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Use a closure as the failure handler
    pub fn on_failure<F>(self, handler: F) -> Self
    where
        F: Fn(AssertKind, Severity, &ReportPrinter<'_>) + Send + Sync + 'static,
    {
        self.with_handler(FnHandler(handler))
    }

    pub fn with_stack_trace<P: StackTraceProvider + 'static>(mut self, provider: P) -> Self {
        self.stack_trace = Arc::new(provider);
        self
    }

    /// Replace the terminal probe and probe again
    pub fn with_probe<P: TerminalProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Arc::new(probe);
        self.refresh_terminal();
        self
    }

    /// The terminal is probed once per context; call this after it changes.
    pub fn refresh_terminal(&mut self) {
        self.terminal = self.probe.probe(Stream::Stderr);
    }

    pub fn terminal(&self) -> TerminalInfo {
        self.terminal
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// How reports are laid out for this context's terminal
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.config.width.unwrap_or(self.terminal.width),
            color: self.config.color.enabled(self.terminal.color),
            stack_trace: self.config.stack_trace,
            fold_threshold: self.config.fold_threshold,
            path_mode: self.config.path_mode.into(),
        }
    }

    /// Make this the process-wide context, replacing any previous one
    pub fn install(self) {
        log::debug!("installing assertion context: {:?}", self);
        *INSTALLED.write() = Some(Arc::new(self));
    }

    /// Run `f` with this context active on the current thread
    pub fn scope<R>(self, f: impl FnOnce() -> R) -> R {
        struct Guard;

        impl Drop for Guard {
            fn drop(&mut self) {
                SCOPES.with(|scopes| scopes.borrow_mut().pop());
            }
        }

        SCOPES.with(|scopes| scopes.borrow_mut().push(Arc::new(self)));
        let _guard = Guard;
        f()
    }

    pub(crate) fn dispatch(&self, record: AssertionRecord<'_>) {
        let (kind, severity) = (record.kind, record.severity);
        let printer = ReportPrinter::new(record, self.render_options(), self.stack_trace.clone());
        self.handler.handle(kind, severity, &printer);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// Remove the installed context
pub fn teardown() {
    if INSTALLED.write().take().is_some() {
        log::debug!("assertion context torn down");
    }
}

/// The context a failure on this thread would be reported through
pub fn current() -> Arc<Context> {
    if let Some(scoped) = SCOPES.with(|scopes| scopes.borrow().last().cloned()) {
        return scoped;
    }
    if let Some(installed) = INSTALLED.read().clone() {
        return installed;
    }
    Arc::new(Context::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;
    use crate::terminal::FixedTerminal;

    fn terminal(width: usize, color: bool) -> FixedTerminal {
        FixedTerminal(TerminalInfo { width, color })
    }

    #[test]
    fn test_render_options_follow_terminal() {
        let context = Context::default().with_probe(terminal(120, true));
        let options = context.render_options();
        assert_eq!(options.width, 120);
        assert!(options.color);
    }

    #[test]
    fn test_config_overrides_terminal() {
        let config = Config {
            width: Some(60),
            color: ColorChoice::Never,
            ..Config::default()
        };
        let context = Context::new(config).with_probe(terminal(120, true));
        let options = context.render_options();
        assert_eq!(options.width, 60);
        assert!(!options.color);
    }

    #[test]
    fn test_scopes_nest() {
        let outer = Config {
            width: Some(1),
            ..Config::default()
        };
        let inner = Config {
            width: Some(2),
            ..Config::default()
        };
        Context::new(outer).scope(|| {
            assert_eq!(current().config().width, Some(1));
            Context::new(inner).scope(|| assert_eq!(current().config().width, Some(2)));
            assert_eq!(current().config().width, Some(1));
        });
    }
}
