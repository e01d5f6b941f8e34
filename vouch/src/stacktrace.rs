// Stack trace capture

use backtrace::Backtrace;
use vouch_diagnostics::Frame;

/// Supplies the frames shown under "Stack trace:"
pub trait StackTraceProvider: Send + Sync {
    /// Frames from the assertion site outwards, innermost first
    fn capture(&self) -> Vec<Frame>;
}

/// Symbolizes the current stack with the `backtrace` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceProvider;

/// Frame that marks the boundary between library and caller
const FAIL_FRAME: &str = "vouch::engine::fail";
/// Frames from here on belong to the runtime's entry points
const RUNTIME_ENTRY: &str = "__rust_begin_short_backtrace";

impl StackTraceProvider for BacktraceProvider {
    fn capture(&self) -> Vec<Frame> {
        let backtrace = Backtrace::new();
        let frames: Vec<Frame> = backtrace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .map(|symbol| {
                let function = symbol
                    .name()
                    .map(|name| format!("{:#}", name))
                    .unwrap_or_else(|| "<unknown>".to_string());
                let file = symbol.filename().map(|path| path.display().to_string());
                Frame::new(function, file, symbol.lineno())
            })
            .collect();
        trim(frames)
    }
}

/// Drop frames inside the library and below the program entry point
pub fn trim(frames: Vec<Frame>) -> Vec<Frame> {
    let start = match frames.iter().rposition(|f| f.function.starts_with(FAIL_FRAME)) {
        Some(index) => index + 1,
        None => frames
            .iter()
            .position(|f| !is_internal(&f.function))
            .unwrap_or(frames.len()),
    };

    frames
        .into_iter()
        .skip(start)
        .take_while(|f| !f.function.contains(RUNTIME_ENTRY))
        .collect()
}

fn is_internal(function: &str) -> bool {
    ["backtrace::", "vouch::", "<backtrace::"]
        .iter()
        .any(|prefix| function.starts_with(prefix))
}

/// Captures nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStackTrace;

impl StackTraceProvider for NoStackTrace {
    fn capture(&self) -> Vec<Frame> {
        Vec::new()
    }
}
