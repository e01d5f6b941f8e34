// vouch-diagnostics - assertion records and their rendering
// Turns a captured assertion failure into a readable, optionally colored report

pub mod paint;
pub mod primitive;
pub mod record;
pub mod report;
pub mod trace;
pub mod types;
pub mod utils;
pub mod value;

pub use paint::{Painter, Role};
pub use record::{AssertKind, AssertionRecord, Location, Operator, Render, Severity, Value};
pub use report::{render, RenderOptions, Renderer};
pub use trace::{Frame, PathMode, DEFAULT_FOLD_THRESHOLD};
pub use utils::strip_colors;
pub use value::{Delim, Repr};
pub use vouch_lexer::LiteralFormat;
