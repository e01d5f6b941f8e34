// Assertion report rendering
//
// Assertion failed at src/main.rs:12: demo::check_flags
//     assert!(mask & flags == 0b1000);
//     Where:
//         mask & flags: u16 => 0b0000
//         0b1000: u16       => 0b1000
//
// Stack trace:
// #1 demo::check_flags
//       at main.rs:12

use vouch_lexer::LiteralFormat;

use crate::paint::{Painter, Role};
use crate::record::{AssertionRecord, Value};
use crate::trace::{render_trace, PathMode, DEFAULT_FOLD_THRESHOLD};
use crate::types::{clean_signature, clean_type_name};
use crate::utils::{indent, wrap_words};
use crate::value::Repr;

const SECTION_INDENT: usize = 4;
const VALUE_INDENT: usize = 8;
const ARROW: &str = " => ";
const MESSAGE_LABEL: &str = "Message: ";

/// Layout and styling knobs for [`Renderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Terminal width; 0 disables wrapping
    pub width: usize,
    pub color: bool,
    pub stack_trace: bool,
    /// 0 disables folding
    pub fold_threshold: usize,
    pub path_mode: PathMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 0,
            color: false,
            stack_trace: true,
            fold_threshold: DEFAULT_FOLD_THRESHOLD,
            path_mode: PathMode::Unique,
        }
    }
}

pub struct Renderer {
    options: RenderOptions,
    painter: Painter,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            painter: Painter::new(options.color),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Build the full report text.
    pub fn render(&self, record: &AssertionRecord<'_>) -> String {
        let mut out = String::new();

        self.header(record, &mut out);
        self.expression(record, &mut out);

        let format = record.operand_format();
        let operands: Vec<(&Value, Repr)> = record
            .operands
            .iter()
            .filter_map(|value| value.render(format).map(|repr| (value, repr)))
            .collect();
        self.section("Where:", &operands, &mut out);

        let extras: Vec<(&Value, Repr)> = record
            .extras
            .iter()
            .filter_map(|value| {
                let format = LiteralFormat::shared(value.format, LiteralFormat::Unspecified);
                value.render(format).map(|repr| (value, repr))
            })
            .collect();
        self.section("Extra diagnostics:", &extras, &mut out);

        if let Some(message) = record.message {
            self.message(message, &mut out);
        }

        if self.options.stack_trace && !record.trace.is_empty() {
            out.push('\n');
            out.push_str(&self.painter.paint(Role::Title, "Stack trace:"));
            out.push('\n');
            out.push_str(&render_trace(
                &record.trace,
                self.options.path_mode,
                self.options.fold_threshold,
                &self.painter,
            ));
        }

        out
    }

    fn header(&self, record: &AssertionRecord<'_>, out: &mut String) {
        let location = &record.location;
        out.push_str(
            &self
                .painter
                .paint(Role::Failure, &format!("{} failed", record.kind.action())),
        );
        out.push_str(" at ");
        out.push_str(
            &self
                .painter
                .paint(Role::Location, &format!("{}:{}", location.file, location.line)),
        );

        let signature = clean_signature(location.function);
        if !signature.is_empty() {
            out.push_str(": ");
            out.push_str(&self.painter.code(&signature));
        }
        out.push('\n');
    }

    fn expression(&self, record: &AssertionRecord<'_>, out: &mut String) {
        let arguments = if record.has_arguments() { ", ..." } else { "" };
        let call = format!(
            "{}!({}{});",
            record.macro_name, record.expression, arguments
        );
        out.push_str(&" ".repeat(SECTION_INDENT));
        out.push_str(&self.painter.code(&call));
        out.push('\n');
    }

    fn section(&self, title: &str, values: &[(&Value, Repr)], out: &mut String) {
        if values.is_empty() {
            return;
        }

        out.push_str(&" ".repeat(SECTION_INDENT));
        out.push_str(&self.painter.paint(Role::Title, title));
        out.push('\n');

        let labels: Vec<(String, String)> = values
            .iter()
            .map(|(value, _)| (value.text.to_string(), clean_type_name(value.type_name)))
            .collect();
        let label_width = labels
            .iter()
            .map(|(text, ty)| text.chars().count() + 2 + ty.chars().count())
            .max()
            .unwrap_or(0);

        for ((text, ty), (_, repr)) in labels.iter().zip(values) {
            let used = text.chars().count() + 2 + ty.chars().count();
            let padding = " ".repeat(label_width.saturating_sub(used));

            out.push_str(&" ".repeat(VALUE_INDENT));
            out.push_str(&self.painter.code(text));
            out.push_str(": ");
            out.push_str(&self.painter.paint(Role::Type, ty));
            out.push_str(&padding);
            out.push_str(ARROW);
            out.push_str(&self.painter.code(&self.layout_value(repr, label_width)));
            out.push('\n');
        }
    }

    /// Flat when it fits after the label, otherwise pretty-printed with
    /// continuation lines under the label.
    fn layout_value(&self, repr: &Repr, label_width: usize) -> String {
        let flat = repr.flat();
        let width = self.options.width;
        if width == 0 || !repr.is_container() {
            return flat;
        }

        let available = width.saturating_sub(VALUE_INDENT + label_width + ARROW.len());
        if flat.chars().count() <= available {
            return flat;
        }

        let pretty = repr.pretty(width.saturating_sub(VALUE_INDENT));
        indent(&pretty, VALUE_INDENT, ' ', true)
    }

    fn message(&self, message: &str, out: &mut String) {
        let continuation = SECTION_INDENT + MESSAGE_LABEL.len();
        let width = match self.options.width {
            0 => 0,
            w => w.saturating_sub(continuation).max(1),
        };
        let lines = wrap_words(message, width);

        out.push_str(&" ".repeat(SECTION_INDENT));
        out.push_str(&self.painter.paint(Role::Title, MESSAGE_LABEL.trim_end()));
        out.push(' ');
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(&" ".repeat(continuation));
            }
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// Render `record` with default options for the given width and color setting.
pub fn render(record: &AssertionRecord<'_>, width: usize, color: bool) -> String {
    Renderer::new(RenderOptions {
        width,
        color,
        ..RenderOptions::default()
    })
    .render(record)
}
