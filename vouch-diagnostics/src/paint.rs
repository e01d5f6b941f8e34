// ANSI painting for report text
//
// Layout is decided on plain text first; painting only wraps finished pieces
// in SGR sequences, so stripping the sequences gives back the plain report.

use colored::Color;
use vouch_lexer::{highlight, Highlight};

const RESET: &str = "\x1b[0m";

/// What a piece of report text is, for coloring purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Plain,
    /// "Assertion failed" and similar
    Failure,
    /// Section titles such as "Where:" and "Stack trace:"
    Title,
    /// Rust source or a rendered value; colored token by token
    Code,
    /// Static type names
    Type,
    /// File paths and line numbers
    Location,
    /// Frame numbers and the recursion fold marker
    Muted,
}

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, role: Role, text: &str) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        match role {
            Role::Plain => text.to_string(),
            Role::Failure => wrap(text, &format!("1;{}", Color::Red.to_fg_str())),
            Role::Title => wrap(text, "1"),
            Role::Code => self.code(text),
            Role::Type => wrap(text, &Color::Green.to_fg_str()),
            Role::Location => wrap(text, &Color::Cyan.to_fg_str()),
            Role::Muted => wrap(text, &Color::BrightBlack.to_fg_str()),
        }
    }

    /// Syntax-highlight Rust-like text.
    pub fn code(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() * 2);
        for segment in highlight(text) {
            match token_color(segment.kind) {
                Some(color) => out.push_str(&wrap(segment.text, &color.to_fg_str())),
                None => out.push_str(segment.text),
            }
        }
        out
    }
}

fn token_color(kind: Highlight) -> Option<Color> {
    match kind {
        Highlight::Keyword => Some(Color::Magenta),
        Highlight::Number => Some(Color::Cyan),
        Highlight::String | Highlight::Char => Some(Color::Green),
        Highlight::Lifetime => Some(Color::Yellow),
        Highlight::Type => Some(Color::Yellow),
        Highlight::Function | Highlight::Macro => Some(Color::Blue),
        Highlight::Ident | Highlight::Punct | Highlight::Plain => None,
    }
}

// Sequences are written here rather than through `Colorize`, which follows
// `colored`'s env override and would break `strip_colors(painted) == plain`.
fn wrap(text: &str, code: &str) -> String {
    format!("\x1b[{}m{}{}", code, text, RESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::strip_colors;

    #[test]
    fn test_disabled_painter_is_identity() {
        let painter = Painter::new(false);
        assert_eq!(painter.paint(Role::Failure, "Assertion failed"), "Assertion failed");
        assert_eq!(painter.code("foo(1)"), "foo(1)");
    }

    #[test]
    fn test_enabled_painter_strips_back() {
        let painter = Painter::new(true);
        let text = "vec![1, 2] == foo(\"x\") && ¤ 'c'";
        let painted = painter.code(text);
        assert_ne!(painted, text);
        assert_eq!(strip_colors(&painted), text);

        let header = painter.paint(Role::Failure, "Assertion failed");
        assert!(header.starts_with("\x1b[1;31m"));
        assert_eq!(strip_colors(&header), "Assertion failed");
    }
}
