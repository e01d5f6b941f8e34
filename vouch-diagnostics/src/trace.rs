// Stack trace model and rendering

use std::collections::HashMap;

use crate::paint::{Painter, Role};
use crate::types::clean_signature;
use crate::utils::{basename, unique_suffixes};

/// Runs of this many identical frames or more are folded
pub const DEFAULT_FOLD_THRESHOLD: usize = 4;

/// One symbolized stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: Option<String>, line: Option<u32>) -> Self {
        Self {
            function: function.into(),
            file,
            line,
        }
    }

    /// Same function in the same file; line numbers may differ
    fn same_site(&self, other: &Frame) -> bool {
        self.function == other.function && self.file == other.file
    }
}

/// How file paths are shown in stack traces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    Full,
    /// Shortest suffix that tells the paths in the trace apart
    #[default]
    Unique,
    Basename,
}

/// A line item of a rendered trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    /// A frame with its 1-based position in the original trace
    Frame(usize, &'a Frame),
    Folded(usize),
}

/// Collapse runs of at least `threshold` identical frames, keeping the first
/// and last frame of each run. A threshold of 0 disables folding.
pub fn fold(frames: &[Frame], threshold: usize) -> Vec<Entry<'_>> {
    let mut entries = Vec::with_capacity(frames.len());
    let mut start = 0;

    while start < frames.len() {
        let mut end = start + 1;
        while end < frames.len() && frames[end].same_site(&frames[start]) {
            end += 1;
        }
        let run = end - start;

        if threshold > 0 && run >= threshold && run > 2 {
            entries.push(Entry::Frame(start + 1, &frames[start]));
            entries.push(Entry::Folded(run - 2));
            entries.push(Entry::Frame(end, &frames[end - 1]));
        } else {
            entries.extend((start..end).map(|i| Entry::Frame(i + 1, &frames[i])));
        }
        start = end;
    }

    entries
}

/// Render the body of a "Stack trace:" section.
pub fn render_trace(
    frames: &[Frame],
    path_mode: PathMode,
    fold_threshold: usize,
    painter: &Painter,
) -> String {
    let paths = display_paths(frames, path_mode);
    let number_width = frames.len().to_string().len();
    let mut out = String::new();

    for entry in fold(frames, fold_threshold) {
        match entry {
            Entry::Frame(number, frame) => {
                let label = format!("#{:>width$}", number, width = number_width);
                out.push_str(&painter.paint(Role::Muted, &label));
                out.push(' ');
                out.push_str(&painter.code(&clean_signature(&frame.function)));
                out.push('\n');

                if let Some(file) = &frame.file {
                    let shown = paths.get(file.as_str()).map_or(file.as_str(), String::as_str);
                    let location = match frame.line {
                        Some(line) => format!("{}:{}", shown, line),
                        None => shown.to_string(),
                    };
                    out.push_str(&" ".repeat(number_width + 2));
                    out.push_str("at ");
                    out.push_str(&painter.paint(Role::Location, &location));
                    out.push('\n');
                }
            }
            Entry::Folded(count) => {
                let marker = format!("| {} layers of recursion were folded |", count);
                out.push_str(&" ".repeat(number_width + 2));
                out.push_str(&painter.paint(Role::Muted, &marker));
                out.push('\n');
            }
        }
    }

    out
}

fn display_paths(frames: &[Frame], mode: PathMode) -> HashMap<String, String> {
    let files = frames.iter().filter_map(|f| f.file.as_deref());
    match mode {
        PathMode::Full => HashMap::new(),
        PathMode::Unique => unique_suffixes(files),
        PathMode::Basename => files
            .map(|f| (f.to_string(), basename(f).to_string()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(function: &str, file: &str, line: u32) -> Frame {
        Frame::new(function, Some(file.to_string()), Some(line))
    }

    fn recursion(depth: usize) -> Vec<Frame> {
        let mut frames = vec![frame("demo::leaf", "src/demo.rs", 3)];
        frames.extend((0..depth).map(|_| frame("demo::rec", "src/demo.rs", 10)));
        frames.push(frame("demo::main", "src/main.rs", 20));
        frames
    }

    #[test]
    fn test_fold_long_run() {
        let frames = recursion(10);
        let entries = fold(&frames, DEFAULT_FOLD_THRESHOLD);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[1], Entry::Frame(2, &frames[1]));
        assert_eq!(entries[2], Entry::Folded(8));
        assert_eq!(entries[3], Entry::Frame(11, &frames[10]));
        assert_eq!(entries[4], Entry::Frame(12, &frames[11]));
    }

    #[test]
    fn test_short_runs_are_kept() {
        let frames = recursion(3);
        assert_eq!(fold(&frames, DEFAULT_FOLD_THRESHOLD).len(), frames.len());
        assert_eq!(fold(&recursion(10), 0).len(), 12);
    }

    #[test]
    fn test_render_trace_plain() {
        let frames = recursion(10);
        let text = render_trace(&frames, PathMode::Unique, DEFAULT_FOLD_THRESHOLD, &Painter::new(false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# 1 demo::leaf");
        assert_eq!(lines[1], "    at demo.rs:3");
        assert_eq!(lines[2], "# 2 demo::rec");
        assert_eq!(lines[4], "    | 8 layers of recursion were folded |");
        assert_eq!(lines[5], "#11 demo::rec");
        assert_eq!(lines[7], "#12 demo::main");
        assert_eq!(lines[8], "    at main.rs:20");
    }

    #[test]
    fn test_paths_disambiguated() {
        let frames = vec![
            frame("a::f", "crates/a/src/lib.rs", 1),
            frame("b::g", "crates/b/src/lib.rs", 2),
        ];
        let text = render_trace(&frames, PathMode::Unique, 0, &Painter::new(false));
        assert!(text.contains("at a/src/lib.rs:1"));
        assert!(text.contains("at b/src/lib.rs:2"));

        let full = render_trace(&frames, PathMode::Full, 0, &Painter::new(false));
        assert!(full.contains("at crates/a/src/lib.rs:1"));
    }

    #[test]
    fn test_frame_without_location() {
        let frames = vec![Frame::new("unknown_fn", None, None)];
        let text = render_trace(&frames, PathMode::Unique, 0, &Painter::new(false));
        assert_eq!(text, "#1 unknown_fn\n");
    }
}
