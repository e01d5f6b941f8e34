// Terminal width and color detection

use console::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// What a report written to a stream can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalInfo {
    /// Columns, 0 when unknown or not a terminal
    pub width: usize,
    pub color: bool,
}

pub trait TerminalProbe: Send + Sync {
    fn probe(&self, stream: Stream) -> TerminalInfo;
}

/// Asks the `console` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProbe;

impl TerminalProbe for ConsoleProbe {
    fn probe(&self, stream: Stream) -> TerminalInfo {
        let (term, color) = match stream {
            Stream::Stdout => (Term::stdout(), console::colors_enabled()),
            Stream::Stderr => (Term::stderr(), console::colors_enabled_stderr()),
        };
        let width = term
            .size_checked()
            .map(|(_rows, columns)| usize::from(columns))
            .unwrap_or(0);
        let info = TerminalInfo {
            width,
            color: color && term.is_term(),
        };
        log::trace!("probed {:?}: {:?}", stream, info);
        info
    }
}

/// Reports the same answer every time
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedTerminal(pub TerminalInfo);

impl TerminalProbe for FixedTerminal {
    fn probe(&self, _: Stream) -> TerminalInfo {
        self.0
    }
}
