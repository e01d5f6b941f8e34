// Syntax classes for colorizing expression and value text.

use crate::{Lexer, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Keyword,
    Number,
    String,
    Char,
    Lifetime,
    /// Capitalized identifier, usually a type, variant or constant
    Type,
    /// Identifier immediately followed by a call
    Function,
    /// Macro name and its `!`
    Macro,
    Ident,
    Punct,
    /// Whitespace and anything the lexer does not recognize
    Plain,
}

/// A contiguous piece of the highlighted source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub kind: Highlight,
}

/// Split `source` into classified segments.
///
/// Concatenating the segment texts always yields `source` again, so callers can
/// paint segments without changing the visible text.
pub fn highlight(source: &str) -> Vec<Segment<'_>> {
    let tokens: Vec<(Option<Token>, std::ops::Range<usize>)> = Lexer::new(source)
        .map(|result| match result {
            Ok(tok) => (Some(tok.token), tok.span),
            Err(err) => (None, err.span()),
        })
        .collect();

    let mut segments = Vec::with_capacity(tokens.len() * 2);
    let mut cursor = 0;

    for (index, (token, span)) in tokens.iter().enumerate() {
        if span.start > cursor {
            push(&mut segments, source, cursor..span.start, Highlight::Plain);
        }
        let next = tokens.get(index + 1).and_then(|(t, _)| t.as_ref());
        let after = tokens.get(index + 2).and_then(|(t, _)| t.as_ref());
        let prev = index
            .checked_sub(1)
            .and_then(|i| tokens.get(i))
            .and_then(|(t, _)| t.as_ref());
        let kind = match token {
            Some(token) => classify(token, prev, next, after),
            None => Highlight::Plain,
        };
        push(&mut segments, source, span.clone(), kind);
        cursor = span.end;
    }

    if cursor < source.len() {
        push(&mut segments, source, cursor..source.len(), Highlight::Plain);
    }

    segments
}

fn push<'a>(
    segments: &mut Vec<Segment<'a>>,
    source: &'a str,
    range: std::ops::Range<usize>,
    kind: Highlight,
) {
    if let Some(text) = source.get(range) {
        segments.push(Segment { text, kind });
    }
}

fn classify(
    token: &Token,
    prev: Option<&Token>,
    next: Option<&Token>,
    after: Option<&Token>,
) -> Highlight {
    match token {
        t if t.is_number() => Highlight::Number,
        t if t.is_keyword() => Highlight::Keyword,
        Token::StringLiteral(_) | Token::RawStringLiteral(_) => Highlight::String,
        Token::CharLiteral(_) => Highlight::Char,
        Token::Lifetime(_) => Highlight::Lifetime,
        Token::Ident(name) => {
            let is_macro = matches!(next, Some(Token::Bang))
                && matches!(
                    after,
                    Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace)
                );
            if is_macro {
                Highlight::Macro
            } else if matches!(next, Some(Token::LParen)) {
                Highlight::Function
            } else if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                Highlight::Type
            } else if name == "nullptr" {
                Highlight::Keyword
            } else {
                Highlight::Ident
            }
        }
        Token::Bang
            if matches!(prev, Some(Token::Ident(_)))
                && matches!(
                    next,
                    Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace)
                ) =>
        {
            Highlight::Macro
        }
        _ => Highlight::Punct,
    }
}
