// Spacing normalization for token-stream text.
//
// Macro input arrives as `x . len () == 3`; reports show `x.len() == 3`.

use crate::{Lexer, Token};

/// Re-space expression text the way rustfmt would print a short expression.
///
/// Token text is copied verbatim; only the whitespace between tokens changes.
/// Characters the lexer does not understand are kept and separated by a space.
pub fn normalize(source: &str) -> String {
    let pieces: Vec<(Option<Token>, &str)> = Lexer::new(source)
        .map(|result| match result {
            Ok(tok) => {
                let text = source.get(tok.span.clone()).unwrap_or_default();
                (Some(tok.token), text)
            }
            Err(err) => (None, source.get(err.span()).unwrap_or_default()),
        })
        .collect();

    let mut out = String::with_capacity(source.len());
    let mut state = Spacing::new();

    for (index, (token, text)) in pieces.iter().enumerate() {
        let next = pieces.get(index + 1).and_then(|(t, _)| t.as_ref());
        if !out.is_empty() && state.space_before(token.as_ref(), next) {
            out.push(' ');
        }
        out.push_str(text);
        state.advance(token.as_ref(), next);
    }

    out
}

struct Spacing {
    prev: Option<Token>,
    /// Nothing has been emitted yet, or an operator/opener was last
    expect_operand: bool,
    /// The previous token was a prefix operator (`-x`, `!x`, `&x`, `*x`)
    prefix: bool,
    /// The previous token was the `!` of a macro call
    macro_bang: bool,
    /// Depth of `::<...>` generic arguments
    generics: usize,
    /// The previous token closed generic arguments
    closed_generics: bool,
    /// Inside `|params|` of a closure
    closure_params: bool,
    /// The previous token opened closure parameters
    closure_opened: bool,
}

impl Spacing {
    fn new() -> Self {
        Self {
            prev: None,
            expect_operand: true,
            prefix: false,
            macro_bang: false,
            generics: 0,
            closed_generics: false,
            closure_params: false,
            closure_opened: false,
        }
    }

    fn space_before(&self, token: Option<&Token>, next: Option<&Token>) -> bool {
        let Some(token) = token else { return true };

        if self.prefix || self.closure_opened {
            return false;
        }

        if let Some(prev) = &self.prev {
            match prev {
                Token::LParen
                | Token::LBracket
                | Token::Dot
                | Token::ColonColon
                | Token::Pound
                | Token::Dollar
                | Token::DotDot
                | Token::DotDotEq => return false,
                Token::Lt if self.generics > 0 => return false,
                _ => {}
            }
        }

        match token {
            Token::RParen
            | Token::RBracket
            | Token::Comma
            | Token::Semi
            | Token::Dot
            | Token::Question
            | Token::ColonColon
            | Token::Colon => false,
            Token::DotDot | Token::DotDotEq => {
                matches!(self.prev, Some(Token::Comma) | Some(Token::LBrace))
            }
            Token::LParen | Token::LBracket => {
                !(self.macro_bang
                    || self.closed_generics
                    || self.prev.as_ref().is_some_and(Token::ends_operand))
            }
            Token::LBrace => !self.macro_bang,
            Token::Bang => !(matches!(self.prev, Some(Token::Ident(_))) && opens_group(next)),
            Token::Lt | Token::Gt | Token::Shr => self.generics == 0,
            Token::Pipe => !self.closure_params,
            _ => true,
        }
    }

    fn advance(&mut self, token: Option<&Token>, next: Option<&Token>) {
        let Some(token) = token else {
            self.prev = None;
            self.expect_operand = false;
            self.prefix = false;
            self.macro_bang = false;
            self.closed_generics = false;
            self.closure_opened = false;
            return;
        };

        self.macro_bang = matches!(token, Token::Bang)
            && matches!(self.prev, Some(Token::Ident(_)))
            && opens_group(next);

        self.prefix = self.expect_operand
            && !self.macro_bang
            && matches!(
                token,
                Token::Minus | Token::Star | Token::Ampersand | Token::AndAnd | Token::Bang
            );

        self.closed_generics = false;
        self.closure_opened = false;
        let mut closed_params = false;
        match token {
            Token::Lt if self.generics > 0 || matches!(self.prev, Some(Token::ColonColon)) => {
                self.generics += 1;
            }
            Token::Gt if self.generics > 0 => {
                self.generics -= 1;
                self.closed_generics = true;
            }
            Token::Shr if self.generics > 0 => {
                self.generics = self.generics.saturating_sub(2);
                self.closed_generics = true;
            }
            Token::Pipe if self.closure_params => {
                self.closure_params = false;
                closed_params = true;
            }
            Token::Pipe if self.expect_operand => {
                self.closure_params = true;
                self.closure_opened = true;
            }
            _ => {}
        }

        self.expect_operand = if closed_params {
            true
        } else if self.closed_generics {
            false
        } else {
            !token.ends_operand()
        };

        self.prev = Some(token.clone());
    }
}

fn opens_group(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(Token::LParen) | Some(Token::LBracket) | Some(Token::LBrace)
    )
}
