// vouch-lexer - tokenizer for the Rust expression text shown in assertion reports

use logos::Logos;

pub mod highlight;
pub mod spacing;

pub use highlight::{highlight, Highlight, Segment};
pub use spacing::normalize;

/// Scan a raw string literal (`r"..."`, `r#"..."#`, `br"..."`) whose prefix
/// has already been matched, consuming up to the closing quote and hashes.
fn raw_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let hashes = lex.slice().chars().filter(|&c| c == '#').count();
    let terminator: String = std::iter::once('"')
        .chain(std::iter::repeat('#').take(hashes))
        .collect();
    let end = lex.remainder().find(&terminator)?;
    lex.bump(end + terminator.len());
    Some(lex.slice().to_string())
}

/// Tokens of a Rust expression as it appears inside an assertion macro
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Keywords
    #[token("as")]
    As,
    #[token("async")]
    Async,
    #[token("await")]
    Await,
    #[token("break")]
    Break,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("crate")]
    Crate,
    #[token("dyn")]
    Dyn,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("false")]
    False,
    #[token("fn")]
    Fn,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("impl")]
    Impl,
    #[token("in")]
    In,
    #[token("let")]
    Let,
    #[token("loop")]
    Loop,
    #[token("match")]
    Match,
    #[token("move")]
    Move,
    #[token("mut")]
    Mut,
    #[token("ref")]
    Ref,
    #[token("return")]
    Return,
    #[token("self")]
    SelfValue,
    #[token("Self")]
    SelfType,
    #[token("static")]
    Static,
    #[token("struct")]
    Struct,
    #[token("super")]
    Super,
    #[token("true")]
    True,
    #[token("unsafe")]
    Unsafe,
    #[token("where")]
    Where,
    #[token("while")]
    While,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Punctuation
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("..=")]
    DotDotEq,
    #[token("...")]
    DotDotDot,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("?")]
    Question,
    #[token("#")]
    Pound,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,
    #[token("~")]
    Tilde,

    // Comparison
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Logical
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,

    // Assignment
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpersandEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,

    // Literals
    // Integer literals keep their text: 0x1A3F, 0xFF_u8, 1_000i64
    #[regex(r"0x[0-9a-fA-F_]+(?:i8|i16|i32|i64|i128|isize|u8|u16|u32|u64|u128|usize)?", |lex| lex.slice().to_string())]
    HexLiteral(String),

    #[regex(r"0b[01_]+(?:i8|i16|i32|i64|i128|isize|u8|u16|u32|u64|u128|usize)?", |lex| lex.slice().to_string())]
    BinaryLiteral(String),

    #[regex(r"0o[0-7_]+(?:i8|i16|i32|i64|i128|isize|u8|u16|u32|u64|u128|usize)?", |lex| lex.slice().to_string())]
    OctalLiteral(String),

    #[regex(r"[0-9][0-9_]*(?:i8|i16|i32|i64|i128|isize|u8|u16|u32|u64|u128|usize)?", |lex| lex.slice().to_string())]
    IntLiteral(String),

    // 3.14, 1.5e10, 2.0E-5f32, 1e3, 7f64
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*(?:[eE][+-]?[0-9_]+)?(?:f32|f64)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+(?:f32|f64)?", |lex| lex.slice().to_string())]
    #[regex(r"[0-9][0-9_]*(?:f32|f64)", |lex| lex.slice().to_string())]
    FloatLiteral(String),

    #[regex(r#"b?"([^"\\]|\\(.|\n))*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    #[regex(r##"b?r#*""##, raw_string)]
    RawStringLiteral(String),

    #[regex(r"b?'([^'\\\n]|\\.|\\x[0-9a-fA-F]{2}|\\u\{[0-9a-fA-F]{1,6}\})'", |lex| lex.slice().to_string())]
    CharLiteral(String),

    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Lifetime(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Underscore wildcard - higher priority than Ident
    #[token("_", priority = 10)]
    Underscore,

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

impl Token {
    /// Numeric literal of any radix
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Token::HexLiteral(_)
                | Token::BinaryLiteral(_)
                | Token::OctalLiteral(_)
                | Token::IntLiteral(_)
                | Token::FloatLiteral(_)
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::As
                | Token::Async
                | Token::Await
                | Token::Break
                | Token::Const
                | Token::Continue
                | Token::Crate
                | Token::Dyn
                | Token::Else
                | Token::Enum
                | Token::False
                | Token::Fn
                | Token::For
                | Token::If
                | Token::Impl
                | Token::In
                | Token::Let
                | Token::Loop
                | Token::Match
                | Token::Move
                | Token::Mut
                | Token::Ref
                | Token::Return
                | Token::SelfValue
                | Token::SelfType
                | Token::Static
                | Token::Struct
                | Token::Super
                | Token::True
                | Token::Unsafe
                | Token::Where
                | Token::While
        )
    }

    /// Whether an expression can end with this token, e.g. `x`, `3`, `f()`, `v[0]`, `x?`.
    pub fn ends_operand(&self) -> bool {
        self.is_number()
            || matches!(
                self,
                Token::Ident(_)
                    | Token::StringLiteral(_)
                    | Token::RawStringLiteral(_)
                    | Token::CharLiteral(_)
                    | Token::Lifetime(_)
                    | Token::Underscore
                    | Token::True
                    | Token::False
                    | Token::SelfValue
                    | Token::SelfType
                    | Token::Super
                    | Token::Crate
                    | Token::Await
                    | Token::RParen
                    | Token::RBracket
                    | Token::RBrace
                    | Token::Question
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<TokenSpan, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();

        match token {
            Ok(tok) => Some(Ok(TokenSpan { token: tok, span })),
            Err(_) => Some(Err(LexError::InvalidToken { span })),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Invalid token at {span:?}")]
    InvalidToken { span: std::ops::Range<usize> },
}

impl LexError {
    pub fn span(&self) -> std::ops::Range<usize> {
        match self {
            LexError::InvalidToken { span } => span.clone(),
        }
    }
}

/// How an integer operand was spelled in source, and therefore how its
/// value should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralFormat {
    /// Not a literal, or nothing known about it
    #[default]
    Unspecified,
    Decimal,
    Hex,
    Octal,
    Binary,
    /// `'c'` or `b'c'`
    Character,
}

impl LiteralFormat {
    /// Classify the source text of an operand. Only a single literal,
    /// optionally negated, carries a format.
    pub fn of(text: &str) -> Self {
        let mut tokens = Lexer::new(text).map(|r| r.map(|t| t.token));
        let mut first = tokens.next();
        if let Some(Ok(Token::Minus)) = first {
            first = tokens.next();
        }
        if tokens.next().is_some() {
            return LiteralFormat::Unspecified;
        }

        match first {
            Some(Ok(Token::HexLiteral(_))) => LiteralFormat::Hex,
            Some(Ok(Token::OctalLiteral(_))) => LiteralFormat::Octal,
            Some(Ok(Token::BinaryLiteral(_))) => LiteralFormat::Binary,
            Some(Ok(Token::IntLiteral(_))) | Some(Ok(Token::FloatLiteral(_))) => {
                LiteralFormat::Decimal
            }
            Some(Ok(Token::CharLiteral(_))) => LiteralFormat::Character,
            _ => LiteralFormat::Unspecified,
        }
    }

    /// Hex, octal, binary and character formats override plain decimal.
    pub fn is_explicit(self) -> bool {
        !matches!(self, LiteralFormat::Unspecified | LiteralFormat::Decimal)
    }

    /// The format both operands of a binary expression are displayed in:
    /// the left side's explicit format, else the right side's, else decimal.
    pub fn shared(left: Self, right: Self) -> Self {
        if left.is_explicit() {
            left
        } else if right.is_explicit() {
            right
        } else {
            LiteralFormat::Decimal
        }
    }
}
