// Data captured for one failed assertion

use std::fmt;

use vouch_lexer::LiteralFormat;

use crate::trace::Frame;
use crate::value::Repr;

/// Which macro failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssertKind {
    Assert,
    Verify,
    DebugAssert,
}

impl AssertKind {
    /// Word used in the report header
    pub fn action(self) -> &'static str {
        match self {
            AssertKind::Assert => "Assertion",
            AssertKind::Verify => "Verification",
            AssertKind::DebugAssert => "Debug assertion",
        }
    }
}

impl fmt::Display for AssertKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.action())
    }
}

/// Whether the default handlers terminate after reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Fatal,
    NonFatal,
}

impl Severity {
    pub fn is_fatal(self) -> bool {
        self == Severity::Fatal
    }
}

/// Top-level operator of the asserted expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    /// Bare or unary expression
    None,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Assign => "=",
            Operator::AddAssign => "+=",
            Operator::SubAssign => "-=",
            Operator::MulAssign => "*=",
            Operator::DivAssign => "/=",
            Operator::RemAssign => "%=",
            Operator::BitAndAssign => "&=",
            Operator::BitOrAssign => "|=",
            Operator::BitXorAssign => "^=",
            Operator::ShlAssign => "<<=",
            Operator::ShrAssign => ">>=",
            Operator::None => "",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }
}

/// Lazily stringifies a captured operand in the requested format
pub type Render<'a> = &'a dyn Fn(LiteralFormat) -> Option<Repr>;

/// One operand or extra diagnostic value
#[derive(Clone, Copy)]
pub struct Value<'a> {
    /// Normalized source text
    pub text: &'a str,
    /// `core::any::type_name` of the value
    pub type_name: &'a str,
    /// Format implied by the source text
    pub format: LiteralFormat,
    /// False for a right-hand side skipped by short-circuiting
    pub evaluated: bool,
    render: Render<'a>,
}

impl<'a> Value<'a> {
    pub fn new(
        text: &'a str,
        type_name: &'a str,
        format: LiteralFormat,
        render: Render<'a>,
    ) -> Self {
        Self {
            text,
            type_name,
            format,
            evaluated: true,
            render,
        }
    }

    pub fn evaluated(mut self, evaluated: bool) -> Self {
        self.evaluated = evaluated;
        self
    }

    /// Stringify the value. `None` if it was never evaluated or its type has
    /// no representation.
    pub fn render(&self, format: LiteralFormat) -> Option<Repr> {
        if !self.evaluated {
            return None;
        }
        (self.render)(format)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Value")
            .field("text", &self.text)
            .field("type_name", &self.type_name)
            .field("format", &self.format)
            .field("evaluated", &self.evaluated)
            .finish_non_exhaustive()
    }
}

/// Where the assertion was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub file: &'a str,
    pub line: u32,
    pub column: u32,
    /// Path of the enclosing function, uncleaned
    pub function: &'a str,
}

/// Everything known about a failed assertion
#[derive(Debug, Clone)]
pub struct AssertionRecord<'a> {
    pub kind: AssertKind,
    pub severity: Severity,
    pub location: Location<'a>,
    /// `assert`, `verify`, `debug_assert` or `check`
    pub macro_name: &'a str,
    /// Normalized text of the condition
    pub expression: &'a str,
    pub operator: Operator,
    pub operands: Vec<Value<'a>>,
    pub extras: Vec<Value<'a>>,
    pub message: Option<&'a str>,
    pub trace: Vec<Frame>,
}

impl<'a> AssertionRecord<'a> {
    /// Format in which both operands are shown
    pub fn operand_format(&self) -> LiteralFormat {
        match self.operands.as_slice() {
            [left, right] => LiteralFormat::shared(left.format, right.format),
            [single] => LiteralFormat::shared(single.format, LiteralFormat::Unspecified),
            _ => LiteralFormat::Decimal,
        }
    }

    /// Whether the macro was given arguments beyond the condition
    pub fn has_arguments(&self) -> bool {
        self.message.is_some() || !self.extras.is_empty()
    }
}
