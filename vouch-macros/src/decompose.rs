// Expression decomposition
//
// The condition is split at its top-level operator. Each operand is bound once,
// in source order, and the operator is applied to the bindings. Only when the
// check fails are the extra arguments evaluated and the failure record built.

use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{BinOp, Expr, Ident, Token, UnOp};
use vouch_lexer::{normalize, LiteralFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Assert,
    Verify,
    DebugAssert,
    Check,
}

impl MacroKind {
    fn name(self) -> &'static str {
        match self {
            MacroKind::Assert => "assert",
            MacroKind::Verify => "verify",
            MacroKind::DebugAssert => "debug_assert",
            MacroKind::Check => "check",
        }
    }

    fn assert_kind(self) -> TokenStream {
        match self {
            MacroKind::Assert | MacroKind::Check => quote!(::vouch::AssertKind::Assert),
            MacroKind::Verify => quote!(::vouch::AssertKind::Verify),
            MacroKind::DebugAssert => quote!(::vouch::AssertKind::DebugAssert),
        }
    }

    fn severity(self) -> TokenStream {
        match self {
            MacroKind::Check => quote!(::vouch::Severity::NonFatal),
            _ => quote!(::vouch::Severity::Fatal),
        }
    }
}

/// `condition, extra, extra, ...`
pub struct Args {
    pub condition: Expr,
    pub extras: Vec<Expr>,
}

impl Parse for Args {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let items = Punctuated::<Expr, Token![,]>::parse_terminated(input)?;
        let mut items = items.into_iter();
        let condition = items
            .next()
            .ok_or_else(|| input.error("expected a condition to assert"))?;
        Ok(Args {
            condition,
            extras: items.collect(),
        })
    }
}

/// Top-level structure of the asserted expression
pub enum Shape<'a> {
    Compare {
        left: &'a Expr,
        op: &'a BinOp,
        right: &'a Expr,
    },
    Logical {
        left: &'a Expr,
        op: &'a BinOp,
        right: &'a Expr,
    },
    Binary {
        left: &'a Expr,
        op: &'a BinOp,
        right: &'a Expr,
    },
    Assign {
        place: &'a Expr,
        op: Option<&'a BinOp>,
        value: &'a Expr,
    },
    Bare(&'a Expr),
}

/// Strip the invisible groups macro_rules wraps around `$e:expr` and any
/// redundant parentheses.
pub fn peel(expr: &Expr) -> &Expr {
    match expr {
        Expr::Group(group) => peel(&group.expr),
        Expr::Paren(paren) => peel(&paren.expr),
        _ => expr,
    }
}

pub fn classify(expr: &Expr) -> Shape<'_> {
    match peel(expr) {
        Expr::Binary(binary) => {
            let (left, op, right) = (&*binary.left, &binary.op, &*binary.right);
            match op {
                BinOp::Eq(_) | BinOp::Ne(_) | BinOp::Lt(_) | BinOp::Le(_) | BinOp::Gt(_)
                | BinOp::Ge(_) => Shape::Compare { left, op, right },
                BinOp::And(_) | BinOp::Or(_) => Shape::Logical { left, op, right },
                BinOp::Add(_) | BinOp::Sub(_) | BinOp::Mul(_) | BinOp::Div(_) | BinOp::Rem(_)
                | BinOp::BitAnd(_) | BinOp::BitOr(_) | BinOp::BitXor(_) | BinOp::Shl(_)
                | BinOp::Shr(_) => Shape::Binary { left, op, right },
                BinOp::AddAssign(_)
                | BinOp::SubAssign(_)
                | BinOp::MulAssign(_)
                | BinOp::DivAssign(_)
                | BinOp::RemAssign(_)
                | BinOp::BitXorAssign(_)
                | BinOp::BitAndAssign(_)
                | BinOp::BitOrAssign(_)
                | BinOp::ShlAssign(_)
                | BinOp::ShrAssign(_) => Shape::Assign {
                    place: left,
                    op: Some(op),
                    value: right,
                },
                _ => Shape::Bare(expr),
            }
        }
        Expr::Assign(assign) => Shape::Assign {
            place: &assign.left,
            op: None,
            value: &assign.right,
        },
        _ => Shape::Bare(expr),
    }
}

/// Place expressions are borrowed rather than moved into the capture.
pub fn is_place(expr: &Expr) -> bool {
    match expr {
        Expr::Path(_) | Expr::Field(_) | Expr::Index(_) => true,
        Expr::Unary(unary) => matches!(unary.op, UnOp::Deref(_)),
        Expr::Paren(paren) => is_place(&paren.expr),
        Expr::Group(group) => is_place(&group.expr),
        _ => false,
    }
}

fn operator(op: Option<&BinOp>) -> TokenStream {
    let name = match op {
        None => "Assign",
        Some(op) => match op {
            BinOp::Eq(_) => "Eq",
            BinOp::Ne(_) => "Ne",
            BinOp::Lt(_) => "Lt",
            BinOp::Le(_) => "Le",
            BinOp::Gt(_) => "Gt",
            BinOp::Ge(_) => "Ge",
            BinOp::And(_) => "And",
            BinOp::Or(_) => "Or",
            BinOp::BitAnd(_) => "BitAnd",
            BinOp::BitOr(_) => "BitOr",
            BinOp::BitXor(_) => "BitXor",
            BinOp::Shl(_) => "Shl",
            BinOp::Shr(_) => "Shr",
            BinOp::Add(_) => "Add",
            BinOp::Sub(_) => "Sub",
            BinOp::Mul(_) => "Mul",
            BinOp::Div(_) => "Div",
            BinOp::Rem(_) => "Rem",
            BinOp::AddAssign(_) => "AddAssign",
            BinOp::SubAssign(_) => "SubAssign",
            BinOp::MulAssign(_) => "MulAssign",
            BinOp::DivAssign(_) => "DivAssign",
            BinOp::RemAssign(_) => "RemAssign",
            BinOp::BitAndAssign(_) => "BitAndAssign",
            BinOp::BitOrAssign(_) => "BitOrAssign",
            BinOp::BitXorAssign(_) => "BitXorAssign",
            BinOp::ShlAssign(_) => "ShlAssign",
            BinOp::ShrAssign(_) => "ShrAssign",
            _ => "None",
        },
    };
    let variant = Ident::new(name, Span::call_site());
    quote!(::vouch::Operator::#variant)
}

fn text_of(expr: &Expr) -> String {
    normalize(&expr.to_token_stream().to_string())
}

fn format_tokens(text: &str) -> TokenStream {
    let variant = match LiteralFormat::of(text) {
        LiteralFormat::Unspecified => "Unspecified",
        LiteralFormat::Decimal => "Decimal",
        LiteralFormat::Hex => "Hex",
        LiteralFormat::Octal => "Octal",
        LiteralFormat::Binary => "Binary",
        LiteralFormat::Character => "Character",
    };
    let variant = Ident::new(variant, Span::call_site());
    quote!(::vouch::LiteralFormat::#variant)
}

fn local(name: &str) -> Ident {
    Ident::new(name, Span::mixed_site())
}

/// A bound operand: how it was bound and how to reach it by reference.
struct Captured {
    binding: TokenStream,
    reference: TokenStream,
    /// The value handed back by `verify!`
    value: TokenStream,
}

fn capture(name: &Ident, expr: &Expr) -> Captured {
    if is_place(expr) {
        Captured {
            binding: quote!(let #name = &#expr;),
            reference: quote!(#name),
            value: quote!(#name),
        }
    } else {
        Captured {
            binding: quote!(let #name = #expr;),
            reference: quote!(&#name),
            value: quote!(#name),
        }
    }
}

/// An operand or extra value as it appears in the failure record.
struct Entry {
    text: String,
    reference: TokenStream,
    /// Only evaluated when this expression is true
    evaluated: Option<TokenStream>,
    /// Overrides the default `type_name_of_val(reference)`
    type_name: Option<TokenStream>,
    /// Overrides the default renderer body
    render: Option<TokenStream>,
}

impl Entry {
    fn new(expr: &Expr, reference: TokenStream) -> Self {
        Self {
            text: text_of(expr),
            reference,
            evaluated: None,
            type_name: None,
            render: None,
        }
    }

    /// Renderer closure binding plus the `Value` constructor using it.
    fn to_value(&self, render_name: &Ident) -> (TokenStream, TokenStream) {
        let reference = &self.reference;
        let format = local("__vouch_format");
        let body = self.render.clone().unwrap_or_else(|| {
            quote!((&&&::vouch::__private::Capture(#reference)).__vouch_repr(#format))
        });
        let closure = quote! {
            let #render_name = |#format: ::vouch::LiteralFormat| #body;
        };

        let text = &self.text;
        let hint = format_tokens(text);
        let type_name = self
            .type_name
            .clone()
            .unwrap_or_else(|| quote!(::vouch::__private::type_name_of_val(#reference)));
        let mut value = quote! {
            ::vouch::__private::Value::new(#text, #type_name, #hint, &#render_name)
        };
        if let Some(evaluated) = &self.evaluated {
            value = quote!(#value.evaluated(#evaluated));
        }
        (closure, value)
    }
}

pub fn expand(input: TokenStream, kind: MacroKind) -> TokenStream {
    let args: Args = match syn::parse2(input) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };
    expand_args(&args, kind)
}

fn expand_args(args: &Args, kind: MacroKind) -> TokenStream {
    let left = local("__vouch_left");
    let right = local("__vouch_right");
    let value = local("__vouch_value");
    let pass = local("__vouch_pass");

    let mut bindings = Vec::new();
    let mut entries = Vec::new();
    let returned;
    let op_tokens;

    match classify(&args.condition) {
        Shape::Compare {
            left: lhs,
            op,
            right: rhs,
        } => {
            let l = capture(&left, lhs);
            let r = capture(&right, rhs);
            let (lref, rref) = (&l.reference, &r.reference);
            bindings.push(l.binding.clone());
            bindings.push(r.binding.clone());
            bindings.push(quote!(let #pass: bool = #lref #op #rref;));
            entries.push(Entry::new(lhs, l.reference.clone()));
            entries.push(Entry::new(rhs, r.reference.clone()));
            returned = l.value;
            op_tokens = operator(Some(op));
        }
        Shape::Logical {
            left: lhs,
            op,
            right: rhs,
        } => {
            let reached = match op {
                BinOp::Or(_) => quote!(!#left),
                _ => quote!(#left),
            };
            let item = local("__vouch_item");
            let format = local("__vouch_format");
            bindings.push(quote!(let #left: bool = #lhs;));
            bindings.push(quote! {
                let #right: ::core::option::Option<bool> = if #reached {
                    ::core::option::Option::Some(#rhs)
                } else {
                    ::core::option::Option::None
                };
            });
            bindings.push(quote! {
                let #pass: bool = match #right {
                    ::core::option::Option::Some(#item) => #item,
                    ::core::option::Option::None => #left,
                };
            });
            entries.push(Entry::new(lhs, quote!(&#left)));
            let mut second = Entry::new(rhs, quote!(&#right));
            second.evaluated = Some(quote!(#right.is_some()));
            second.type_name = Some(quote!(::core::any::type_name::<bool>()));
            second.render = Some(quote! {
                match &#right {
                    ::core::option::Option::Some(#item) => {
                        (&&&::vouch::__private::Capture(#item)).__vouch_repr(#format)
                    }
                    ::core::option::Option::None => ::core::option::Option::None,
                }
            });
            entries.push(second);
            returned = quote!(#pass);
            op_tokens = operator(Some(op));
        }
        Shape::Binary {
            left: lhs,
            op,
            right: rhs,
        } => {
            let l = capture(&left, lhs);
            let r = capture(&right, rhs);
            let (lref, rref) = (&l.reference, &r.reference);
            bindings.push(l.binding.clone());
            bindings.push(r.binding.clone());
            bindings.push(quote!(let #value = #lref #op #rref;));
            bindings.push(quote!(let #pass: bool = ::vouch::Truthy::is_truthy(&#value);));
            entries.push(Entry::new(lhs, l.reference.clone()));
            entries.push(Entry::new(rhs, r.reference.clone()));
            returned = quote!(#value);
            op_tokens = operator(Some(op));
        }
        Shape::Assign { place, op, value: rhs } => {
            let assign = match op {
                Some(op) => op.to_token_stream(),
                None => quote!(=),
            };
            // Borrow the place again as shared so extras may name it.
            bindings.push(quote!(let #right = #rhs;));
            bindings.push(quote!(#place #assign #right;));
            bindings.push(quote!(let #value = &#place;));
            bindings.push(quote!(let #pass: bool = ::vouch::Truthy::is_truthy(#value);));
            entries.push(Entry::new(place, quote!(#value)));
            returned = quote!(#value);
            op_tokens = operator(op);
        }
        Shape::Bare(expr) => {
            let captured = capture(&value, expr);
            let reference = &captured.reference;
            bindings.push(captured.binding.clone());
            bindings.push(quote!(let #pass: bool = ::vouch::Truthy::is_truthy(#reference);));
            entries.push(Entry::new(expr, captured.reference.clone()));
            returned = captured.value;
            op_tokens = quote!(::vouch::Operator::None);
        }
    }

    // Extra arguments: evaluated only on failure, in call order
    let mut extra_bindings = Vec::new();
    let mut extra_entries = Vec::new();
    for (index, extra) in args.extras.iter().enumerate() {
        let name = local(&format!("__vouch_extra_{}", index));
        let captured = capture(&name, extra);
        extra_bindings.push(captured.binding);
        extra_entries.push(Entry::new(extra, captured.reference));
    }
    let message = match extra_entries.first() {
        Some(first) => {
            let reference = &first.reference;
            quote!((&&::vouch::__private::Capture(#reference)).__vouch_message())
        }
        None => quote!(::core::option::Option::None),
    };

    let mut renderers = Vec::new();
    let mut operand_values = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let (closure, value) = entry.to_value(&local(&format!("__vouch_render_{}", index)));
        renderers.push(closure);
        operand_values.push(value);
    }
    let mut extra_values = Vec::new();
    for (index, entry) in extra_entries.iter().enumerate() {
        let (closure, value) = entry.to_value(&local(&format!("__vouch_render_extra_{}", index)));
        renderers.push(closure);
        extra_values.push(value);
    }

    let assert_kind = kind.assert_kind();
    let severity = kind.severity();
    let macro_name = kind.name();
    let expression = text_of(&args.condition);
    let here = local("__vouch_here");

    let body = quote! {
        #[allow(unused_imports)]
        use ::vouch::__private::{
            ViaDebug as _, ViaDisplay as _, ViaMessage as _, ViaNoMessage as _, ViaNothing as _,
            ViaStringify as _,
        };
        #(#bindings)*
        if !#pass {
            #(#extra_bindings)*
            #(#renderers)*
            ::vouch::__private::fail(::vouch::__private::Failure {
                kind: #assert_kind,
                severity: #severity,
                macro_name: #macro_name,
                file: ::core::file!(),
                line: ::core::line!(),
                column: ::core::column!(),
                function: {
                    fn #here() {}
                    ::vouch::__private::function_name(::vouch::__private::type_name_of_val(&#here))
                },
                expression: #expression,
                operator: #op_tokens,
                operands: &[#(#operand_values),*],
                extras: &[#(#extra_values),*],
                message: #message,
            });
        }
    };

    match kind {
        MacroKind::Verify => quote!({ #body #returned }),
        MacroKind::DebugAssert => quote! {
            if ::core::cfg!(debug_assertions) {
                #body
            }
        },
        MacroKind::Assert | MacroKind::Check => quote!({ #body }),
    }
}
