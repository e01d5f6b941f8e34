// vouch-macros - procedural macros behind vouch's assertions
// The generated code refers to the runtime through `::vouch::__private`.

extern crate proc_macro;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod decompose;
mod derive;

use decompose::MacroKind;

/// Fatal assertion. Evaluates to `()`.
#[proc_macro]
pub fn assert(input: TokenStream) -> TokenStream {
    decompose::expand(input.into(), MacroKind::Assert).into()
}

/// Fatal assertion that hands back the checked value.
#[proc_macro]
pub fn verify(input: TokenStream) -> TokenStream {
    decompose::expand(input.into(), MacroKind::Verify).into()
}

/// Fatal assertion compiled only with `debug_assertions`.
#[proc_macro]
pub fn debug_assert(input: TokenStream) -> TokenStream {
    decompose::expand(input.into(), MacroKind::DebugAssert).into()
}

/// Non-fatal assertion: reports and carries on under the built-in handlers.
#[proc_macro]
pub fn check(input: TokenStream) -> TokenStream {
    decompose::expand(input.into(), MacroKind::Check).into()
}

#[proc_macro_derive(Stringify)]
pub fn derive_stringify(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
