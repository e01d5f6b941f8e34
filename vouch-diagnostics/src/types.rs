// Cleanup rules for type names and symbol names
//
// `core::any::type_name` and symbolized frames spell out full module paths,
// e.g. `alloc::vec::Vec<alloc::string::String>`. Reports show `Vec<String>`.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::replace_all_regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("invalid cleanup rule"),
            replacement,
        }
    }

    fn apply(&self, s: &str) -> String {
        replace_all_regex(s, &self.pattern, self.replacement)
    }
}

static TYPE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"\bstd::io::error::Error\b", "io::Error"),
        Rule::new(r"\bcore::fmt::Error\b", "fmt::Error"),
        Rule::new(r"\b(?:core|alloc|std)::(?:[a-z_][a-z0-9_]*::)*", ""),
        Rule::new(r"\{\{closure\}\}", "{closure}"),
    ]
});

static SIGNATURE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"::h[0-9a-f]{16}$", ""),
        Rule::new(r"\{\{vtable\.shim\}\}", ""),
    ]
});

static FN_TRAIT_CAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" as core::ops::function::(FnOnce|FnMut|Fn)<").expect("invalid cleanup rule")
});

/// Shorten a `type_name` for display.
pub fn clean_type_name(name: &str) -> String {
    TYPE_RULES
        .iter()
        .fold(name.to_string(), |acc, rule| rule.apply(&acc))
}

/// Shorten a function path or demangled symbol for display.
pub fn clean_signature(symbol: &str) -> String {
    let cleaned = SIGNATURE_RULES
        .iter()
        .fold(symbol.to_string(), |acc, rule| rule.apply(&acc));
    clean_type_name(&strip_fn_trait_casts(&cleaned))
}

/// `<T as core::ops::function::FnOnce<A>>` becomes `FnOnce`, whatever `T`
/// looks like.
fn strip_fn_trait_casts(symbol: &str) -> String {
    let mut out = symbol.to_string();
    let mut from = 0;
    while let Some(caps) = FN_TRAIT_CAST.captures_at(&out, from) {
        let (Some(cast), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let bytes = out.as_bytes();
        let open = opening_angle(bytes, cast.start());
        let close = closing_angle(bytes, cast.end());
        match (open, close) {
            (Some(open), Some(close)) => {
                let name = name.as_str().to_string();
                out.replace_range(open..close, &name);
                from = open + name.len();
            }
            _ => from = cast.end(),
        }
    }
    out
}

/// Index of the unmatched `<` before `end`. The `>` of `->` does not count.
fn opening_angle(bytes: &[u8], end: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..end).rev() {
        match bytes[i] {
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => depth += 1,
            b'<' if depth == 0 => return Some(i),
            b'<' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Index just past the `>` closing both the trait arguments opened at
/// `start` and the qualified path around them.
fn closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 2usize;
    for i in start..bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_types() {
        assert_eq!(clean_type_name("alloc::string::String"), "String");
        assert_eq!(
            clean_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(
            clean_type_name("std::collections::hash::map::HashMap<&str, core::option::Option<i32>>"),
            "HashMap<&str, Option<i32>>"
        );
        assert_eq!(clean_type_name("std::io::error::Error"), "io::Error");
    }

    #[test]
    fn test_user_types_keep_paths() {
        assert_eq!(clean_type_name("demo::shapes::Point"), "demo::shapes::Point");
        assert_eq!(clean_type_name("i32"), "i32");
        assert_eq!(clean_type_name("&[u8]"), "&[u8]");
    }

    #[test]
    fn test_signatures() {
        assert_eq!(
            clean_signature("demo::recurse::h0123456789abcdef"),
            "demo::recurse"
        );
        assert_eq!(
            clean_signature("<F as core::ops::function::FnOnce<()>>::call_once"),
            "FnOnce::call_once"
        );
        assert_eq!(
            clean_signature(
                "<fn() -> core::result::Result<(), alloc::string::String> as core::ops::function::FnOnce<()>>::call_once"
            ),
            "FnOnce::call_once"
        );
        assert_eq!(
            clean_signature("<alloc::boxed::Box<dyn core::ops::function::Fn<(u8,)>> as core::ops::function::Fn<(u8,)>>::call"),
            "Fn::call"
        );
        assert_eq!(
            clean_signature("<demo::run::{{closure}} as core::ops::function::FnMut<(&str,)>>::call_mut::h0123456789abcdef"),
            "FnMut::call_mut"
        );
        assert_eq!(
            clean_signature("demo::main::{{closure}}"),
            "demo::main::{closure}"
        );
    }
}
