// Stringified values
//
// A `Repr` keeps container structure around so the renderer can decide how to
// lay a value out once it knows how much room there is.

use std::fmt;

use crate::utils::indent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    /// `[a, b]`
    Bracket,
    /// `Name(a, b)`
    Paren,
    /// `(a, b)` and the one-element `(a,)`
    Tuple,
    /// `{a, b}`, or `Name { a, b }` when there is a prefix
    Brace,
}

impl Delim {
    fn open(self) -> &'static str {
        match self {
            Delim::Bracket => "[",
            Delim::Paren | Delim::Tuple => "(",
            Delim::Brace => "{",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Delim::Bracket => "]",
            Delim::Paren | Delim::Tuple => ")",
            Delim::Brace => "}",
        }
    }
}

/// A value rendered for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repr {
    /// Indivisible text: numbers, strings, pointers, unit variants
    Atom(String),
    /// A delimited sequence with an optional prefix (`Some(..)`, `Point { .. }`)
    List {
        delim: Delim,
        prefix: String,
        items: Vec<Repr>,
    },
    /// `name: value`, used for map entries and named fields
    Field { name: String, value: Box<Repr> },
    /// Pre-rendered text with a separate multi-line form, e.g. `{:?}`/`{:#?}`
    Text { flat: String, pretty: String },
}

impl Repr {
    pub fn atom(text: impl Into<String>) -> Self {
        Repr::Atom(text.into())
    }

    pub fn text(flat: impl Into<String>, pretty: impl Into<String>) -> Self {
        Repr::Text {
            flat: flat.into(),
            pretty: pretty.into(),
        }
    }

    /// `[a, b, c]`
    pub fn sequence(items: Vec<Repr>) -> Self {
        Repr::List {
            delim: Delim::Bracket,
            prefix: String::new(),
            items,
        }
    }

    /// `{a, b, c}`
    pub fn set(items: Vec<Repr>) -> Self {
        Repr::List {
            delim: Delim::Brace,
            prefix: String::new(),
            items,
        }
    }

    /// `{k: v, ...}`
    pub fn map(entries: Vec<(Repr, Repr)>) -> Self {
        let items = entries
            .into_iter()
            .map(|(key, value)| Repr::field(key.flat(), value))
            .collect();
        Repr::set(items)
    }

    /// `(a, b)`
    pub fn tuple(items: Vec<Repr>) -> Self {
        Repr::List {
            delim: Delim::Tuple,
            prefix: String::new(),
            items,
        }
    }

    /// `Name(a, b)`
    pub fn tuple_struct(name: impl Into<String>, items: Vec<Repr>) -> Self {
        Repr::List {
            delim: Delim::Paren,
            prefix: name.into(),
            items,
        }
    }

    /// `Name { a: x, b: y }`
    pub fn structure(name: impl Into<String>, fields: Vec<(String, Repr)>) -> Self {
        Repr::List {
            delim: Delim::Brace,
            prefix: name.into(),
            items: fields
                .into_iter()
                .map(|(name, value)| Repr::field(name, value))
                .collect(),
        }
    }

    pub fn field(name: impl Into<String>, value: Repr) -> Self {
        Repr::Field {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn is_container(&self) -> bool {
        match self {
            Repr::List { .. } => true,
            Repr::Text { flat, pretty } => flat != pretty,
            Repr::Atom(_) | Repr::Field { .. } => false,
        }
    }

    /// Single-line rendering.
    pub fn flat(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out);
        out
    }

    fn write_flat(&self, out: &mut String) {
        match self {
            Repr::Atom(text) => out.push_str(text),
            Repr::Text { flat, .. } => out.push_str(flat),
            Repr::Field { name, value } => {
                out.push_str(name);
                out.push_str(": ");
                value.write_flat(out);
            }
            Repr::List {
                delim,
                prefix,
                items,
            } => {
                out.push_str(prefix);
                let spaced = *delim == Delim::Brace && !prefix.is_empty();
                if spaced {
                    out.push(' ');
                }
                out.push_str(delim.open());
                if spaced && !items.is_empty() {
                    out.push(' ');
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_flat(out);
                }
                if *delim == Delim::Tuple && items.len() == 1 {
                    out.push(',');
                }
                if spaced && !items.is_empty() {
                    out.push(' ');
                }
                out.push_str(delim.close());
            }
        }
    }

    /// Rendering that fits in `width` columns where structure allows it.
    ///
    /// Lists that do not fit on one line put each item on its own line,
    /// indented by four spaces, with a trailing comma. A width of 0 means
    /// unlimited.
    pub fn pretty(&self, width: usize) -> String {
        let flat = self.flat();
        if width == 0 || flat.chars().count() <= width {
            return flat;
        }

        match self {
            Repr::Atom(_) => flat,
            Repr::Text { pretty, .. } => pretty.clone(),
            Repr::Field { name, value } => {
                let inner = width.saturating_sub(name.chars().count() + 2).max(1);
                format!("{}: {}", name, value.pretty(inner))
            }
            Repr::List {
                delim,
                prefix,
                items,
            } => {
                if items.is_empty() {
                    return flat;
                }
                let mut out = String::new();
                out.push_str(prefix);
                if *delim == Delim::Brace && !prefix.is_empty() {
                    out.push(' ');
                }
                out.push_str(delim.open());
                out.push('\n');
                let inner = width.saturating_sub(4).max(1);
                for item in items {
                    out.push_str(&indent(&item.pretty(inner), 4, ' ', false));
                    out.push_str(",\n");
                }
                out.push_str(delim.close());
                out
            }
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.flat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Vec<Repr> {
        values.iter().map(|v| Repr::atom(v.to_string())).collect()
    }

    #[test]
    fn test_flat_forms() {
        assert_eq!(Repr::sequence(ints(&[1, 2, 3])).flat(), "[1, 2, 3]");
        assert_eq!(Repr::set(ints(&[2, 4])).flat(), "{2, 4}");
        assert_eq!(Repr::tuple(ints(&[1])).flat(), "(1,)");
        assert_eq!(Repr::tuple(vec![]).flat(), "()");
        assert_eq!(Repr::tuple_struct("Some", ints(&[5])).flat(), "Some(5)");
        assert_eq!(
            Repr::map(vec![(Repr::atom("\"a\""), Repr::atom("1"))]).flat(),
            "{\"a\": 1}"
        );
        assert_eq!(
            Repr::structure("P", vec![("x".into(), Repr::atom("1"))]).flat(),
            "P { x: 1 }"
        );
        assert_eq!(Repr::structure("Empty", vec![]).flat(), "Empty {}");
    }

    #[test]
    fn test_pretty_only_when_needed() {
        let list = Repr::sequence(ints(&[1, 2, 3]));
        assert_eq!(list.pretty(80), "[1, 2, 3]");
        assert_eq!(list.pretty(0), "[1, 2, 3]");
        assert_eq!(list.pretty(5), "[\n    1,\n    2,\n    3,\n]");
    }

    #[test]
    fn test_pretty_nested_map() {
        let map = Repr::map(vec![
            (Repr::atom("\"bar\""), Repr::sequence(ints(&[-100, 200, 400, -800]))),
            (Repr::atom("\"foo\""), Repr::sequence(ints(&[1, -2, 3, -4]))),
        ]);
        assert_eq!(
            map.pretty(40),
            "{\n    \"bar\": [-100, 200, 400, -800],\n    \"foo\": [1, -2, 3, -4],\n}"
        );
    }

    #[test]
    fn test_text_uses_pretty_form() {
        let repr = Repr::text("S { a: 1 }", "S {\n    a: 1,\n}");
        assert!(repr.is_container());
        assert_eq!(repr.pretty(4), "S {\n    a: 1,\n}");
        assert_eq!(repr.pretty(40), "S { a: 1 }");
    }
}
