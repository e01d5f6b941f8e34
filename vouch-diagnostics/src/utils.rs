// String helpers shared by the renderer and the type-name cleanup rules

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Characters `trim` removes from both ends
pub const WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0c', '\x0b'];

/// SGR sequences as emitted by [`crate::paint`]
static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("invalid regex"));

/// Split on any of the delimiter characters. Empty pieces are kept and the
/// result always has at least one element.
pub fn split<'a>(s: &'a str, delims: &str) -> Vec<&'a str> {
    s.split(|c: char| delims.contains(c)).collect()
}

pub fn trim(s: &str) -> &str {
    s.trim_matches(WHITESPACE)
}

/// Replace every non-overlapping occurrence of `needle`, scanning left to right.
pub fn replace_all(s: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return s.to_string();
    }
    s.replace(needle, replacement)
}

/// Like [`replace_all`], but resumes one character after each replacement so
/// that a replacement can form a new match: `> > >` with `"> >" -> ">>"`
/// becomes `>>>`.
pub fn replace_all_dynamic(s: &str, needle: &str, replacement: &str) -> String {
    let mut out = s.to_string();
    if needle.is_empty() {
        return out;
    }
    let mut pos = 0;
    while let Some(found) = out.get(pos..).and_then(|rest| rest.find(needle)) {
        let at = pos + found;
        out.replace_range(at..at + needle.len(), replacement);
        pos = at
            + out
                .get(at..)
                .and_then(|rest| rest.chars().next())
                .map_or(1, char::len_utf8);
    }
    out
}

/// Replace every match of `re`; `$name` references expand as in [`Regex::replace_all`].
pub fn replace_all_regex(s: &str, re: &Regex, replacement: &str) -> String {
    re.replace_all(s, replacement).into_owned()
}

/// Replace every match of `re` together with the rest of the generic argument
/// list it opens. A match ending in `Foo<` is extended to its matching `>`, so
/// `Foo<Bar<u8>, Baz>::x` with the rule `Foo<` -> `Foo` gives `Foo::x`.
///
/// An unbalanced match is replaced through the end of the string.
pub fn replace_all_template(s: &str, re: &Regex, replacement: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut cursor = 0;

    while let Some(m) = re.find_at(s, cursor) {
        if m.end() == m.start() {
            break;
        }
        let depth = m.as_str().matches('<').count() as isize
            - m.as_str().matches('>').count() as isize;
        let end = if depth > 0 {
            matching_close(s, m.end(), depth).unwrap_or(s.len())
        } else {
            m.end()
        };
        crate::primitive_assert!(end >= m.start(), "template match ran backwards");

        out.push_str(&s[cursor..m.start()]);
        out.push_str(replacement);
        cursor = end;
    }

    out.push_str(&s[cursor..]);
    out
}

fn matching_close(s: &str, from: usize, mut depth: isize) -> Option<usize> {
    for (offset, c) in s.get(from..)?.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Prefix every line with `depth` copies of `c`, optionally leaving the first
/// line alone.
pub fn indent(s: &str, depth: usize, c: char, ignore_first: bool) -> String {
    let pad: String = std::iter::repeat(c).take(depth).collect();
    let mut out = String::with_capacity(s.len() + depth * 4);

    for (i, line) in s.split('\n').enumerate() {
        if i != 0 {
            out.push('\n');
        }
        if i != 0 || !ignore_first {
            out.push_str(&pad);
        }
        out.push_str(line);
    }

    out
}

/// Remove the color sequences added by the painter.
pub fn strip_colors(s: &str) -> String {
    ANSI_SGR.replace_all(s, "").into_owned()
}

/// Display width of text, ignoring color sequences.
pub fn visible_width(s: &str) -> usize {
    if s.contains('\x1b') {
        strip_colors(s).chars().count()
    } else {
        s.chars().count()
    }
}

/// Greedy word wrap. A width of 0 disables wrapping; words longer than the
/// width get a line of their own.
pub fn wrap_words(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return s.lines().map(str::to_string).collect();
    }

    let mut lines = Vec::new();
    for paragraph in s.lines() {
        let mut line = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// For each distinct path, the shortest suffix of its components that no
/// other distinct path ends with.
///
/// `["src/a/mod.rs", "src/b/mod.rs", "src/lib.rs"]` maps to `a/mod.rs`,
/// `b/mod.rs` and `lib.rs`.
pub fn unique_suffixes<'a, I>(paths: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let distinct: Vec<&str> = paths.into_iter().filter(|p| seen.insert(*p)).collect();
    let components: Vec<Vec<&str>> = distinct
        .iter()
        .map(|p| p.split(['/', '\\']).filter(|c| !c.is_empty()).rev().collect())
        .collect();

    let mut result = HashMap::with_capacity(distinct.len());
    for (index, path) in distinct.iter().enumerate() {
        let own = &components[index];
        let mut length = 1;
        while length < own.len() {
            let clashes = components
                .iter()
                .enumerate()
                .any(|(other, parts)| other != index && parts.starts_with(&own[..length]));
            if !clashes {
                break;
            }
            length += 1;
        }
        let suffix: Vec<&str> = own.iter().take(length).rev().copied().collect();
        let suffix = if suffix.is_empty() {
            path.to_string()
        } else {
            suffix.join("/")
        };
        result.insert(path.to_string(), suffix);
    }

    result
}

/// The final component of a path.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
