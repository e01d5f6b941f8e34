use vouch_lexer::{highlight, Highlight, LiteralFormat};

#[test]
fn test_radix_literals_with_suffixes() {
    assert_eq!(LiteralFormat::of("0xFF_u8"), LiteralFormat::Hex);
    assert_eq!(LiteralFormat::of("0b1010i32"), LiteralFormat::Binary);
    assert_eq!(LiteralFormat::of("0o777usize"), LiteralFormat::Octal);
    assert_eq!(LiteralFormat::of("1_000_000"), LiteralFormat::Decimal);
}

#[test]
fn test_expressions_have_no_format() {
    assert_eq!(LiteralFormat::of("0x10 + 1"), LiteralFormat::Unspecified);
    assert_eq!(LiteralFormat::of("foo(0x10)"), LiteralFormat::Unspecified);
    assert_eq!(LiteralFormat::of(""), LiteralFormat::Unspecified);
}

#[test]
fn test_character_literals() {
    assert_eq!(LiteralFormat::of("'x'"), LiteralFormat::Character);
    assert_eq!(LiteralFormat::of("'\\n'"), LiteralFormat::Character);
    assert_eq!(LiteralFormat::of("b'\\x7f'"), LiteralFormat::Character);
}

#[test]
fn test_highlight_pretty_value() {
    let value = "{\n    \"bar\": [-100, 200],\n}";
    let segments = highlight(value);
    let joined: String = segments.iter().map(|s| s.text).collect();
    assert_eq!(joined, value);
    assert!(segments
        .iter()
        .any(|s| s.text == "\"bar\"" && s.kind == Highlight::String));
    assert!(segments
        .iter()
        .any(|s| s.text == "200" && s.kind == Highlight::Number));
}
