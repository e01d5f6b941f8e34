// Normalizing token-stream text produced by proc macros
// `quote!(#expr).to_string()` separates every token with a space.

use vouch_lexer::normalize;

#[test]
fn test_calls_and_indexing() {
    assert_eq!(normalize("foo () < bar ()"), "foo() < bar()");
    assert_eq!(normalize("v [i] == 'c'"), "v[i] == 'c'");
    assert_eq!(normalize("s . chars () . count () > 0"), "s.chars().count() > 0");
}

#[test]
fn test_macro_calls() {
    assert_eq!(normalize("vec ! [1 , 2 , 3] == v"), "vec![1, 2, 3] == v");
    assert_eq!(
        normalize("matches ! (x , Some (_))"),
        "matches!(x, Some(_))"
    );
}

#[test]
fn test_turbofish() {
    assert_eq!(
        normalize("Vec :: < i32 > :: new () . len () == 0"),
        "Vec::<i32>::new().len() == 0"
    );
    assert_eq!(normalize("parse :: < u8 > ()"), "parse::<u8>()");
    assert_eq!(
        normalize("collect :: < Vec < String > > ()"),
        "collect::<Vec<String>>()"
    );
}

#[test]
fn test_comparisons_are_not_generics() {
    assert_eq!(normalize("a < b && c > d"), "a < b && c > d");
    assert_eq!(normalize("x >> 2 == 1"), "x >> 2 == 1");
}

#[test]
fn test_closures() {
    assert_eq!(
        normalize("v . iter () . all (| x | * x > 0)"),
        "v.iter().all(|x| *x > 0)"
    );
    assert_eq!(normalize("a | b == c"), "a | b == c");
}

#[test]
fn test_ranges_and_tuples() {
    assert_eq!(normalize("(0 .. 10) . contains (& x)"), "(0..10).contains(&x)");
    assert_eq!(normalize("(1 , 2) == t"), "(1, 2) == t");
    assert_eq!(normalize("Point { x : 1 , y : 2 } == p"), "Point { x: 1, y: 2 } == p");
}

#[test]
fn test_literals_untouched() {
    assert_eq!(normalize("0b000101010 == x"), "0b000101010 == x");
    assert_eq!(normalize("s == \"a  b\""), "s == \"a  b\"");
    assert_eq!(normalize("s == r#\"x . y\"#"), "s == r#\"x . y\"#");
}

#[test]
fn test_try_and_casts() {
    assert_eq!(normalize("read () ? . len () as u64 > 3"), "read()?.len() as u64 > 3");
}
