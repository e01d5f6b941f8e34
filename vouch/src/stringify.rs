// Value stringification
//
// `Stringify` is the customization point. Types without an impl fall back to
// `Debug`, then `Display`, at the assertion site (see `engine`).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

use vouch_diagnostics::{LiteralFormat, Repr};

/// Renders a value for an assertion report.
///
/// Implement it by hand or with `#[derive(Stringify)]`. Implementations must
/// be pure: the same value renders the same way every time.
pub trait Stringify {
    fn repr(&self, format: LiteralFormat) -> Repr;

    /// One-line rendering
    fn stringify(&self, format: LiteralFormat) -> String {
        self.repr(format).flat()
    }
}

/// Values usable as the message of an assertion
pub trait AsMessage {
    fn as_message(&self) -> &str;
}

impl Stringify for bool {
    fn repr(&self, _: LiteralFormat) -> Repr {
        Repr::atom(if *self { "true" } else { "false" })
    }
}

impl Stringify for char {
    fn repr(&self, _: LiteralFormat) -> Repr {
        Repr::atom(format!("{:?}", self))
    }
}

fn byte_literal(byte: u8) -> String {
    let escaped: String = std::ascii::escape_default(byte).map(char::from).collect();
    match escaped.as_str() {
        "\\\"" => "b'\"'".to_string(),
        _ => format!("b'{}'", escaped),
    }
}

macro_rules! stringify_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Stringify for $ty {
                fn repr(&self, format: LiteralFormat) -> Repr {
                    Repr::atom(match format {
                        LiteralFormat::Hex => format!("0x{:x}", self),
                        LiteralFormat::Octal => format!("0o{:o}", self),
                        LiteralFormat::Binary => format!("0b{:b}", self),
                        LiteralFormat::Character => match u8::try_from(*self) {
                            Ok(byte) => byte_literal(byte),
                            Err(_) => self.to_string(),
                        },
                        LiteralFormat::Unspecified | LiteralFormat::Decimal => self.to_string(),
                    })
                }
            }
        )*
    };
}

macro_rules! stringify_signed {
    ($($ty:ty),*) => {
        $(
            impl Stringify for $ty {
                fn repr(&self, format: LiteralFormat) -> Repr {
                    let sign = if *self < 0 { "-" } else { "" };
                    let magnitude = self.unsigned_abs();
                    Repr::atom(match format {
                        LiteralFormat::Hex => format!("{}0x{:x}", sign, magnitude),
                        LiteralFormat::Octal => format!("{}0o{:o}", sign, magnitude),
                        LiteralFormat::Binary => format!("{}0b{:b}", sign, magnitude),
                        LiteralFormat::Character => match u8::try_from(*self) {
                            Ok(byte) => byte_literal(byte),
                            Err(_) => self.to_string(),
                        },
                        LiteralFormat::Unspecified | LiteralFormat::Decimal => self.to_string(),
                    })
                }
            }
        )*
    };
}

stringify_unsigned!(u8, u16, u32, u64, u128, usize);
stringify_signed!(i8, i16, i32, i64, i128, isize);

macro_rules! stringify_float {
    ($($ty:ty),*) => {
        $(
            impl Stringify for $ty {
                fn repr(&self, _: LiteralFormat) -> Repr {
                    Repr::atom(format!("{:?}", self))
                }
            }
        )*
    };
}

stringify_float!(f32, f64);

macro_rules! stringify_quoted {
    ($($ty:ty),*) => {
        $(
            impl Stringify for $ty {
                fn repr(&self, _: LiteralFormat) -> Repr {
                    Repr::atom(format!("{:?}", self))
                }
            }
        )*
    };
}

stringify_quoted!(str, String, Path, PathBuf, OsStr, OsString);

impl Stringify for Cow<'_, str> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify + ?Sized> Stringify for &T {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify + ?Sized> Stringify for &mut T {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify + ?Sized> Stringify for Box<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify + ?Sized> Stringify for Rc<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify + ?Sized> Stringify for Arc<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        (**self).repr(format)
    }
}

impl<T: Stringify> Stringify for Option<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        match self {
            Some(value) => Repr::tuple_struct("Some", vec![value.repr(format)]),
            None => Repr::atom("None"),
        }
    }
}

impl<T: Stringify, E: Stringify> Stringify for Result<T, E> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        match self {
            Ok(value) => Repr::tuple_struct("Ok", vec![value.repr(format)]),
            Err(error) => Repr::tuple_struct("Err", vec![error.repr(format)]),
        }
    }
}

fn pointer<T: ?Sized>(ptr: *const T) -> Repr {
    if ptr.is_null() {
        Repr::atom("nullptr")
    } else {
        Repr::atom(format!("{:p}", ptr))
    }
}

impl<T: ?Sized> Stringify for *const T {
    fn repr(&self, _: LiteralFormat) -> Repr {
        pointer(*self)
    }
}

impl<T: ?Sized> Stringify for *mut T {
    fn repr(&self, _: LiteralFormat) -> Repr {
        pointer(self.cast_const())
    }
}

impl<T: ?Sized> Stringify for NonNull<T> {
    fn repr(&self, _: LiteralFormat) -> Repr {
        pointer(self.as_ptr().cast_const())
    }
}

fn sequence<'a, T, I>(items: I, format: LiteralFormat) -> Repr
where
    T: Stringify + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Repr::sequence(items.into_iter().map(|item| item.repr(format)).collect())
}

impl<T: Stringify> Stringify for [T] {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify, const N: usize> Stringify for [T; N] {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify> Stringify for Vec<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify> Stringify for VecDeque<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify> Stringify for LinkedList<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify> Stringify for BinaryHeap<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        sequence(self, format)
    }
}

impl<T: Stringify, S> Stringify for HashSet<T, S> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        Repr::set(self.iter().map(|item| item.repr(format)).collect())
    }
}

impl<T: Stringify> Stringify for BTreeSet<T> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        Repr::set(self.iter().map(|item| item.repr(format)).collect())
    }
}

impl<K: Stringify, V: Stringify, S> Stringify for HashMap<K, V, S> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        Repr::map(
            self.iter()
                .map(|(key, value)| (key.repr(format), value.repr(format)))
                .collect(),
        )
    }
}

impl<K: Stringify, V: Stringify> Stringify for BTreeMap<K, V> {
    fn repr(&self, format: LiteralFormat) -> Repr {
        Repr::map(
            self.iter()
                .map(|(key, value)| (key.repr(format), value.repr(format)))
                .collect(),
        )
    }
}

impl Stringify for () {
    fn repr(&self, _: LiteralFormat) -> Repr {
        Repr::atom("()")
    }
}

macro_rules! stringify_tuple {
    ($($name:ident)+) => {
        impl<$($name: Stringify),+> Stringify for ($($name,)+) {
            #[allow(non_snake_case)]
            fn repr(&self, format: LiteralFormat) -> Repr {
                let ($($name,)+) = self;
                Repr::tuple(vec![$($name.repr(format)),+])
            }
        }
    };
}

stringify_tuple!(A);
stringify_tuple!(A B);
stringify_tuple!(A B C);
stringify_tuple!(A B C D);
stringify_tuple!(A B C D E);
stringify_tuple!(A B C D E F);
stringify_tuple!(A B C D E F G);
stringify_tuple!(A B C D E F G H);
stringify_tuple!(A B C D E F G H I);
stringify_tuple!(A B C D E F G H I J);
stringify_tuple!(A B C D E F G H I J K);
stringify_tuple!(A B C D E F G H I J K L);

impl Stringify for Ordering {
    fn repr(&self, _: LiteralFormat) -> Repr {
        Repr::atom(match self {
            Ordering::Less => "Ordering::Less",
            Ordering::Equal => "Ordering::Equal",
            Ordering::Greater => "Ordering::Greater",
        })
    }
}

/// OS errors show their code and the system message: `2 "No such file or directory"`
impl Stringify for io::Error {
    fn repr(&self, _: LiteralFormat) -> Repr {
        let text = self.to_string();
        match self.raw_os_error() {
            Some(code) => {
                let suffix = format!(" (os error {})", code);
                let message = text.strip_suffix(&suffix).unwrap_or(&text);
                Repr::atom(format!("{} {:?}", code, message))
            }
            None => Repr::atom(format!("{:?}", text)),
        }
    }
}

impl AsMessage for str {
    fn as_message(&self) -> &str {
        self
    }
}

impl AsMessage for String {
    fn as_message(&self) -> &str {
        self
    }
}

impl AsMessage for Cow<'_, str> {
    fn as_message(&self) -> &str {
        self
    }
}

impl AsMessage for Box<str> {
    fn as_message(&self) -> &str {
        self
    }
}

impl AsMessage for Rc<str> {
    fn as_message(&self) -> &str {
        self
    }
}

impl AsMessage for Arc<str> {
    fn as_message(&self) -> &str {
        self
    }
}

impl<T: AsMessage + ?Sized> AsMessage for &T {
    fn as_message(&self) -> &str {
        (**self).as_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat<T: Stringify + ?Sized>(value: &T) -> String {
        value.stringify(LiteralFormat::Unspecified)
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(42u32.stringify(LiteralFormat::Hex), "0x2a");
        assert_eq!(8u8.stringify(LiteralFormat::Octal), "0o10");
        assert_eq!(5u16.stringify(LiteralFormat::Binary), "0b101");
        assert_eq!((-5i32).stringify(LiteralFormat::Binary), "-0b101");
        assert_eq!(b'x'.stringify(LiteralFormat::Character), "b'x'");
        assert_eq!(b'\n'.stringify(LiteralFormat::Character), "b'\\n'");
        assert_eq!(300u32.stringify(LiteralFormat::Character), "300");
        assert_eq!(i64::MIN.stringify(LiteralFormat::Decimal), i64::MIN.to_string());
    }

    #[test]
    fn test_scalars() {
        assert_eq!(flat(&true), "true");
        assert_eq!(flat(&'a'), "'a'");
        assert_eq!(flat(&1.0f64), "1.0");
        assert_eq!(flat(&0.1f32), "0.1");
        assert_eq!(flat(&()), "()");
        assert_eq!(flat(&Ordering::Less), "Ordering::Less");
    }

    #[test]
    fn test_strings_are_quoted() {
        assert_eq!(flat("foo\tbar"), "\"foo\\tbar\"");
        assert_eq!(flat(&String::from("x")), "\"x\"");
        assert_eq!(flat(&Cow::Borrowed("y")), "\"y\"");
        assert_eq!(flat(Path::new("/tmp/a")), "\"/tmp/a\"");
    }

    #[test]
    fn test_pointers() {
        let null: *const i32 = std::ptr::null();
        assert_eq!(flat(&null), "nullptr");
        let value = 5;
        let ptr: *const i32 = &value;
        assert!(flat(&ptr).starts_with("0x"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(flat(&vec![1, 2, 3]), "[1, 2, 3]");
        assert_eq!(flat(&[[1, 2], [3, 4]]), "[[1, 2], [3, 4]]");
        assert_eq!(flat(&Vec::<i32>::new()), "[]");
        let set: BTreeSet<_> = [3, 1, 2].into_iter().collect();
        assert_eq!(flat(&set), "{1, 2, 3}");
        let mut map = BTreeMap::new();
        map.insert("a", vec![1]);
        map.insert("b", vec![]);
        assert_eq!(flat(&map), "{\"a\": [1], \"b\": []}");
        assert_eq!(flat(&(1, "two", 3.0)), "(1, \"two\", 3.0)");
        assert_eq!(flat(&(7,)), "(7,)");
    }

    #[test]
    fn test_option_and_result() {
        assert_eq!(flat(&Some(2)), "Some(2)");
        assert_eq!(flat(&None::<i32>), "None");
        assert_eq!(flat(&Ok::<i32, String>(1)), "Ok(1)");
        assert_eq!(flat(&Err::<i32, String>("bad".into())), "Err(\"bad\")");
        assert_eq!(flat(&Some(vec![0x10u8])), "Some([16])");
        assert_eq!(Some(vec![0x10u8]).stringify(LiteralFormat::Hex), "Some([0x10])");
    }

    #[test]
    fn test_io_error() {
        let error = io::Error::from_raw_os_error(2);
        let text = flat(&error);
        assert!(text.starts_with("2 \""));
        assert!(!text.contains("os error"));

        let custom = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(flat(&custom), "\"boom\"");
    }

    #[test]
    fn test_messages() {
        assert_eq!("hi".as_message(), "hi");
        assert_eq!(String::from("there").as_message(), "there");
        let shared: Arc<str> = Arc::from("arc");
        assert_eq!(shared.as_message(), "arc");
    }
}
