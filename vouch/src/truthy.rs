// Conversion of non-comparison expressions to a pass/fail result

use std::ptr::NonNull;

/// Whether an asserted value counts as passing
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! truthy_numbers {
    ($zero:expr => $($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                fn is_truthy(&self) -> bool {
                    *self != $zero
                }
            }
        )*
    };
}

truthy_numbers!(0 => u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
truthy_numbers!(0.0 => f32, f64);

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        *self != '\0'
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T, E> Truthy for Result<T, E> {
    fn is_truthy(&self) -> bool {
        self.is_ok()
    }
}

impl<T: ?Sized> Truthy for *const T {
    fn is_truthy(&self) -> bool {
        !self.is_null()
    }
}

impl<T: ?Sized> Truthy for *mut T {
    fn is_truthy(&self) -> bool {
        !self.is_null()
    }
}

impl<T: ?Sized> Truthy for NonNull<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for &mut T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}
