//! Value formatting onto a byte stream.
//!
//! [`Print`] turns integers, floats, strings and lists into calls on a
//! [`ByteWrite`] sink, one byte at a time. The canvas is the usual sink; a
//! `Vec<u8>` works too. Each call returns the number of bytes consumed.
//!
//! Number formatting follows the conventions common on small display
//! libraries: digits above 9 are upper case, the minus sign is only
//! written in base 10 (other bases print the two's-complement value), and
//! floats are rounded half-up to the requested number of decimals with
//! `nan`, `inf` and `ovf` for values that cannot be shown.

use crate::graphics::error::DrawError;

/// Magnitude above which floats print as `ovf`.
const FLOAT_PRINT_LIMIT: f64 = 4_294_967_040.0;

/// Decimals used by [`Printable`] for floats.
pub const DEFAULT_FLOAT_DIGITS: u8 = 2;

/// Separator between list items.
pub const LIST_SEPARATOR: &str = ", ";

/// Byte-at-a-time output.
pub trait ByteWrite {
    /// Write one byte; return how many bytes were consumed (0 or 1).
    fn write_byte(&mut self, byte: u8) -> usize;

    /// Most recent failure, if the sink tracks one.
    fn write_error(&self) -> Option<DrawError> {
        None
    }

    fn clear_write_error(&mut self) {}
}

impl ByteWrite for Vec<u8> {
    fn write_byte(&mut self, byte: u8) -> usize {
        self.push(byte);
        1
    }
}

/// Numeric base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Base {
    Bin = 2,
    Oct = 8,
    #[default]
    Dec = 10,
    Hex = 16,
}

impl Base {
    pub const fn radix(self) -> u64 {
        self as u64
    }
}

/// Values that know how to print themselves.
pub trait Printable {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize;
}

/// Formatting front end available on every [`ByteWrite`].
pub trait Print: ByteWrite {
    fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&b| self.write_byte(b)).sum()
    }

    fn print<T: Printable + ?Sized>(&mut self, value: &T) -> usize {
        value.print_to(self)
    }

    fn println<T: Printable + ?Sized>(&mut self, value: &T) -> usize {
        self.print(value) + self.newline()
    }

    fn newline(&mut self) -> usize {
        self.write_byte(b'\n')
    }

    fn print_unsigned(&mut self, mut n: u64, base: Base) -> usize {
        let radix = base.radix();
        // 64 binary digits is the longest possible output.
        let mut digits = [0u8; 64];
        let mut len = 0;
        loop {
            let d = (n % radix) as u8;
            digits[len] = if d < 10 { b'0' + d } else { b'A' + d - 10 };
            len += 1;
            n /= radix;
            if n == 0 {
                break;
            }
        }
        digits[..len].reverse();
        self.write_bytes(&digits[..len])
    }

    fn print_signed(&mut self, n: i64, base: Base) -> usize {
        if base == Base::Dec && n < 0 {
            self.write_byte(b'-') + self.print_unsigned(n.unsigned_abs(), base)
        } else {
            self.print_unsigned(n as u64, base)
        }
    }

    fn print_float(&mut self, number: f64, digits: u8) -> usize {
        if number.is_nan() {
            return self.write_bytes(b"nan");
        }
        if number.is_infinite() {
            return self.write_bytes(b"inf");
        }
        if number.abs() > FLOAT_PRINT_LIMIT {
            return self.write_bytes(b"ovf");
        }

        let mut count = 0;
        let mut number = number;
        if number < 0.0 {
            count += self.write_byte(b'-');
            number = -number;
        }

        let mut rounding = 0.5;
        for _ in 0..digits {
            rounding /= 10.0;
        }
        number += rounding;

        let int_part = number as u64;
        let mut remainder = number - int_part as f64;
        count += self.print_unsigned(int_part, Base::Dec);

        if digits > 0 {
            count += self.write_byte(b'.');
        }
        for _ in 0..digits {
            remainder *= 10.0;
            let digit = remainder as u64;
            count += self.print_unsigned(digit, Base::Dec);
            remainder -= digit as f64;
        }
        count
    }

    /// Items separated by [`LIST_SEPARATOR`], with no trailing separator.
    fn print_list<T: Printable>(&mut self, items: &[T]) -> usize {
        let mut count = 0;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                count += self.write_bytes(LIST_SEPARATOR.as_bytes());
            }
            count += item.print_to(self);
        }
        count
    }
}

impl<W: ByteWrite + ?Sized> Print for W {}

impl Printable for str {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.write_bytes(self.as_bytes())
    }
}

impl Printable for String {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        self.as_str().print_to(out)
    }
}

impl Printable for [u8] {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.write_bytes(self)
    }
}

impl Printable for char {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        let mut buf = [0u8; 4];
        out.write_bytes(self.encode_utf8(&mut buf).as_bytes())
    }
}

impl Printable for bool {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        let text: &str = if *self { "true" } else { "false" };
        out.write_bytes(text.as_bytes())
    }
}

macro_rules! printable_unsigned {
    ($($t:ty),*) => {$(
        impl Printable for $t {
            fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
                out.print_unsigned(*self as u64, Base::Dec)
            }
        }
    )*};
}

macro_rules! printable_signed {
    ($($t:ty),*) => {$(
        impl Printable for $t {
            fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
                out.print_signed(*self as i64, Base::Dec)
            }
        }
    )*};
}

printable_unsigned!(u8, u16, u32, u64, usize);
printable_signed!(i8, i16, i32, i64, isize);

impl Printable for f32 {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.print_float(f64::from(*self), DEFAULT_FLOAT_DIGITS)
    }
}

impl Printable for f64 {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.print_float(*self, DEFAULT_FLOAT_DIGITS)
    }
}

impl<T: Printable> Printable for Vec<T> {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.print_list(self)
    }
}

impl<T: Printable, const N: usize> Printable for [T; N] {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        out.print_list(self)
    }
}

impl<T: Printable + ?Sized> Printable for &T {
    fn print_to<W: ByteWrite + ?Sized>(&self, out: &mut W) -> usize {
        (**self).print_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> usize) -> (String, usize) {
        let mut out = Vec::new();
        let n = f(&mut out);
        (String::from_utf8(out).unwrap(), n)
    }

    #[rstest]
    #[case(0, Base::Dec, "0")]
    #[case(255, Base::Hex, "FF")]
    #[case(255, Base::Oct, "377")]
    #[case(5, Base::Bin, "101")]
    #[case(u64::MAX, Base::Dec, "18446744073709551615")]
    fn test_print_unsigned(#[case] n: u64, #[case] base: Base, #[case] expected: &str) {
        let (text, count) = render(|out| out.print_unsigned(n, base));
        assert_eq!(text, expected);
        assert_eq!(count, expected.len());
    }

    #[rstest]
    #[case(-42, Base::Dec, "-42")]
    #[case(42, Base::Dec, "42")]
    #[case(-1, Base::Hex, "FFFFFFFFFFFFFFFF")]
    #[case(i64::MIN, Base::Dec, "-9223372036854775808")]
    fn test_print_signed(#[case] n: i64, #[case] base: Base, #[case] expected: &str) {
        assert_eq!(render(|out| out.print_signed(n, base)).0, expected);
    }

    #[rstest]
    #[case(1.23456, 2, "1.23")]
    #[case(-2.5, 1, "-2.5")]
    #[case(2.999, 2, "3.00")]
    #[case(7.0, 0, "7")]
    #[case(f64::NAN, 2, "nan")]
    #[case(f64::NEG_INFINITY, 2, "inf")]
    #[case(5.0e9, 2, "ovf")]
    #[case(-5.0e9, 2, "ovf")]
    fn test_print_float(#[case] n: f64, #[case] digits: u8, #[case] expected: &str) {
        let (text, count) = render(|out| out.print_float(n, digits));
        assert_eq!(text, expected);
        assert_eq!(count, expected.len());
    }

    #[test]
    fn test_print_values() {
        assert_eq!(render(|out| out.print("abc")).0, "abc");
        assert_eq!(render(|out| out.print(&String::from("xy"))).0, "xy");
        assert_eq!(render(|out| out.print(&-7i32)).0, "-7");
        assert_eq!(render(|out| out.print(&200u8)).0, "200");
        assert_eq!(render(|out| out.print(&1.5f32)).0, "1.50");
        assert_eq!(render(|out| out.print(&'Z')).0, "Z");
        assert_eq!(render(|out| out.print(&true)).0, "true");
    }

    #[test]
    fn test_println_appends_newline() {
        let (text, count) = render(|out| out.println("hi"));
        assert_eq!(text, "hi\n");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_lists_have_no_trailing_separator() {
        assert_eq!(render(|out| out.print(&vec![1, 2, 3])).0, "1, 2, 3");
        assert_eq!(render(|out| out.print(&["a", "b"])).0, "a, b");
        assert_eq!(render(|out| out.print_list::<u8>(&[])), (String::new(), 0));
        assert_eq!(render(|out| out.print(&vec![9u16])).0, "9");
    }

    #[test]
    fn test_vec_sink_has_no_error() {
        let mut out = Vec::new();
        out.print("x");
        assert!(out.write_error().is_none());
    }
}
