use std::borrow::Cow;
use std::fmt;

/// A key or value accepted by the builder.
///
/// Every variant has a canonical string form, see [`Scalar::to_query_string`].
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar<'a> {
    String(Cow<'a, str>),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Written as `1` or `0`.
    Bool(bool),
}

impl<'a> Scalar<'a> {
    /// Canonical string form of the scalar.
    ///
    /// Integers are written in decimal, floats in their shortest
    /// round-tripping form without a trailing `.0`, booleans as `1`/`0`.
    pub fn to_query_string(&self) -> Cow<'a, str> {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Int(i) => Cow::Owned(itoa::Buffer::new().format(*i).to_owned()),
            Scalar::UInt(u) => Cow::Owned(itoa::Buffer::new().format(*u).to_owned()),
            Scalar::Float(f) => Cow::Owned(format_float(*f)),
            Scalar::Bool(true) => Cow::Borrowed("1"),
            Scalar::Bool(false) => Cow::Borrowed("0"),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Scalar::String(s) => s.into_owned(),
            other => other.to_query_string().into_owned(),
        }
    }
}

fn format_float(f: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format(f);
    formatted.strip_suffix(".0").unwrap_or(formatted).to_owned()
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(s: &'a str) -> Self {
        Scalar::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(s: &'a String) -> Self {
        Scalar::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Scalar<'_> {
    fn from(s: String) -> Self {
        Scalar::String(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Scalar<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Scalar::String(s)
    }
}

impl From<char> for Scalar<'_> {
    fn from(c: char) -> Self {
        Scalar::String(Cow::Owned(c.to_string()))
    }
}

impl From<bool> for Scalar<'_> {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&bool> for Scalar<'_> {
    fn from(b: &bool) -> Self {
        Scalar::Bool(*b)
    }
}

macro_rules! scalar_from {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar<'_> {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v as $target)
                }
            }

            impl From<&$ty> for Scalar<'_> {
                fn from(v: &$ty) -> Self {
                    Scalar::$variant(*v as $target)
                }
            }
        )*
    };
}

scalar_from!(Int as i64: i8, i16, i32, i64, isize);
scalar_from!(UInt as u64: u8, u16, u32, u64, usize);
scalar_from!(Float as f64: f32, f64);

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_forms() {
        assert_eq!(Scalar::from("abc").to_query_string(), "abc");
        assert_eq!(Scalar::from(-42i32).to_query_string(), "-42");
        assert_eq!(Scalar::from(u64::MAX).to_query_string(), "18446744073709551615");
        assert_eq!(Scalar::from(true).to_query_string(), "1");
        assert_eq!(Scalar::from(false).to_query_string(), "0");
        assert_eq!(Scalar::from('é').to_query_string(), "é");
    }

    #[test]
    fn floats() {
        assert_eq!(Scalar::from(1.0f64).to_query_string(), "1");
        assert_eq!(Scalar::from(2.5f64).to_query_string(), "2.5");
        assert_eq!(Scalar::from(-0.125f32).to_query_string(), "-0.125");
        assert_eq!(Scalar::from(1e21f64).to_query_string(), "1e21");
    }

    #[test]
    fn by_reference() {
        let n = 7u8;
        assert_eq!(Scalar::from(&n), Scalar::UInt(7));
        let owned = String::from("x");
        assert_eq!(Scalar::from(&owned).into_string(), "x");
    }
}
