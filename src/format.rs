use regex::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;

/// Renders a value for failure messages.
///
/// One impl per shape: strings are quoted, sequences and tuples print as
/// `[ a, b ]` (`[]` when empty) and scalars use their `Display` form. New
/// shapes get a new impl.
pub trait Pretty {
    fn pretty(&self, out: &mut String);

    /// The form used when the value is printed on its own rather than inside a
    /// sequence or tuple. Only strings differ: they lose their quotes.
    fn plain(&self, out: &mut String) {
        self.pretty(out);
    }
}

/// `Format(value)`: the pretty form of `value` as an owned string.
pub fn format<T: Pretty + ?Sized>(value: &T) -> String {
    let mut out = String::new();
    value.pretty(&mut out);
    out
}

/// Like [`format`], but renders a top-level string without quotes.
pub fn format_plain<T: Pretty + ?Sized>(value: &T) -> String {
    let mut out = String::new();
    value.plain(&mut out);
    out
}

fn escape_regex() -> &'static Regex {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    ESCAPE.get_or_init(|| Regex::new("\x1b").expect("escape pattern is valid"))
}

/// Makes terminal escape bytes visible: ESC becomes the literal text `\033`.
pub fn escape_for_printing(text: &str) -> String {
    escape_regex().replace_all(text, r"\033").into_owned()
}

fn write_list<'a, I>(out: &mut String, items: I)
where
    I: IntoIterator<Item = &'a dyn Pretty>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        out.push_str("[]");
        return;
    }
    out.push_str("[ ");
    let mut first = true;
    for item in items {
        if !first {
            out.push_str(", ");
        }
        first = false;
        item.pretty(out);
    }
    out.push_str(" ]");
}

impl Pretty for str {
    fn pretty(&self, out: &mut String) {
        out.push('"');
        self.plain(out);
        out.push('"');
    }

    fn plain(&self, out: &mut String) {
        out.push_str(&escape_for_printing(self));
    }
}

impl Pretty for String {
    fn pretty(&self, out: &mut String) {
        self.as_str().pretty(out);
    }

    fn plain(&self, out: &mut String) {
        self.as_str().plain(out);
    }
}

impl<T: Pretty + ?Sized> Pretty for &T {
    fn pretty(&self, out: &mut String) {
        (**self).pretty(out);
    }

    fn plain(&self, out: &mut String) {
        (**self).plain(out);
    }
}

impl<T: Pretty + ?Sized> Pretty for Box<T> {
    fn pretty(&self, out: &mut String) {
        (**self).pretty(out);
    }

    fn plain(&self, out: &mut String) {
        (**self).plain(out);
    }
}

macro_rules! pretty_via_display {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Pretty for $ty {
                fn pretty(&self, out: &mut String) {
                    use std::fmt::Write;
                    let _ = write!(out, "{self}");
                }
            }
        )+
    };
}

pretty_via_display!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: Pretty> Pretty for [T] {
    fn pretty(&self, out: &mut String) {
        write_list(out, self.iter().map(|item| item as &dyn Pretty));
    }
}

impl<T: Pretty, const N: usize> Pretty for [T; N] {
    fn pretty(&self, out: &mut String) {
        self.as_slice().pretty(out);
    }
}

impl<T: Pretty> Pretty for Vec<T> {
    fn pretty(&self, out: &mut String) {
        self.as_slice().pretty(out);
    }
}

impl<T: Pretty> Pretty for VecDeque<T> {
    fn pretty(&self, out: &mut String) {
        write_list(out, self.iter().map(|item| item as &dyn Pretty));
    }
}

impl<T: Pretty> Pretty for Option<T> {
    fn pretty(&self, out: &mut String) {
        match self {
            Some(value) => value.pretty(out),
            None => out.push_str("None"),
        }
    }

    fn plain(&self, out: &mut String) {
        match self {
            Some(value) => value.plain(out),
            None => out.push_str("None"),
        }
    }
}

impl Pretty for () {
    fn pretty(&self, out: &mut String) {
        out.push_str("[]");
    }
}

macro_rules! pretty_tuple {
    ($($name:ident),+) => {
        impl<$($name: Pretty),+> Pretty for ($($name,)+) {
            #[allow(non_snake_case)]
            fn pretty(&self, out: &mut String) {
                let ($($name,)+) = self;
                write_list(out, [$($name as &dyn Pretty),+]);
            }
        }
    };
}

pretty_tuple!(A);
pretty_tuple!(A, B);
pretty_tuple!(A, B, C);
pretty_tuple!(A, B, C, D);
pretty_tuple!(A, B, C, D, E);
pretty_tuple!(A, B, C, D, E, F);
pretty_tuple!(A, B, C, D, E, F, G);
pretty_tuple!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuples() {
        assert_eq!(format(&()), "[]");
        assert_eq!(format(&("asdf",)), r#"[ "asdf" ]"#);
        assert_eq!(format(&(69, 420)), "[ 69, 420 ]");
        assert_eq!(format(&("first", "second")), r#"[ "first", "second" ]"#);
        assert_eq!(
            format(&("this is a string that ends with 69", 420)),
            r#"[ "this is a string that ends with 69", 420 ]"#
        );
        assert_eq!(
            format(&(" ", "  ", "   ", "    ")),
            r#"[ " ", "  ", "   ", "    " ]"#
        );
    }

    #[test]
    fn sequences() {
        assert_eq!(format(&vec![1, 2, 3, 4]), "[ 1, 2, 3, 4 ]");
        assert_eq!(
            format(&vec!["asdf", "fdsa", "lemon", "cherry"]),
            r#"[ "asdf", "fdsa", "lemon", "cherry" ]"#
        );
        assert_eq!(
            format(&vec![String::from("asdf"), String::from("fdsa")]),
            r#"[ "asdf", "fdsa" ]"#
        );
        assert_eq!(format(&Vec::<i32>::new()), "[]");
        assert_eq!(format(&[[1, 2], [3, 4]]), "[ [ 1, 2 ], [ 3, 4 ] ]");
    }

    #[test]
    fn scalars_and_escapes() {
        assert_eq!(format(&true), "true");
        assert_eq!(format(&2.5f64), "2.5");
        assert_eq!(format(&Some(3)), "3");
        assert_eq!(format(&None::<i32>), "None");
        assert_eq!(format("\x1b[31mred"), r#""\033[31mred""#);
    }

    #[test]
    fn plain_strings_drop_only_the_outer_quotes() {
        assert_eq!(format_plain("hello"), "hello");
        assert_eq!(format_plain(&String::from("\x1b[0m")), r"\033[0m");
        assert_eq!(format_plain(&Some("x")), "x");
        assert_eq!(format_plain(&42), "42");
        assert_eq!(format_plain(&vec!["a", "b"]), r#"[ "a", "b" ]"#);
        assert_eq!(format_plain(&("a", 1)), r#"[ "a", 1 ]"#);
    }
}
