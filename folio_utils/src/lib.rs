pub use folio_utils_derive::trace_instrument;

pub trait Apply {
    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use folio_utils::Apply;
    /// fn add_option(a: i32, b: Option<i32>) -> i32 {
    ///     a.apply_map(b, |slf, arg| slf + arg)
    /// }
    /// assert_eq!(add_option(1, None), 1);
    /// assert_eq!(add_option(1, Some(2)), 3);
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self
    where
        Self: Sized,
    {
        if let Some(value) = value {
            f(self, value)
        } else {
            self
        }
    }
}

impl<T> Apply for T {}

/// Returns the version string of this build.
pub fn folio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat) => {
        match ($expr) {
            $pat => (),
            val => ::core::panic!(
                "Assertion failed: Value {val:?} did not match pattern {}",
                ::core::stringify!($pat)
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_map() {
        let port = |port: Option<u16>| 25u16.apply_map(port, |_, port| port);
        assert_eq!(port(None), 25);
        assert_eq!(port(Some(465)), 465);
    }

    #[test]
    fn assert_matches_accepts_matching_value() {
        assert_matches!(Some(42), Some(_));
    }

    #[test]
    #[should_panic(expected = "did not match pattern")]
    fn assert_matches_rejects_other_value() {
        assert_matches!(None::<i32>, Some(_));
    }
}
