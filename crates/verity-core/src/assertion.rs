//! Conversion of metadata values into assertion strings.
//!
//! Every metadata value a proposition yields has a matching assertion. Textual
//! metadata is its own assertion and doubles as the explanation; other values
//! are asserted through their display form and the proposition's statement is
//! used to explain the outcome instead.

use std::borrow::Cow;

/// A metadata value that can be stated as an assertion.
pub trait Assertable {
    /// The assertion text for this value.
    fn assertion(&self) -> String;

    /// Whether the assertion reads as an explanation on its own.
    ///
    /// Explanations are rendered verbatim as the reason of a result. Anything
    /// else falls back to the proposition statement (`is even` / `!is even`).
    fn is_explanation(&self) -> bool {
        false
    }
}

impl Assertable for String {
    fn assertion(&self) -> String {
        self.clone()
    }

    fn is_explanation(&self) -> bool {
        true
    }
}

impl Assertable for &str {
    fn assertion(&self) -> String {
        (*self).to_string()
    }

    fn is_explanation(&self) -> bool {
        true
    }
}

impl Assertable for Cow<'_, str> {
    fn assertion(&self) -> String {
        self.to_string()
    }

    fn is_explanation(&self) -> bool {
        true
    }
}

macro_rules! display_assertable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Assertable for $ty {
                fn assertion(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_assertable!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Whether a batch of metadata explains itself.
pub(crate) fn all_explanations<M: Assertable>(metadata: &[M]) -> bool {
    !metadata.is_empty() && metadata.iter().all(Assertable::is_explanation)
}
