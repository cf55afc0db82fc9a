//! Invariant text conversions for primitive field types.

use rust_decimal::Decimal;
use std::str::FromStr;

/// A primitive that is persisted as the text content of a single element.
pub trait XmlText: Sized {
    /// Human-readable name of the expected format, used in error messages.
    const EXPECTED: &'static str;

    /// Parse element text. Returns `None` when the text is not a valid value.
    fn parse_text(text: &str) -> Option<Self>;

    /// Render the value as element text.
    fn to_text(&self) -> String;
}

impl XmlText for String {
    const EXPECTED: &'static str = "string";

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_text {
    ($($ty:ty => $expected:literal),* $(,)?) => {
        $(
            impl XmlText for $ty {
                const EXPECTED: &'static str = $expected;

                fn parse_text(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_text!(
    i32 => "integer",
    i64 => "integer",
    u8 => "non-negative integer",
    u16 => "non-negative integer",
    u32 => "non-negative integer",
);

impl XmlText for f64 {
    const EXPECTED: &'static str = "number";

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim() {
            "INF" => Some(f64::INFINITY),
            "-INF" => Some(f64::NEG_INFINITY),
            other => other.parse().ok(),
        }
    }

    fn to_text(&self) -> String {
        if self.is_infinite() {
            let text = if *self > 0.0 { "INF" } else { "-INF" };
            return text.to_string();
        }
        // `Display` for f64 is culture-free and gives the shortest text that round-trips.
        self.to_string()
    }
}

impl XmlText for bool {
    const EXPECTED: &'static str = "boolean";

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

impl XmlText for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn parse_text(text: &str) -> Option<Self> {
        Decimal::from_str(text.trim()).ok()
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}
