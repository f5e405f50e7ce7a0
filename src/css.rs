// Rewriting of numeric length declarations inside inline `style` strings.
//
// A declaration is matched as `<property>\s*:\s*<number><unit>?` and only
// when the property name starts the declaration, so `scroll-margin-left`
// is never mistaken for `margin-left`. Everything else in the style string
// is passed through byte for byte.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

const UNITS: &str = "px|em|rem|%|pt|vh|vw|cm|mm|in|pc|ex|ch";

/// A parsed length: magnitude plus the unit token exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthValue<'a> {
    pub value: f64,
    pub unit: &'a str,
}

impl LengthValue<'_> {
    /// Render the magnitude without a trailing `.0` for whole numbers.
    pub fn render(&self) -> String {
        let v = if self.value == 0.0 { 0.0 } else { self.value };
        format!("{v}{}", self.unit)
    }
}

static MARGIN_LEFT: LazyLock<Regex> = LazyLock::new(|| length_pattern("margin-left"));
static TEXT_INDENT: LazyLock<Regex> = LazyLock::new(|| length_pattern("text-indent"));

fn length_pattern(property: &str) -> Regex {
    Regex::new(&format!(
        r"(?P<lead>^|;)(?P<ws>\s*){}\s*:\s*(?P<num>-?\d+(?:\.\d+)?)(?P<unit>{UNITS})?",
        regex::escape(property)
    ))
    .unwrap()
}

/// One property-specific rewrite rule.
pub struct LengthRule {
    property: &'static str,
    pattern: &'static Regex,
    transform: fn(f64) -> Option<f64>,
}

impl LengthRule {
    /// `margin-left` values are halved, whatever their sign.
    pub fn margin_left() -> Self {
        LengthRule {
            property: "margin-left",
            pattern: &MARGIN_LEFT,
            transform: |v| Some(v / 2.0),
        }
    }

    /// Negative `text-indent` values are doubled; others are kept.
    pub fn text_indent() -> Self {
        LengthRule {
            property: "text-indent",
            pattern: &TEXT_INDENT,
            transform: |v| (v < 0.0).then_some(v * 2.0),
        }
    }

    pub fn property(&self) -> &str {
        self.property
    }

    /// Apply the rule to every matching declaration in `style`.
    /// Returns `Cow::Borrowed` when nothing changed.
    pub fn rewrite<'s>(&self, style: &'s str) -> Cow<'s, str> {
        let out = self.pattern.replace_all(style, |caps: &Captures| {
            let original = &caps[0];
            let Ok(value) = caps["num"].parse::<f64>() else {
                return original.to_string();
            };
            match (self.transform)(value) {
                Some(new) => {
                    let length = LengthValue {
                        value: new,
                        unit: caps.name("unit").map_or("", |m| m.as_str()),
                    };
                    format!(
                        "{}{}{}: {}",
                        &caps["lead"],
                        &caps["ws"],
                        self.property,
                        length.render()
                    )
                }
                None => original.to_string(),
            }
        });
        match out {
            Cow::Owned(s) if s == style => Cow::Borrowed(style),
            other => other,
        }
    }
}
