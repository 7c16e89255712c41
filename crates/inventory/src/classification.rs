//! Classification codes: the family key shared by related parts.
//!
//! A code is derived from an item code in two steps:
//!
//! 1. **Digit prefix** (always applied first): an item code that begins with a
//!    run of exactly four ASCII digits uses that run (`0215-21-13001` ⇒ `0215`).
//! 2. **Hyphen segment** (fallback, see [`ClassificationRule`]): otherwise, if
//!    the code contains a hyphen, the first four characters of its first
//!    hyphen-delimited segment (`AB12X-7` ⇒ `AB12`).
//!
//! Both steps agree on the common case of four digits before the first hyphen.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use partmatch_core::{DomainError, ValueObject};

const CODE_WIDTH: usize = 4;

/// Short family key. Two items are related iff their codes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassificationCode(String);

impl ValueObject for ClassificationCode {}

impl ClassificationCode {
    /// Build a code from an explicit, caller-supplied value.
    pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::malformed("classification cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClassificationCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassificationCode> for String {
    fn from(value: ClassificationCode) -> Self {
        value.0
    }
}

/// Which derivation steps are active.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationRule {
    /// Only the four-digit prefix; everything else is unresolved.
    DigitPrefixOnly,
    /// Four-digit prefix, then the hyphen-segment fallback.
    #[default]
    DigitPrefixThenHyphenSegment,
}

impl ClassificationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DigitPrefixOnly => "digit_prefix_only",
            Self::DigitPrefixThenHyphenSegment => "digit_prefix_then_hyphen_segment",
        }
    }
}

impl FromStr for ClassificationRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "digit_prefix_only" => Ok(Self::DigitPrefixOnly),
            "digit_prefix_then_hyphen_segment" => Ok(Self::DigitPrefixThenHyphenSegment),
            other => Err(DomainError::malformed(format!(
                "unknown classification rule {other:?} (expected digit_prefix_only or digit_prefix_then_hyphen_segment)"
            ))),
        }
    }
}

/// Derives classification codes under a fixed [`ClassificationRule`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResolver {
    rule: ClassificationRule,
}

impl ClassificationResolver {
    pub fn new(rule: ClassificationRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> ClassificationRule {
        self.rule
    }

    /// Derive the code for `identifier`. Never fails: unresolvable input is `None`.
    pub fn classify(&self, identifier: &str) -> Option<ClassificationCode> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if let Some(code) = digit_prefix(identifier) {
            return Some(code);
        }

        match self.rule {
            ClassificationRule::DigitPrefixOnly => None,
            ClassificationRule::DigitPrefixThenHyphenSegment => hyphen_segment(identifier),
        }
    }
}

/// Classify with the default rule (digit prefix, then hyphen segment).
pub fn classify(identifier: &str) -> Option<ClassificationCode> {
    ClassificationResolver::default().classify(identifier)
}

fn digit_prefix(identifier: &str) -> Option<ClassificationCode> {
    let run = identifier.chars().take_while(|c| c.is_ascii_digit()).count();
    if run != CODE_WIDTH {
        return None;
    }
    Some(ClassificationCode(identifier[..CODE_WIDTH].to_string()))
}

fn hyphen_segment(identifier: &str) -> Option<ClassificationCode> {
    if !identifier.contains('-') {
        return None;
    }
    let segment = identifier.split('-').next()?.trim();
    if segment.is_empty() {
        return None;
    }
    Some(ClassificationCode(segment.chars().take(CODE_WIDTH).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(identifier: &str) -> Option<String> {
        classify(identifier).map(String::from)
    }

    #[test]
    fn digit_prefix_is_primary() {
        assert_eq!(code("0215-21-13001").as_deref(), Some("0215"));
        assert_eq!(code("0215A").as_deref(), Some("0215"));
        assert_eq!(code("1234").as_deref(), Some("1234"));
    }

    #[test]
    fn empty_identifier_is_unresolved() {
        assert_eq!(code(""), None);
        assert_eq!(code("   "), None);
    }

    #[test]
    fn hyphen_segment_fallback() {
        assert_eq!(code("AB12X-7").as_deref(), Some("AB12"));
        assert_eq!(code("02151-3").as_deref(), Some("0215"));
        assert_eq!(code("K9-100").as_deref(), Some("K9"));
        assert_eq!(code("-100"), None);
    }

    #[test]
    fn no_fallback_without_hyphen() {
        assert_eq!(code("ABCDEF"), None);
        assert_eq!(code("02151"), None);
    }

    #[test]
    fn digit_prefix_only_rule_disables_fallback() {
        let strict = ClassificationResolver::new(ClassificationRule::DigitPrefixOnly);
        assert_eq!(strict.classify("0215-21-13001").map(String::from).as_deref(), Some("0215"));
        assert_eq!(strict.classify("AB12X-7"), None);
    }

    #[test]
    fn rule_parses_from_config_names() {
        for rule in [ClassificationRule::DigitPrefixOnly, ClassificationRule::DigitPrefixThenHyphenSegment] {
            assert_eq!(rule.as_str().parse::<ClassificationRule>().unwrap(), rule);
        }
        assert!("substring".parse::<ClassificationRule>().is_err());
    }

    #[test]
    fn explicit_code_rejects_blank() {
        assert!(ClassificationCode::new(" ").is_err());
        assert_eq!(ClassificationCode::new(" 0215 ").unwrap().as_str(), "0215");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: both rules agree on four digits before the first hyphen.
            #[test]
            fn rules_agree_on_common_case(prefix in "[0-9]{4}", rest in "[0-9A-Z-]{0,12}") {
                let identifier = format!("{prefix}-{rest}");
                let strict = ClassificationResolver::new(ClassificationRule::DigitPrefixOnly);
                let lenient = ClassificationResolver::new(ClassificationRule::DigitPrefixThenHyphenSegment);
                prop_assert_eq!(strict.classify(&identifier), lenient.classify(&identifier));
                prop_assert_eq!(lenient.classify(&identifier).map(String::from), Some(prefix));
            }

            /// Property: classification never panics and codes are at most four chars.
            #[test]
            fn codes_are_bounded(identifier in "\\PC{0,24}") {
                if let Some(code) = classify(&identifier) {
                    prop_assert!(code.as_str().chars().count() <= CODE_WIDTH);
                    prop_assert!(!code.as_str().is_empty());
                }
            }
        }
    }
}
