//! Size notation extraction.
//!
//! Turns a free-text item name into the set of nominal sizes it mentions,
//! normalised to integer millimetres. Recognised notations:
//!
//! - explicit metric: `13mm`, `13 MM`, `12.7mm`, `13φ`, `φ13`
//! - nominal bore: `25A` (the number already is the nominal millimetre size),
//!   only when not glued to other ASCII letters or digits
//! - fractional inch as a whole token, parenthesized (`(1/2)`, `（1 1/4）`) or
//!   whitespace-delimited (`VALVE 3/4 BRASS`)
//!
//! Anything else yields nothing. An empty [`SizeSet`] therefore means both
//! "no size notation" and "unparsable notation"; the matcher treats such items
//! as size-agnostic common parts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use partmatch_core::ValueObject;

/// Inch nominal sizes and their millimetre nominal equivalents.
const INCH_TO_MM: &[(&str, u32)] = &[
    ("3/8", 10),
    ("1/2", 13),
    ("5/8", 16),
    ("3/4", 20),
    ("1", 25),
    ("1 1/4", 32),
    ("1 1/2", 40),
    ("2", 50),
];

static METRIC_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:mm|ｍｍ|φ|ø|⌀)").expect("metric suffix pattern is valid")
});

static DIAMETER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:φ|ø|⌀)\s*(\d+(?:\.\d+)?)").expect("diameter prefix pattern is valid")
});

static NOMINAL_BORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)A").expect("nominal bore pattern is valid"));

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[(（]([^()（）]*)[)）]").expect("parenthesized token pattern is valid")
});

/// Canonical set of nominal sizes in millimetres.
///
/// Ordered ascending; duplicates collapse. The empty set is meaningful: the
/// item carries no (recognisable) size notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeSet(BTreeSet<u32>);

impl ValueObject for SizeSet {}

impl SizeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, millimetres: u32) {
        self.0.insert(millimetres);
    }

    pub fn contains(&self, millimetres: u32) -> bool {
        self.0.contains(&millimetres)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when both sets share at least one size.
    ///
    /// An empty set never intersects anything, including another empty set.
    pub fn intersects(&self, other: &SizeSet) -> bool {
        self.0.iter().any(|size| other.0.contains(size))
    }

    /// Sizes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl FromIterator<u32> for SizeSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Canonical rendering: `13mm 20mm`. Extracting from it yields the same set.
impl core::fmt::Display for SizeSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for size in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{size}mm")?;
            first = false;
        }
        Ok(())
    }
}

/// Extract every recognised size notation from `text`.
pub fn extract_sizes(text: &str) -> SizeSet {
    let mut sizes = SizeSet::new();

    for re in [&*METRIC_SUFFIX, &*DIAMETER_PREFIX] {
        for caps in re.captures_iter(text) {
            if let Some(mm) = caps.get(1).and_then(|m| parse_millimetres(m.as_str())) {
                sizes.insert(mm);
            }
        }
    }

    for m in NOMINAL_BORE.find_iter(text) {
        if !is_token_boundary(&text[..m.start()], &text[m.end()..]) {
            continue;
        }
        // strip the trailing `A`
        let number = &m.as_str()[..m.as_str().len() - 1];
        if let Some(mm) = parse_millimetres(number) {
            sizes.insert(mm);
        }
    }

    for caps in PARENTHESIZED.captures_iter(text) {
        if let Some(inner) = caps.get(1) {
            let normalized = inner.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            if let Some(mm) = inch_to_mm(&normalized) {
                sizes.insert(mm);
            }
        }
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut i = 0;
    while i < tokens.len() {
        // `1 1/4` and `1 1/2` are single sizes, not 25mm plus a fraction.
        if tokens[i] == "1" {
            if let Some(mm) = tokens
                .get(i + 1)
                .and_then(|next| inch_to_mm(&format!("1 {next}")))
            {
                sizes.insert(mm);
                i += 2;
                continue;
            }
        }
        if let Some(mm) = inch_to_mm(tokens[i]) {
            sizes.insert(mm);
        }
        i += 1;
    }

    sizes
}

/// True when the name carries at least one recognised size notation.
pub fn has_size_notation(text: &str) -> bool {
    !extract_sizes(text).is_empty()
}

fn inch_to_mm(token: &str) -> Option<u32> {
    INCH_TO_MM
        .iter()
        .find(|(inch, _)| *inch == token)
        .map(|(_, mm)| *mm)
}

/// Parse a decimal millimetre value and round it to the nearest integer.
fn parse_millimetres(raw: &str) -> Option<u32> {
    let rounded = raw.parse::<f64>().ok()?.round();
    if !(1.0..=f64::from(u32::MAX)).contains(&rounded) {
        return None;
    }
    Some(rounded as u32)
}

/// The `A` suffix only counts when the match is not part of a longer ASCII
/// alphanumeric token (`X25A` and `25AB` are rejected).
fn is_token_boundary(before: &str, after: &str) -> bool {
    let prev_ok = before
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_ascii_alphanumeric());
    let next_ok = after
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric());
    prev_ok && next_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(text: &str) -> Vec<u32> {
        extract_sizes(text).to_vec()
    }

    #[test]
    fn metric_notation_is_case_insensitive() {
        assert_eq!(sizes("13mm valve"), vec![13]);
        assert_eq!(sizes("VALVE 20MM"), vec![20]);
        assert_eq!(sizes("pipe 25 mm"), vec![25]);
    }

    #[test]
    fn decimal_millimetres_round_to_nearest() {
        assert_eq!(sizes("shaft 12.7mm"), vec![13]);
    }

    #[test]
    fn diameter_symbol_before_or_after_number() {
        assert_eq!(sizes("ホース φ16"), vec![16]);
        assert_eq!(sizes("ホース 16φ"), vec![16]);
        assert_eq!(sizes("φ13mm"), vec![13]);
    }

    #[test]
    fn nominal_bore_suffix() {
        assert_eq!(sizes("ボールバルブ 25A"), vec![25]);
        assert_eq!(sizes("elbow(32A)"), vec![32]);
        assert_eq!(sizes("バルブ25A"), vec![25]);
    }

    #[test]
    fn nominal_bore_rejects_longer_tokens() {
        assert!(sizes("MODEL X25A").is_empty());
        assert!(sizes("25AB gasket").is_empty());
        assert!(sizes("SERIAL 125A7").is_empty());
    }

    #[test]
    fn nominal_bore_after_a_dotted_label() {
        assert_eq!(sizes("継手 No.25A"), vec![25]);
        assert_eq!(sizes("フランジ 1.5A"), vec![2]);
    }

    #[test]
    fn parenthesized_inch_fractions() {
        assert_eq!(sizes("ニップル(1/2)"), vec![13]);
        assert_eq!(sizes("socket （3/4）"), vec![20]);
        assert_eq!(sizes("union (1 1/4)"), vec![32]);
        assert_eq!(sizes("union ( 1  1/2 )"), vec![40]);
    }

    #[test]
    fn whitespace_delimited_inch_fractions() {
        assert_eq!(sizes("valve 3/8 brass"), vec![10]);
        assert_eq!(sizes("5/8 hose"), vec![16]);
        assert_eq!(sizes("tee 1 1/2"), vec![40]);
        assert_eq!(sizes("flange 2"), vec![50]);
        assert_eq!(sizes("coupling 1"), vec![25]);
    }

    #[test]
    fn fractions_inside_longer_numbers_are_ignored() {
        assert!(sizes("part 11/2").is_empty());
        assert!(sizes("rev 2021/1/25").is_empty());
        assert!(sizes("code1/2x").is_empty());
        assert!(sizes("no-size gasket 10").is_empty());
    }

    #[test]
    fn multiple_notations_collapse_and_sort() {
        assert_eq!(sizes("reducer 25A x 20mm (3/4)"), vec![20, 25]);
        assert_eq!(sizes("20mm 13mm 20MM"), vec![13, 20]);
    }

    #[test]
    fn no_notation_is_empty() {
        assert!(extract_sizes("パッキン").is_empty());
        assert!(extract_sizes("").is_empty());
        assert!(!has_size_notation("O-ring set"));
        assert!(has_size_notation("O-ring 13mm"));
    }

    #[test]
    fn canonical_rendering() {
        let set: SizeSet = [20, 13].into_iter().collect();
        assert_eq!(set.to_string(), "13mm 20mm");
        assert_eq!(SizeSet::new().to_string(), "");
    }

    #[test]
    fn intersection_semantics() {
        let a: SizeSet = [13, 20].into_iter().collect();
        let b: SizeSet = [20].into_iter().collect();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&SizeSet::new()));
        assert!(!SizeSet::new().intersects(&SizeSet::new()));
    }

    #[test]
    fn serializes_as_sorted_list() {
        let set: SizeSet = [40, 13].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[13,40]");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const SEPARATORS: &[&str] = &[" ", "(", ")", "-", "/", "・", "　"];

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: `25A` bounded by non-alphanumeric context is always found.
            #[test]
            fn nominal_bore_found_between_boundaries(
                prefix in "[a-z ]{0,8}",
                left in prop::sample::select(SEPARATORS),
                right in prop::sample::select(SEPARATORS),
                suffix in "[a-z ]{0,8}",
            ) {
                let text = format!("{prefix}{left}25A{right}{suffix}");
                prop_assert!(extract_sizes(&text).contains(25), "missing 25 in {text:?}");
            }

            /// Property: a whitespace-bounded or parenthesized `1/2` maps to 13.
            #[test]
            fn half_inch_token_maps_to_13(
                prefix in "[a-z]{1,8}",
                suffix in "[a-z]{0,8}",
                parenthesized in any::<bool>(),
            ) {
                let text = if parenthesized {
                    format!("{prefix}(1/2){suffix}")
                } else {
                    format!("{prefix} 1/2 {suffix}")
                };
                prop_assert!(extract_sizes(&text).contains(13), "missing 13 in {text:?}");
            }

            /// Property: extraction is idempotent over its canonical rendering.
            #[test]
            fn extraction_is_idempotent(name in "[a-zA-Z0-9 ()/.AmMφ]{0,40}") {
                let first = extract_sizes(&name);
                let second = extract_sizes(&first.to_string());
                prop_assert_eq!(first, second);
            }

            /// Property: output is the same regardless of notation order.
            #[test]
            fn notation_order_does_not_matter(a in 1u32..500, b in 1u32..500) {
                let forward = extract_sizes(&format!("{a}mm {b}A"));
                let backward = extract_sizes(&format!("{b}A {a}mm"));
                prop_assert_eq!(forward, backward);
            }
        }
    }
}
