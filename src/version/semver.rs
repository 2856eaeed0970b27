//! Loose version parsing and ordering
//!
//! Accepts 1 to 5 numeric fields (`1`, `1.2`, `1.2.3.4.5`) with an optional
//! `v` prefix, a `-prerelease` tail and `+build` metadata. Missing trailing
//! numeric fields compare as zero.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::version::error::VersionError;

/// Maximum number of numeric fields a version may carry
pub const MAX_NUMERIC_COMPONENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    Latest,
    Outdated,
    Newer,
    Invalid,
}

/// One dot-separated prerelease identifier.
///
/// Variant order matters: numeric identifiers always rank below textual ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Identifier {
    fn new(raw: &str) -> Self {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::Text(raw.to_string())
    }
}

/// A version string broken into its comparable parts
#[derive(Debug, Clone, Eq)]
pub struct ParsedVersion {
    /// Numeric fields in the order they were written (1..=5 entries)
    pub numeric: Vec<u64>,
    /// Prerelease identifiers, empty for a release version
    pub prerelease: Vec<Identifier>,
}

impl ParsedVersion {
    /// Parse a raw version string, returning `None` for anything that does
    /// not start with a dotted run of non-negative integers.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_version(raw);
        if normalized.is_empty() {
            return None;
        }

        let without_build = normalized
            .split_once('+')
            .map_or(normalized, |(head, _)| head);
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (without_build, None),
        };

        let numeric = core
            .split('.')
            .map(|part| parse_numeric(part.trim()))
            .collect::<Option<Vec<u64>>>()?;
        if numeric.is_empty() || numeric.len() > MAX_NUMERIC_COMPONENTS {
            return None;
        }

        let prerelease = pre
            .map(|pre| {
                pre.split('.')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(Identifier::new)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            numeric,
            prerelease,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    fn compare_numeric(&self, other: &Self) -> Ordering {
        let len = self.numeric.len().max(other.numeric.len());
        (0..len)
            .map(|i| {
                let a = self.numeric.get(i).copied().unwrap_or(0);
                let b = other.numeric.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn compare_prerelease(&self, other: &Self) -> Ordering {
        match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            // Vec ordering is element-wise, and a strict prefix ranks lower
            (false, false) => self.prerelease.cmp(&other.prerelease),
        }
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_numeric(other)
            .then_with(|| self.compare_prerelease(other))
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// "1.2" and "1.2.0" are the same version
impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl FromStr for ParsedVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| VersionError::Unparseable(s.to_string()))
    }
}

fn parse_numeric(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Trim whitespace and strip a leading `v`/`V` tag prefix.
///
/// Returns an empty string for blank input.
pub fn normalize_version(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(['v', 'V']) {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    }
}

/// Compare two version strings.
///
/// Returns `None` when either side cannot be parsed.
pub fn compare(a: &str, b: &str) -> Option<Ordering> {
    let a = ParsedVersion::parse(a)?;
    let b = ParsedVersion::parse(b)?;
    Some(a.cmp(&b))
}

/// Compare an installed version to the latest published one
pub fn compare_versions(installed: &str, latest: &str) -> CompareResult {
    match compare(installed, latest) {
        Some(Ordering::Equal) => CompareResult::Latest,
        Some(Ordering::Less) => CompareResult::Outdated,
        Some(Ordering::Greater) => CompareResult::Newer,
        None => CompareResult::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn text(s: &str) -> Identifier {
        Identifier::Text(s.to_string())
    }

    #[test]
    fn parse_reads_three_numeric_fields() {
        let parsed = ParsedVersion::parse("1.2.3").unwrap();
        assert_eq!(parsed.numeric, vec![1, 2, 3]);
        assert!(parsed.prerelease.is_empty());
    }

    #[test]
    fn parse_keeps_natural_component_count() {
        let parsed = ParsedVersion::parse("v2.0").unwrap();
        assert_eq!(parsed.numeric, vec![2, 0]);
        assert!(parsed.prerelease.is_empty());
    }

    #[test]
    fn parse_splits_prerelease_identifiers() {
        let parsed = ParsedVersion::parse("1.2.3-beta.1").unwrap();
        assert_eq!(parsed.numeric, vec![1, 2, 3]);
        assert_eq!(parsed.prerelease, vec![text("beta"), Identifier::Numeric(1)]);
    }

    #[test]
    fn parse_keeps_everything_after_first_hyphen_as_prerelease() {
        let parsed = ParsedVersion::parse("1.0.0-rc-2.x").unwrap();
        assert_eq!(parsed.prerelease, vec![text("rc-2"), text("x")]);
    }

    #[test]
    fn parse_drops_build_metadata_and_empty_identifiers() {
        let parsed = ParsedVersion::parse("  V1.4.0-alpha..2+build.77 ").unwrap();
        assert_eq!(parsed.numeric, vec![1, 4, 0]);
        assert_eq!(parsed.prerelease, vec![text("alpha"), Identifier::Numeric(2)]);
    }

    #[test]
    fn parse_accepts_five_numeric_fields() {
        let parsed = ParsedVersion::parse("13.341.0.7.2").unwrap();
        assert_eq!(parsed.numeric, vec![13, 341, 0, 7, 2]);
    }

    #[rstest]
    #[case("not-a-version")]
    #[case("beta")]
    #[case("")]
    #[case("   ")]
    #[case("v")]
    #[case("1.2.3.4.5.6")]
    #[case("1..2")]
    #[case("1.2.")]
    #[case("+1.2")]
    #[case("-1.2")]
    #[case("1.5.x")]
    #[case("1.2e3")]
    #[case("99999999999999999999999.0")]
    fn parse_rejects_malformed_versions(#[case] raw: &str) {
        assert_eq!(ParsedVersion::parse(raw), None);
    }

    #[test]
    fn from_str_reports_unparseable_input() {
        let err = "nope".parse::<ParsedVersion>().unwrap_err();
        assert!(matches!(err, VersionError::Unparseable(ref s) if s == "nope"));
    }

    #[rstest]
    #[case("1.0.0", "1.0.0-alpha", Ordering::Greater)]
    #[case("1.0.0-alpha", "1.0.0-alpha.1", Ordering::Less)]
    #[case("1.0.0-alpha.beta", "1.0.0-alpha.1", Ordering::Greater)]
    #[case("1.0.0-alpha.1", "1.0.0-alpha.2", Ordering::Less)]
    #[case("1.0.0-alpha.10", "1.0.0-alpha.9", Ordering::Greater)]
    #[case("1.0.0-beta", "1.0.0-alpha", Ordering::Greater)]
    #[case("1.0.0-rc.1", "1.0.0", Ordering::Less)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1", "1.0.0.0.0", Ordering::Equal)]
    #[case("1.2.3.1", "1.2.3", Ordering::Greater)]
    #[case("1.2.3", "1.2.3.0.1", Ordering::Less)]
    #[case("v1.10.0", "1.9.9", Ordering::Greater)]
    #[case("2.0.0", "10.0.0", Ordering::Less)]
    #[case("1.0.0+build.1", "1.0.0+build.2", Ordering::Equal)]
    fn compare_orders_versions(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare(a, b), Some(expected));
        assert_eq!(compare(b, a), Some(expected.reverse()));
    }

    #[rstest]
    #[case("abc", "1.0.0")]
    #[case("1.0.0", "latest")]
    #[case("", "")]
    fn compare_is_none_when_either_side_is_unparseable(#[case] a: &str, #[case] b: &str) {
        assert_eq!(compare(a, b), None);
    }

    #[test]
    fn compare_is_a_consistent_total_order_over_samples() {
        let samples = [
            "0.9",
            "1.0.0-1",
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.0.1",
            "1.0.1",
            "1.1",
            "2.0.0.0.1",
        ];

        for a in samples {
            assert_eq!(compare(a, a), Some(Ordering::Equal), "reflexive for {a}");
            for b in samples {
                let ab = compare(a, b).unwrap();
                assert_eq!(compare(b, a).unwrap(), ab.reverse(), "antisymmetric {a} {b}");
                for c in samples {
                    let bc = compare(b, c).unwrap();
                    if ab != Ordering::Greater && bc != Ordering::Greater {
                        assert_ne!(
                            compare(a, c).unwrap(),
                            Ordering::Greater,
                            "transitive {a} <= {b} <= {c}"
                        );
                    }
                }
            }
        }

        // samples are listed in ascending order
        for pair in samples.windows(2) {
            assert_eq!(compare(pair[0], pair[1]), Some(Ordering::Less), "{pair:?}");
        }
    }

    #[rstest]
    #[case("1.0.0", "1.1.0", CompareResult::Outdated)]
    #[case("2.0.0", "1.0.0", CompareResult::Newer)]
    #[case("v1.0", "1.0.0", CompareResult::Latest)]
    #[case("dev", "1.0.0", CompareResult::Invalid)]
    fn compare_versions_maps_ordering(
        #[case] installed: &str,
        #[case] latest: &str,
        #[case] expected: CompareResult,
    ) {
        assert_eq!(compare_versions(installed, latest), expected);
    }

    #[rstest]
    #[case(" v1.2.3 ", "1.2.3")]
    #[case("V 2.0", "2.0")]
    #[case("1.0", "1.0")]
    #[case("  ", "")]
    #[case("version", "ersion")]
    fn normalize_version_strips_whitespace_and_tag_prefix(
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(normalize_version(raw), expected);
    }
}
