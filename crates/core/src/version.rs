//! Ordering of dotted numeric game versions (`1.7.10`, `1.21`, ...).
//!
//! Segments compare numerically, never lexicographically, and a version that is a
//! prefix of another sorts first (`1.16 < 1.16.5`).

use pigment_api::{ApiError, ApiResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    pub fn parse(raw: &str) -> ApiResult<Self> {
        let segments = raw
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ApiError::Validation(format!(
                        "invalid version '{}': segment '{}' is not a number",
                        raw, segment
                    )));
                }
                segment.parse::<u64>().map_err(|e| {
                    ApiError::Validation(format!("invalid version '{}': {}", raw, e))
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

impl FromStr for Version {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(other.segments.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        self.segments.len().cmp(&other.segments.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

/// Compares two version strings. Malformed input is a validation error.
pub fn compare(a: &str, b: &str) -> ApiResult<Ordering> {
    Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
}

fn sort_by_version(versions: &mut [String], newest_first: bool) -> ApiResult<()> {
    let mut keyed = versions
        .iter()
        .map(|v| Ok((Version::parse(v)?, v.clone())))
        .collect::<ApiResult<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| if newest_first { b.cmp(a) } else { a.cmp(b) });
    for (slot, (_, raw)) in versions.iter_mut().zip(keyed) {
        *slot = raw;
    }
    Ok(())
}

/// Oldest first; the order of a path's `versions`.
pub fn sort_ascending(versions: &mut [String]) -> ApiResult<()> {
    sort_by_version(versions, false)
}

/// Newest first; the order of a catalog edition list.
pub fn sort_newest_first(versions: &mut [String]) -> ApiResult<()> {
    sort_by_version(versions, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(compare("1.7.9", "1.7.10").unwrap(), Ordering::Less);
        assert_eq!(compare("1.7", "1.7.10").unwrap(), Ordering::Less);
        assert_eq!(compare("1.10", "1.9").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare("1.16", "1.16.5").unwrap(), Ordering::Less);
        assert_eq!(compare("1.16.5", "1.16").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_antisymmetric_and_reflexive() {
        let samples = ["1", "1.0", "1.7", "1.7.2", "1.7.10", "1.16.5", "1.21", "21.0.1"];
        for a in samples {
            assert_eq!(compare(a, a).unwrap(), Ordering::Equal);
            for b in samples {
                assert_eq!(compare(a, b).unwrap(), compare(b, a).unwrap().reverse());
            }
        }
    }

    #[test]
    fn test_invalid_segments() {
        for bad in ["", "1..2", "1.x", "1.2-pre", ".1", "1.", "b1.0"] {
            let err = compare(bad, "1.0").unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_sorting() {
        let mut list = vec![
            "1.7.10".to_string(),
            "1.16".to_string(),
            "1.7.9".to_string(),
            "1.16.5".to_string(),
        ];
        sort_newest_first(&mut list).unwrap();
        assert_eq!(list, vec!["1.16.5", "1.16", "1.7.10", "1.7.9"]);

        sort_ascending(&mut list).unwrap();
        assert_eq!(list, vec!["1.7.9", "1.7.10", "1.16", "1.16.5"]);
    }

    #[test]
    fn test_display_roundtrip_of_leading_zero() {
        // "01" is numerically equal to "1"
        assert_eq!(compare("1.01", "1.1").unwrap(), Ordering::Equal);
        assert_eq!(Version::parse("1.01").unwrap().to_string(), "1.1");
    }
}
