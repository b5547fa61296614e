//! Strict parsing of manifest version strings.
//!
//! Home Assistant manifests carry plain `major.minor.patch` versions. Anything
//! looser (pre-release tags, build metadata, missing or extra components,
//! leading zeros) is rejected outright rather than coerced, so a malformed
//! manifest can never produce a silently wrong release.

use semver::Version;

use crate::error::VersionError;

/// Parse a version string of the form `"<major>.<minor>.<patch>"`.
///
/// Each component must be a plain non-negative base-10 integer with no
/// leading zeros beyond a literal `0`. Pre-release and build metadata are
/// rejected. For any accepted input `s`, `parse_version(s)?.to_string() == s`.
pub fn parse_version(raw: &str) -> Result<Version, VersionError> {
    let version = Version::parse(raw).map_err(|e| VersionError::ParseFailed {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(VersionError::NotPlainRelease(raw.to_string()));
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_version() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_zero_version() {
        let v = parse_version("0.0.0").unwrap();
        assert_eq!(v, Version::new(0, 0, 0));
    }

    #[test]
    fn test_round_trip() {
        for raw in ["0.0.0", "1.2.3", "10.20.30", "2024.1.0"] {
            let v = parse_version(raw).unwrap();
            assert_eq!(v.to_string(), raw);
        }
    }

    #[test]
    fn test_missing_component_fails() {
        assert!(matches!(
            parse_version("1.2"),
            Err(VersionError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_non_numeric_component_fails() {
        assert!(matches!(
            parse_version("1.2.x"),
            Err(VersionError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_extra_component_fails() {
        assert!(parse_version("1.2.3.4").is_err());
    }

    #[test]
    fn test_leading_zero_fails() {
        assert!(parse_version("1.02.3").is_err());
    }

    #[test]
    fn test_pre_release_rejected() {
        assert!(matches!(
            parse_version("1.2.3-beta.1"),
            Err(VersionError::NotPlainRelease(_))
        ));
    }

    #[test]
    fn test_build_metadata_rejected() {
        assert!(matches!(
            parse_version("1.2.3+build.5"),
            Err(VersionError::NotPlainRelease(_))
        ));
    }

    #[test]
    fn test_whitespace_rejected() {
        assert!(parse_version(" 1.2.3").is_err());
        assert!(parse_version("1.2.3 ").is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(parse_version("").is_err());
    }
}
