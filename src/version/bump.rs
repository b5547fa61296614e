//! Patch bump calculation.

use semver::Version;

use crate::error::VersionError;

/// Return a version identical to `version` with the patch component
/// incremented by one.
///
/// Pure transformation; persisting the result is the caller's concern.
/// Overflow of the patch counter is an explicit error, never a wrap.
pub fn bump_patch(version: &Version) -> Result<Version, VersionError> {
    let patch = version
        .patch
        .checked_add(1)
        .ok_or_else(|| VersionError::PatchOverflow(version.clone()))?;

    Ok(Version::new(version.major, version.minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_bump() {
        let next = bump_patch(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(next, Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_from_zero() {
        let next = bump_patch(&Version::new(0, 0, 0)).unwrap();
        assert_eq!(next, Version::new(0, 0, 1));
    }

    #[test]
    fn test_no_carry_into_minor() {
        let next = bump_patch(&Version::new(1, 2, 9)).unwrap();
        assert_eq!(next, Version::new(1, 2, 10));
    }

    #[test]
    fn test_bumping_twice_advances_twice() {
        let once = bump_patch(&Version::new(1, 0, 0)).unwrap();
        let twice = bump_patch(&once).unwrap();
        assert_eq!(twice, Version::new(1, 0, 2));
    }

    #[test]
    fn test_major_and_minor_untouched() {
        let next = bump_patch(&Version::new(7, 11, 0)).unwrap();
        assert_eq!(next.major, 7);
        assert_eq!(next.minor, 11);
    }

    #[test]
    fn test_overflow_fails() {
        let version = Version::new(1, 0, u64::MAX);
        assert!(matches!(
            bump_patch(&version),
            Err(VersionError::PatchOverflow(_))
        ));
    }
}
