//! Compiler version numbers.

use std::fmt;
use std::str::FromStr;

use crate::error::ToolchainError;

/// A `major.minor.patch[-modifier]` compiler version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionNumber {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
    /// Pre-release or build suffix after the first `-` (e.g. "RC1").
    pub modifier: Option<String>,
}

impl VersionNumber {
    /// Returns the binary-compatibility version used in artifact names.
    ///
    /// Scala 3 and later share one binary version per major release
    /// (`3`). Scala 2 releases are binary compatible within a minor series
    /// (`2.13`), except milestones of a `.0` release, which keep their full
    /// version.
    pub fn binary_version(&self) -> String {
        if self.major >= 3 {
            return self.major.to_string();
        }
        let is_milestone = self
            .modifier
            .as_deref()
            .is_some_and(|m| m.starts_with('M'));
        if self.patch == 0 && is_milestone {
            self.to_string()
        } else {
            format!("{}.{}", self.major, self.minor)
        }
    }

    /// Returns `true` for Scala 3 and later.
    pub fn is_scala3(&self) -> bool {
        self.major >= 3
    }
}

impl FromStr for VersionNumber {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ToolchainError::InvalidVersion {
            version: s.to_string(),
        };
        let trimmed = s.trim();
        let (numbers, modifier) = match trimmed.split_once('-') {
            Some((numbers, modifier)) if !modifier.is_empty() => {
                (numbers, Some(modifier.to_string()))
            }
            Some(_) => return Err(invalid()),
            None => (trimmed, None),
        };

        let mut parts = numbers.split('.');
        let mut next = |required: bool| -> Result<u32, ToolchainError> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
            modifier,
        })
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(modifier) = &self.modifier {
            write!(f, "-{modifier}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionNumber {
        s.parse().unwrap()
    }

    #[test]
    fn parse_release() {
        let version = v("2.13.12");
        assert_eq!((version.major, version.minor, version.patch), (2, 13, 12));
        assert!(version.modifier.is_none());
        assert_eq!(version.to_string(), "2.13.12");
    }

    #[test]
    fn parse_with_modifier() {
        let version = v("2.13.0-RC1");
        assert_eq!(version.modifier.as_deref(), Some("RC1"));
        assert_eq!(version.to_string(), "2.13.0-RC1");
    }

    #[test]
    fn parse_short_forms() {
        assert_eq!(v("3").to_string(), "3.0.0");
        assert_eq!(v("2.12").to_string(), "2.12.0");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<VersionNumber>().is_err());
        assert!("two.thirteen".parse::<VersionNumber>().is_err());
        assert!("2.13.12.1".parse::<VersionNumber>().is_err());
        assert!("2.13.12-".parse::<VersionNumber>().is_err());
    }

    #[test]
    fn binary_versions() {
        assert_eq!(v("2.12.18").binary_version(), "2.12");
        assert_eq!(v("2.13.0-RC1").binary_version(), "2.13");
        assert_eq!(v("2.13.0-M5").binary_version(), "2.13.0-M5");
        assert_eq!(v("3.3.1").binary_version(), "3");
        assert!(v("3.3.1").is_scala3());
        assert!(!v("2.13.12").is_scala3());
    }
}
