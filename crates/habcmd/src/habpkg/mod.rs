//! Package references understood by the `hab` tool.
//!
//! A [`VersionedPackage`] addresses an installed artifact or a loaded
//! service by origin, name, and optionally version and release. An
//! [`Installable`] additionally knows where it can be installed from: a
//! depot coordinate ([`HabPkg`]) or a local `.hart` file ([`Hartifact`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PackageParseError;

/// A package identity that addresses an installed artifact or a service.
pub trait VersionedPackage {
    /// Package origin, for example `core`.
    fn origin(&self) -> &str;
    /// Package name, for example `redis`.
    fn name(&self) -> &str;
    /// Package version, when known.
    fn version(&self) -> Option<&str>;
    /// Package release timestamp, when known.
    fn release(&self) -> Option<&str>;
}

/// A package identity that can be handed to `hab pkg install`.
pub trait Installable: VersionedPackage {
    /// The install source: a depot identifier or a hartifact path.
    fn install_ident(&self) -> String;
}

/// Formats `origin/name[/version[/release]]`.
///
/// The release is only emitted when a version is present.
///
/// ```
/// use habcmd::habpkg::{HabPkg, ident};
///
/// let pkg = HabPkg::fully_qualified("core", "redis", "4.0.14", "20190319155852");
/// assert_eq!(ident(&pkg), "core/redis/4.0.14/20190319155852");
/// ```
#[must_use]
pub fn ident<P: VersionedPackage + ?Sized>(pkg: &P) -> String {
    let mut ident = short_ident(pkg);
    if let Some(version) = pkg.version() {
        ident.push('/');
        ident.push_str(version);
        if let Some(release) = pkg.release() {
            ident.push('/');
            ident.push_str(release);
        }
    }
    ident
}

/// Formats `origin/name`, dropping any version and release.
#[must_use]
pub fn short_ident<P: VersionedPackage + ?Sized>(pkg: &P) -> String {
    format!("{}/{}", pkg.origin(), pkg.name())
}

/// A package coordinate in the depot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HabPkg {
    origin: String,
    name: String,
    version: Option<String>,
    release: Option<String>,
}

impl HabPkg {
    /// Creates an unversioned `origin/name` reference.
    #[must_use]
    pub fn new(origin: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            name: name.into(),
            version: None,
            release: None,
        }
    }

    /// Creates an `origin/name/version` reference.
    #[must_use]
    pub fn with_version(
        origin: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::new(origin, name)
        }
    }

    /// Creates a fully-qualified `origin/name/version/release` reference.
    #[must_use]
    pub fn fully_qualified(
        origin: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            release: Some(release.into()),
            ..Self::with_version(origin, name, version)
        }
    }

    /// Returns true when both version and release are known.
    #[must_use]
    pub const fn is_fully_qualified(&self) -> bool {
        self.version.is_some() && self.release.is_some()
    }
}

impl VersionedPackage for HabPkg {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }
}

impl Installable for HabPkg {
    fn install_ident(&self) -> String {
        ident(self)
    }
}

impl fmt::Display for HabPkg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ident(self))
    }
}

impl FromStr for HabPkg {
    type Err = PackageParseError;

    /// Parses `origin/name[/version[/release]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(PackageParseError::EmptySegment { ident: s.to_owned() });
        }
        match segments.as_slice() {
            [origin, name] => Ok(Self::new(*origin, *name)),
            [origin, name, version] => Ok(Self::with_version(*origin, *name, *version)),
            [origin, name, version, release] => {
                Ok(Self::fully_qualified(*origin, *name, *version, *release))
            }
            _ => Err(PackageParseError::SegmentCount { ident: s.to_owned() }),
        }
    }
}

/// A locally built `.hart` file and the package it contains.
///
/// Installing a hartifact passes its path to `hab pkg install`; every other
/// operation addresses the contained package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hartifact {
    path: PathBuf,
    pkg: HabPkg,
}

impl Hartifact {
    /// Creates a hartifact reference for `pkg` stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, pkg: HabPkg) -> Self {
        Self {
            path: path.into(),
            pkg,
        }
    }

    /// Location of the `.hart` file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Package contained in the file.
    #[must_use]
    pub const fn package(&self) -> &HabPkg {
        &self.pkg
    }
}

impl VersionedPackage for Hartifact {
    fn origin(&self) -> &str {
        self.pkg.origin()
    }

    fn name(&self) -> &str {
        self.pkg.name()
    }

    fn version(&self) -> Option<&str> {
        self.pkg.version()
    }

    fn release(&self) -> Option<&str> {
        self.pkg.release()
    }
}

impl Installable for Hartifact {
    fn install_ident(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
