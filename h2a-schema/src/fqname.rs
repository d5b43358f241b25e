//! Qualified, versioned names of old-IDL types.
//!
//! A qualified name has the form `package@major.minor::Outer.Inner`. The
//! package-only form `package@major.minor` names a whole package version.

use crate::error::ParseError;
use std::fmt;

/// Package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl Version {
    /// Creates a new version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses `major.minor`.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidName` if the text is not two dotted integers.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| ParseError::invalid_name(s, "version must be major.minor"))?;
        let major = major
            .parse()
            .map_err(|_| ParseError::invalid_name(s, "major version is not a number"))?;
        let minor = minor
            .parse()
            .map_err(|_| ParseError::invalid_name(s, "minor version is not a number"))?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Fully qualified, versioned name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    package: String,
    version: Version,
    names: Vec<String>,
}

impl QualifiedName {
    /// Creates a qualified name from its parts.
    #[must_use]
    pub fn new(package: impl Into<String>, version: Version, names: Vec<String>) -> Self {
        Self {
            package: package.into(),
            version,
            names,
        }
    }

    /// Parses `package@major.minor` or `package@major.minor::A.B`.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidName` on malformed input.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let (package_and_version, names) = match s.split_once("::") {
            Some((pv, names)) => (pv, Some(names)),
            None => (s, None),
        };
        let (package, version) = package_and_version
            .split_once('@')
            .ok_or_else(|| ParseError::invalid_name(s, "missing '@version'"))?;
        if package.is_empty() || package.split('.').any(str::is_empty) {
            return Err(ParseError::invalid_name(s, "empty package component"));
        }
        let version = Version::parse(version)?;

        let names = match names {
            Some(names) => {
                let parts: Vec<String> = names.split('.').map(str::to_string).collect();
                if parts.iter().any(String::is_empty) {
                    return Err(ParseError::invalid_name(s, "empty type name component"));
                }
                parts
            }
            None => Vec::new(),
        };

        Ok(Self::new(package, version, names))
    }

    /// Package string, e.g. `android.hardware.foo`.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Package version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Scope names from outermost to the type itself.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dotted unversioned name, e.g. `IBar.Baz`.
    #[must_use]
    pub fn name(&self) -> String {
        self.names.join(".")
    }

    /// The innermost name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns true if this names a type rather than a whole package.
    #[must_use]
    pub fn is_fully_qualified(&self) -> bool {
        !self.names.is_empty()
    }

    /// Version as `major.minor`.
    #[must_use]
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    /// Version namespace as used by the generated old-IDL bindings, e.g. `V1_0`.
    #[must_use]
    pub fn version_namespace(&self) -> String {
        format!("V{}_{}", self.version.major, self.version.minor)
    }

    /// Same package and version with no type names.
    #[must_use]
    pub fn package_and_version(&self) -> Self {
        Self::new(self.package.clone(), self.version, Vec::new())
    }

    /// Name of a type nested directly inside this one.
    #[must_use]
    pub fn nested(&self, name: impl Into<String>) -> Self {
        let mut names = self.names.clone();
        names.push(name.into());
        Self::new(self.package.clone(), self.version, names)
    }

    /// Same name at a different version.
    #[must_use]
    pub fn with_version(&self, version: Version) -> Self {
        Self::new(self.package.clone(), version, self.names.clone())
    }

    /// Fully qualified native binding name, e.g. `::android::foo::V1_0::IBar::Baz`.
    #[must_use]
    pub fn cpp_name(&self) -> String {
        let mut out = String::new();
        for segment in self.package.split('.') {
            out.push_str("::");
            out.push_str(segment);
        }
        out.push_str("::");
        out.push_str(&self.version_namespace());
        for name in &self.names {
            out.push_str("::");
            out.push_str(name);
        }
        out
    }

    /// Fully qualified managed binding name, e.g. `android.foo.V1_0.IBar.Baz`.
    #[must_use]
    pub fn java_name(&self) -> String {
        let mut out = format!("{}.{}", self.package, self.version_namespace());
        for name in &self.names {
            out.push('.');
            out.push_str(name);
        }
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package, self.version)?;
        if !self.names.is_empty() {
            write!(f, "::{}", self.names.join("."))?;
        }
        Ok(())
    }
}

/// Upper-cases the first character of `s`.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
