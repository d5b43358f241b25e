//! Old-IDL to new-IDL name and package mapping.
//!
//! The new IDL has no versioned packages, so the major version is folded
//! into the package name:
//!
//! - `android.hardware.foo@1.x::IBar.Baz` -> `android.hardware.foo.IBarBaz`
//! - `android.hardware.foo@2.x::IBar.Baz` -> `android.hardware.foo2.IBarBaz`

use h2a_schema::{QualifiedName, capitalize};

/// Short type name: every scope name capitalized and concatenated.
#[must_use]
pub fn aidl_name(fq_name: &QualifiedName) -> String {
    fq_name.names().iter().map(|n| capitalize(n)).collect()
}

/// New-IDL package. Major version 1 keeps the package unchanged.
#[must_use]
pub fn aidl_package(fq_name: &QualifiedName) -> String {
    let major = fq_name.version().major;
    if major == 1 {
        fq_name.package().to_string()
    } else {
        format!("{}{}", fq_name.package(), major)
    }
}

/// `aidl_package + "." + aidl_name`.
#[must_use]
pub fn aidl_fq_name(fq_name: &QualifiedName) -> String {
    format!("{}.{}", aidl_package(fq_name), aidl_name(fq_name))
}

/// New-IDL package as a relative directory path.
#[must_use]
pub fn aidl_package_path(fq_name: &QualifiedName) -> String {
    aidl_package(fq_name).replace('.', "/")
}

/// Old-IDL package as a relative directory path.
#[must_use]
pub fn hidl_package_path(fq_name: &QualifiedName) -> String {
    fq_name.package().replace('.', "/")
}
