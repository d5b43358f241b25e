//! Old-to-new value translator generation.
//!
//! Three backends share one synthesis algorithm and differ only in syntax:
//! the two native backends return `false` on failure and write through an
//! output pointer, the managed backend throws and returns a new object.

pub mod checks;
pub mod fields;
pub mod source;

pub use fields::FieldTranslator;
pub use source::TranslateGenerator;

use crate::naming::{aidl_name, aidl_package, aidl_package_path};
use h2a_schema::{NamedType, QualifiedName};
use std::fmt;

/// Target backend of a generated translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    /// Native backend against the NDK bindings.
    Ndk,
    /// Native backend against the platform C++ bindings.
    Cpp,
    /// Managed backend.
    Java,
}

impl Backend {
    /// Every backend, in emission order.
    pub const ALL: [Self; 3] = [Self::Ndk, Self::Cpp, Self::Java];

    /// Returns true for the native backends.
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Ndk | Self::Cpp)
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ndk => "ndk",
            Self::Cpp => "cpp",
            Self::Java => "java",
        }
    }

    /// Parses a short backend name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Header path relative to the include root. Native backends only.
    #[must_use]
    pub fn header_file(self, target: &QualifiedName) -> Option<String> {
        self.is_native().then(|| {
            format!(
                "{}/translate-{}.h",
                aidl_package_path(target),
                self.name()
            )
        })
    }

    /// Source file path.
    #[must_use]
    pub fn source_file(self, target: &QualifiedName) -> String {
        match self {
            Self::Ndk | Self::Cpp => {
                format!("{}/translate-{}.cpp", aidl_package_path(target), self.name())
            }
            Self::Java => format!("{}/Translate.java", aidl_package_path(target)),
        }
    }

    /// Fully qualified new-IDL type as spelled by this backend's bindings.
    ///
    /// NDK: `aidl::a::b::Foo`, CPP: `a::b::Foo`, Java: `a.b.Foo`.
    #[must_use]
    pub fn aidl_type_path(self, fq_name: &QualifiedName) -> String {
        let prefix = if self == Self::Ndk { "aidl::" } else { "" };
        let separator = if self == Self::Java { "." } else { "::" };
        let package = aidl_package(fq_name)
            .split('.')
            .collect::<Vec<_>>()
            .join(separator);
        format!("{prefix}{package}{separator}{}", aidl_name(fq_name))
    }

    /// Translation function signature for an aggregate.
    #[must_use]
    pub fn signature(self, named: &NamedType) -> String {
        let fq_name = named.fq_name();
        match self {
            Self::Java => format!(
                "static public {} h2aTranslate({} in)",
                self.aidl_type_path(fq_name),
                fq_name.java_name()
            ),
            Self::Ndk | Self::Cpp => format!(
                "__attribute__((warn_unused_result)) bool translate(const {}& in, {}* out)",
                fq_name.cpp_name(),
                self.aidl_type_path(fq_name)
            ),
        }
    }

    /// Adapts a string read from the old representation.
    #[must_use]
    pub fn wrap_string(self, payload: &str) -> String {
        match self {
            Self::Cpp => format!("String16({payload}.c_str())"),
            Self::Ndk | Self::Java => payload.to_string(),
        }
    }

    /// Header include of the new-IDL binding for a type.
    #[must_use]
    pub fn aidl_include(self, fq_name: &QualifiedName) -> String {
        let prefix = if self == Self::Ndk { "aidl/" } else { "" };
        format!(
            "#include \"{prefix}{}/{}.h\"",
            aidl_package_path(fq_name),
            aidl_name(fq_name)
        )
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fq(s: &str) -> QualifiedName {
        QualifiedName::parse(s).expect("valid name")
    }

    #[test]
    fn test_file_paths() {
        let target = fq("hidl2aidl.test@1.1");
        assert_eq!(
            Backend::Ndk.header_file(&target).as_deref(),
            Some("hidl2aidl/test/translate-ndk.h")
        );
        assert_eq!(
            Backend::Cpp.source_file(&target),
            "hidl2aidl/test/translate-cpp.cpp"
        );
        assert_eq!(Backend::Java.header_file(&target), None);
        assert_eq!(
            Backend::Java.source_file(&target),
            "hidl2aidl/test/Translate.java"
        );
        assert_eq!(
            Backend::Ndk.source_file(&fq("a.b@2.0")),
            "a/b2/translate-ndk.cpp"
        );
    }

    #[test]
    fn test_aidl_type_path() {
        let name = fq("hidl2aidl.test@1.0::IFoo.BigStruct");
        assert_eq!(
            Backend::Ndk.aidl_type_path(&name),
            "aidl::hidl2aidl::test::IFooBigStruct"
        );
        assert_eq!(
            Backend::Cpp.aidl_type_path(&name),
            "hidl2aidl::test::IFooBigStruct"
        );
        assert_eq!(
            Backend::Java.aidl_type_path(&name),
            "hidl2aidl.test.IFooBigStruct"
        );
    }

    #[test]
    fn test_string_wrapping() {
        assert_eq!(Backend::Cpp.wrap_string("in.b"), "String16(in.b.c_str())");
        assert_eq!(Backend::Ndk.wrap_string("in.b"), "in.b");
        assert_eq!(Backend::Java.wrap_string("in.b"), "in.b");
    }

    #[test]
    fn test_aidl_include() {
        let name = fq("a.b@1.0::Foo");
        assert_eq!(Backend::Ndk.aidl_include(&name), "#include \"aidl/a/b/Foo.h\"");
        assert_eq!(Backend::Cpp.aidl_include(&name), "#include \"a/b/Foo.h\"");
    }

    #[test]
    fn test_backend_names() {
        for backend in Backend::ALL {
            assert_eq!(Backend::from_name(backend.name()), Some(backend));
        }
        assert_eq!(Backend::from_name("rust"), None);
        assert!(Backend::Cpp.is_native());
        assert!(!Backend::Java.is_native());
    }
}
