//! New-IDL type mapping and declaration generation.

pub mod declarations;
pub mod types;

pub use declarations::{DEFAULT_LICENSE_HEADER, DeclarationGenerator};
pub use types::{TypeMapper, scalar_aidl_type};
