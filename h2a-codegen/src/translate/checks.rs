//! Scalar range guards.
//!
//! The new IDL has no unsigned integers, so some values of the old
//! representation do not fit the new one. For those kinds a runtime check is
//! emitted before the copy.

use crate::translate::Backend;
use crate::writer::CodeWriter;
use h2a_schema::ScalarKind;

/// Comment emitted above every guard.
pub const GUARD_COMMENT: &str = "// FIXME This requires conversion between signed and unsigned. \
                                 Change this if it doesn't suit your needs.";

/// Check emitted for one scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeGuard {
    /// Value must not be negative. The destination is an unsigned 16-bit
    /// code unit.
    NonNegative,
    /// Value must lie in `0..=max`. `max` carries its literal suffix.
    Bounded(&'static str),
}

/// Guard for a scalar kind, `None` when every value converts safely.
#[must_use]
pub const fn range_guard(kind: ScalarKind) -> Option<RangeGuard> {
    match kind {
        ScalarKind::Uint8 => Some(RangeGuard::Bounded("127")),
        ScalarKind::Int16 => Some(RangeGuard::NonNegative),
        ScalarKind::Uint32 => Some(RangeGuard::Bounded("2147483647")),
        ScalarKind::Uint64 => Some(RangeGuard::Bounded("9223372036854775807L")),
        _ => None,
    }
}

/// Emits the guard for `kind` if it has one.
///
/// `value` is the read expression, `path` the access path reported by the
/// managed backend's exception.
pub fn emit_scalar_guard(
    out: &mut CodeWriter,
    kind: ScalarKind,
    value: &str,
    path: &str,
    backend: Backend,
) {
    let Some(guard) = range_guard(kind) else {
        return;
    };
    out.line(GUARD_COMMENT);
    let condition = match guard {
        RangeGuard::NonNegative => format!("{value} < 0"),
        RangeGuard::Bounded(max) => format!("{value} > {max} || {value} < 0"),
    };
    out.block(format!("if ({condition})"), |out| {
        if backend.is_native() {
            out.line("return false;");
        } else {
            out.line(format!(
                "throw new RuntimeException(\"Unsafe conversion between signed and unsigned \
                 scalars for field: {path}\");"
            ));
        }
    });
}
