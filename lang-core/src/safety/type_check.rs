//! Result type-usage check and slice type-check (§4.8).
//!
//! Two of the spec's four Result-usage sub-checks — "invalid tag" and "Ok
//! or Err with a null payload but non-zero size" — describe failure modes
//! of a C-shaped tagged union with a raw `void*` payload. `AnyResult`'s
//! Rust-native representation (a real two-variant enum holding a `Box`)
//! makes both states unrepresentable: there is no third tag, and a `Box`
//! is never null. Only the type-identity mismatch remains to check here.

use std::panic::Location;

use crate::result::{AnyResult, TypeId};
use crate::safety;
use crate::safety::violation::{Severity, SafetyViolation, ViolationCategory};

/// A slice header as it would be passed across an FFI boundary:
/// `{ptr, len, element_size, type_id}`. Unlike `AnyResult`, this really can
/// be null — it is the one place in this crate a raw pointer is modeled
/// directly, matching §4.8's literal slice-header shape.
pub struct SliceHeader {
    pub ptr: *const u8,
    pub len: usize,
    pub element_size: usize,
    pub type_id: TypeId,
}

/// Compares `expected_type_id` against the active payload's type id.
/// Reports a mismatch to the safety report sink and returns `false`;
/// returns `true` when they agree.
#[track_caller]
pub fn check_result_usage(result: &AnyResult, expected_type_id: TypeId) -> bool {
    let active = result.value_type_id().or_else(|| result.error_type_id());
    match active {
        Some(found) if found == expected_type_id => true,
        Some(found) => {
            let caller = Location::caller();
            safety::report(SafetyViolation::new(
                ViolationCategory::ResultTypeUsage,
                Severity::Error,
                caller.file(),
                caller.line(),
                "check_result_usage",
                format!("expected type id {expected_type_id}, found {found}"),
            ));
            false
        }
        None => unreachable!("AnyResult is always Ok or Err"),
    }
}

/// Validates a slice header: element-type mismatch, a null `ptr` with
/// `len > 0`, or `element_size == 0` are each reported as a violation.
#[track_caller]
pub fn check_slice(header: &SliceHeader, expected_element: TypeId) -> bool {
    let caller = Location::caller();
    let mut message = None;

    if header.type_id != expected_element {
        message = Some(format!(
            "slice element type mismatch: expected {expected_element}, found {}",
            header.type_id
        ));
    } else if header.ptr.is_null() && header.len > 0 {
        message = Some(format!("slice has {} null-backed element(s)", header.len));
    } else if header.element_size == 0 {
        message = Some("slice element_size is zero".to_string());
    }

    match message {
        Some(message) => {
            safety::report(SafetyViolation::new(
                ViolationCategory::SliceTypeCheck,
                Severity::Error,
                caller.file(),
                caller.line(),
                "check_slice",
                message,
            ));
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ok_i64;
    use crate::types::{PRIMITIVE_I32, PRIMITIVE_I64};

    #[test]
    fn matching_type_id_passes() {
        let r = ok_i64(1);
        assert!(check_result_usage(&r, PRIMITIVE_I64));
    }

    #[test]
    fn mismatched_type_id_fails() {
        let r = ok_i64(1);
        assert!(!check_result_usage(&r, PRIMITIVE_I32));
    }

    #[test]
    fn null_ptr_with_positive_len_fails() {
        let header = SliceHeader {
            ptr: std::ptr::null(),
            len: 4,
            element_size: 4,
            type_id: PRIMITIVE_I32,
        };
        assert!(!check_slice(&header, PRIMITIVE_I32));
    }

    #[test]
    fn zero_element_size_fails() {
        let buf = [0u8; 4];
        let header = SliceHeader {
            ptr: buf.as_ptr(),
            len: 1,
            element_size: 0,
            type_id: PRIMITIVE_I32,
        };
        assert!(!check_slice(&header, PRIMITIVE_I32));
    }

    #[test]
    fn well_formed_slice_passes() {
        let buf = [0u8; 16];
        let header = SliceHeader {
            ptr: buf.as_ptr(),
            len: 4,
            element_size: 4,
            type_id: PRIMITIVE_I32,
        };
        assert!(check_slice(&header, PRIMITIVE_I32));
    }
}
