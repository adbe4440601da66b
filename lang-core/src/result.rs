//! The Result value `R` — a tagged Ok/Err container with an opaque payload,
//! a structural type id, and an ownership hint.
//!
//! `spec.md` describes `R` as a C-shaped discriminated union over
//! `void*` payloads. Per the §9 redesign note this becomes a real Rust sum
//! type at typed use sites (callers should generally reach for `Result<T,
//! E>` directly); `AnyResult` below is the erased variant kept for the one
//! place the spec still needs a runtime type id comparison — the
//! FFI-shaped boundary exercised by `unwrap_ok`/`unwrap_err` and by the
//! safety validator's type-usage check.

use std::any::Any;
use std::fmt;

use tracing::debug;

use crate::error::ErrorKind;

/// `0` means "any / unchecked"; non-zero ids are assumed to be issued by a
/// [`crate::types::TypeRegistry`].
pub type TypeId = u32;

/// The "any / unchecked" sentinel type id.
pub const ANY_TYPE: TypeId = 0;

/// Who is responsible for freeing a payload. Set at construction, never
/// mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Freed by this crate when the owning [`AnyResult`] is dropped.
    Gc,
    /// Owned by external (non-GC) code; this crate must not free it.
    ManualExternal,
    /// Pinned in place for the lifetime of some external arena; never
    /// freed by this crate either.
    Pinned,
}

type Opaque = Box<dyn Any + Send + Sync>;

enum Tagged {
    Ok {
        payload: Opaque,
        payload_size: usize,
        value_type_id: TypeId,
        ownership: Ownership,
    },
    Err {
        error: Opaque,
        error_size: usize,
        error_type_id: TypeId,
        ownership: Ownership,
    },
}

/// An erased Result value. See the module doc comment for when to reach for
/// this instead of a typed `std::result::Result<T, E>`.
pub struct AnyResult {
    tagged: Tagged,
}

impl fmt::Debug for AnyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tagged {
            Tagged::Ok {
                value_type_id,
                ownership,
                ..
            } => f
                .debug_struct("AnyResult::Ok")
                .field("value_type_id", value_type_id)
                .field("ownership", ownership)
                .finish(),
            Tagged::Err {
                error_type_id,
                ownership,
                ..
            } => f
                .debug_struct("AnyResult::Err")
                .field("error_type_id", error_type_id)
                .field("ownership", ownership)
                .finish(),
        }
    }
}

/// Attempts to box `value`, simulating an allocator that can fail. Real
/// allocator failure isn't observable through `Box::new` on stable Rust; we
/// approximate it with `Vec::try_reserve_exact` ahead of the move so the
/// typed sugar constructors below have a genuine fallback path to exercise.
fn try_box<T: Any + Send + Sync + 'static>(value: T) -> std::result::Result<Opaque, ()> {
    let mut slot: Vec<T> = Vec::new();
    if slot.try_reserve_exact(1).is_err() {
        return Err(());
    }
    slot.push(value);
    Ok(Box::new(slot.pop().expect("just pushed")) as Opaque)
}

/// The statically-known message used when a typed sugar constructor's
/// allocation fails. Boxing a `&'static str` only allocates a thin pointer,
/// so this fallback remains constructible even under the pressure that
/// failed the caller's larger allocation.
const OOM_FALLBACK_MESSAGE: &str = "allocation failure";

impl AnyResult {
    /// Pure constructor: wraps `value` as Ok.
    pub fn ok<T: Any + Send + Sync + 'static>(
        value: T,
        payload_size: usize,
        value_type_id: TypeId,
        ownership: Ownership,
    ) -> Self {
        AnyResult {
            tagged: Tagged::Ok {
                payload: Box::new(value),
                payload_size,
                value_type_id,
                ownership,
            },
        }
    }

    /// Pure constructor: wraps `error` as Err.
    pub fn err<E: Any + Send + Sync + 'static>(
        error: E,
        error_size: usize,
        error_type_id: TypeId,
        ownership: Ownership,
    ) -> Self {
        AnyResult {
            tagged: Tagged::Err {
                error: Box::new(error),
                error_size,
                error_type_id,
                ownership,
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.tagged, Tagged::Ok { .. })
    }

    pub fn is_err(&self) -> bool {
        matches!(self.tagged, Tagged::Err { .. })
    }

    pub fn value_type_id(&self) -> Option<TypeId> {
        match &self.tagged {
            Tagged::Ok { value_type_id, .. } => Some(*value_type_id),
            Tagged::Err { .. } => None,
        }
    }

    pub fn error_type_id(&self) -> Option<TypeId> {
        match &self.tagged {
            Tagged::Err { error_type_id, .. } => Some(*error_type_id),
            Tagged::Ok { .. } => None,
        }
    }

    pub fn ownership(&self) -> Ownership {
        match &self.tagged {
            Tagged::Ok { ownership, .. } | Tagged::Err { ownership, .. } => *ownership,
        }
    }

    pub fn payload_size(&self) -> usize {
        match &self.tagged {
            Tagged::Ok { payload_size, .. } => *payload_size,
            Tagged::Err { error_size, .. } => *error_size,
        }
    }

    /// Returns the Ok payload downcast to `T`, or a `TypeMismatch`/`NullPointer`
    /// diagnostic if the tag or the dynamic type doesn't match. `found`
    /// carries the registry id actually stored, so the diagnostic names what
    /// was really there rather than a blanket "any" sentinel on both sides.
    pub fn unwrap_ok<T: Any + Send + Sync + 'static>(&self) -> Result<&T, ErrorKind> {
        match &self.tagged {
            Tagged::Ok { payload, value_type_id, .. } => {
                payload.downcast_ref::<T>().ok_or(ErrorKind::TypeMismatch {
                    expected: ANY_TYPE,
                    found: *value_type_id,
                })
            }
            Tagged::Err { error_type_id, .. } => Err(ErrorKind::TypeMismatch {
                expected: ANY_TYPE,
                found: *error_type_id,
            }),
        }
    }

    /// Mirror of [`Self::unwrap_ok`] for the Err side.
    pub fn unwrap_err<E: Any + Send + Sync + 'static>(&self) -> Result<&E, ErrorKind> {
        match &self.tagged {
            Tagged::Err { error, error_type_id, .. } => {
                error.downcast_ref::<E>().ok_or(ErrorKind::TypeMismatch {
                    expected: ANY_TYPE,
                    found: *error_type_id,
                })
            }
            Tagged::Ok { value_type_id, .. } => Err(ErrorKind::TypeMismatch {
                expected: ANY_TYPE,
                found: *value_type_id,
            }),
        }
    }

    /// Releases the payload. Idempotent given external discipline: once
    /// called, `self` is consumed and cannot be freed again.
    pub fn free(self) {
        debug!(ownership = ?self.ownership(), "freeing result payload");
        drop(self);
    }

    /// Consumes `self`, returning the Ok payload downcast to `T`, or
    /// `None` if the tag is Err or the dynamic type doesn't match. Used by
    /// the combinators, which know the concrete type at the call site.
    pub(crate) fn take_ok<T: Any + Send + Sync + 'static>(mut self) -> Option<T> {
        let placeholder = Tagged::Err {
            error: Box::new(()),
            error_size: 0,
            error_type_id: ANY_TYPE,
            ownership: Ownership::Gc,
        };
        let old = std::mem::replace(&mut self.tagged, placeholder);
        match old {
            Tagged::Ok { payload, .. } => payload.downcast::<T>().ok().map(|b| *b),
            Tagged::Err { .. } => None,
        }
    }

    /// Mirror of [`Self::take_ok`] for the Err side.
    pub(crate) fn take_err<E: Any + Send + Sync + 'static>(mut self) -> Option<E> {
        let placeholder = Tagged::Ok {
            payload: Box::new(()),
            payload_size: 0,
            value_type_id: ANY_TYPE,
            ownership: Ownership::Gc,
        };
        let old = std::mem::replace(&mut self.tagged, placeholder);
        match old {
            Tagged::Err { error, .. } => error.downcast::<E>().ok().map(|b| *b),
            Tagged::Ok { .. } => None,
        }
    }

    /// Borrowing mirror of [`Self::take_ok`] for read-only predicates.
    pub(crate) fn peek_ok<T: Any + Send + Sync + 'static>(&self) -> Option<&T> {
        match &self.tagged {
            Tagged::Ok { payload, .. } => payload.downcast_ref::<T>(),
            Tagged::Err { .. } => None,
        }
    }

    /// Borrowing mirror of [`Self::take_err`] for read-only predicates.
    pub(crate) fn peek_err<E: Any + Send + Sync + 'static>(&self) -> Option<&E> {
        match &self.tagged {
            Tagged::Err { error, .. } => error.downcast_ref::<E>(),
            Tagged::Ok { .. } => None,
        }
    }

    /// Type-erased borrow of the Ok payload, for callers (the match
    /// engine) that don't know the concrete type at the dispatch site.
    pub fn peek_ok_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        match &self.tagged {
            Tagged::Ok { payload, .. } => Some(payload.as_ref()),
            Tagged::Err { .. } => None,
        }
    }

    /// Type-erased borrow of the Err payload.
    pub fn peek_err_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        match &self.tagged {
            Tagged::Err { error, .. } => Some(error.as_ref()),
            Tagged::Ok { .. } => None,
        }
    }
}

impl Drop for AnyResult {
    fn drop(&mut self) {
        // Payloads under ManualExternal/Pinned ownership are owned by code
        // outside this crate; forget our box so we never run its
        // destructor or reclaim memory that isn't ours to reclaim.
        let ownership = self.ownership();
        if !matches!(ownership, Ownership::Gc) {
            match &mut self.tagged {
                Tagged::Ok { payload, .. } => {
                    let taken = std::mem::replace(payload, Box::new(()));
                    std::mem::forget(taken);
                }
                Tagged::Err { error, .. } => {
                    let taken = std::mem::replace(error, Box::new(()));
                    std::mem::forget(taken);
                }
            }
        }
    }
}

macro_rules! typed_ok_ctor {
    ($name:ident, $ty:ty, $type_id:expr) => {
        /// Allocates `value` under GC ownership. On allocation failure,
        /// returns a well-formed `ManualExternal` Err instead of panicking.
        pub fn $name(value: $ty) -> AnyResult {
            match try_box(value) {
                Ok(payload) => AnyResult {
                    tagged: Tagged::Ok {
                        payload,
                        payload_size: std::mem::size_of::<$ty>(),
                        value_type_id: $type_id,
                        ownership: Ownership::Gc,
                    },
                },
                Err(()) => oom_err(),
            }
        }
    };
}

fn oom_err() -> AnyResult {
    AnyResult {
        tagged: Tagged::Err {
            error: Box::new(OOM_FALLBACK_MESSAGE),
            error_size: OOM_FALLBACK_MESSAGE.len(),
            error_type_id: ANY_TYPE,
            ownership: Ownership::ManualExternal,
        },
    }
}

typed_ok_ctor!(ok_i64, i64, crate::types::PRIMITIVE_I64);
typed_ok_ctor!(ok_f64, f64, crate::types::PRIMITIVE_F64);
typed_ok_ctor!(ok_bool, bool, crate::types::PRIMITIVE_BOOL);

/// Allocates a `String` Ok payload under GC ownership. Hand-written rather
/// than generated by `typed_ok_ctor!`: `payload_size` for `PRIMITIVE_STRING`
/// means content length (matching `err_string`/`err_cstr`), not
/// `size_of::<String>()`, which is a constant struct-layout size regardless
/// of what the string holds.
pub fn ok_string(value: String) -> AnyResult {
    let payload_size = value.len();
    match try_box(value) {
        Ok(payload) => AnyResult {
            tagged: Tagged::Ok {
                payload,
                payload_size,
                value_type_id: crate::types::PRIMITIVE_STRING,
                ownership: Ownership::Gc,
            },
        },
        Err(()) => oom_err(),
    }
}

/// Allocates a `&'static str` error message under GC ownership.
pub fn err_cstr(message: &'static str) -> AnyResult {
    match try_box(message) {
        Ok(error) => AnyResult {
            tagged: Tagged::Err {
                error,
                error_size: message.len(),
                error_type_id: crate::types::PRIMITIVE_STRING,
                ownership: Ownership::Gc,
            },
        },
        Err(()) => oom_err(),
    }
}

/// Allocates an owned `String` error message under GC ownership.
pub fn err_string(message: String) -> AnyResult {
    match try_box(message.clone()) {
        Ok(error) => AnyResult {
            tagged: Tagged::Err {
                error,
                error_size: message.len(),
                error_type_id: crate::types::PRIMITIVE_STRING,
                ownership: Ownership::Gc,
            },
        },
        Err(()) => oom_err(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_totality() {
        let ok = ok_i64(42);
        assert!(ok.is_ok() ^ ok.is_err());
        let err = err_cstr("boom");
        assert!(err.is_ok() ^ err.is_err());
    }

    #[test]
    fn s1_result_basics() {
        let r = ok_i64(42);
        assert!(r.is_ok());
        assert_eq!(*r.unwrap_ok::<i64>().unwrap(), 42);
    }

    #[test]
    fn unwrap_err_on_ok_is_type_mismatch() {
        let r = ok_i64(1);
        assert!(r.unwrap_err::<&'static str>().is_err());
    }

    #[test]
    fn type_mismatch_reports_the_type_actually_found() {
        let r = ok_i64(1);
        match r.unwrap_err::<&'static str>() {
            Err(ErrorKind::TypeMismatch { found, .. }) => {
                assert_eq!(found, crate::types::PRIMITIVE_I64)
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }

        let r = err_cstr("boom");
        match r.unwrap_ok::<i64>() {
            Err(ErrorKind::TypeMismatch { found, .. }) => {
                assert_eq!(found, crate::types::PRIMITIVE_STRING)
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn ok_string_payload_size_is_content_length_like_err_string() {
        let r = ok_string("hello".to_string());
        assert_eq!(r.payload_size(), 5);

        let e = err_string("hello".to_string());
        assert_eq!(e.payload_size(), 5);
    }

    #[test]
    fn ownership_is_immutable_and_readable() {
        let r = err_cstr("boom");
        assert_eq!(r.ownership(), Ownership::Gc);
    }

    #[test]
    fn external_ownership_is_not_dropped_by_us() {
        // Constructing directly with ManualExternal and relying on Drop
        // not touching the payload is the contract under test; we can't
        // observe a non-free directly, but this must not double-free or
        // crash under miri-style scrutiny (exercised by the test harness).
        let r = AnyResult::err("static".to_string(), 6, ANY_TYPE, Ownership::ManualExternal);
        drop(r);
    }
}
