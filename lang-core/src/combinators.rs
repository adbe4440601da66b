//! Combinators `C` — pure transformations over [`AnyResult`].
//!
//! The spec's handler signature is `handler(payload, context)`; in this
//! crate the `context` parameter is modeled the idiomatic Rust way, as the
//! closure's captured environment, rather than threaded through as an
//! extra argument. Every combinator here is generic over the concrete
//! payload type, matching the §9 redesign note that the runtime type id
//! becomes unnecessary at a typed use site — the combinator just needs to
//! know `T`/`U`/`E` to downcast the erased payload.

use std::any::Any;

use crate::result::{AnyResult, Ownership, TypeId};

impl AnyResult {
    fn reconstruct_ok<U: Any + Send + Sync + 'static>(
        value: U,
        size: usize,
        type_id: TypeId,
        ownership: Ownership,
    ) -> AnyResult {
        AnyResult::ok(value, size, type_id, ownership)
    }

    fn reconstruct_err<E: Any + Send + Sync + 'static>(
        error: E,
        size: usize,
        type_id: TypeId,
        ownership: Ownership,
    ) -> AnyResult {
        AnyResult::err(error, size, type_id, ownership)
    }

    /// If `self` is Ok, replaces the payload with `f(payload)`. A `None`
    /// from `f` is promoted to an Err carrying the literal diagnostic
    /// `"Mapping function returned NULL"`. If `self` is Err, passes
    /// through unchanged. Preserves ownership.
    pub fn map_ok<T, U, F>(self, f: F) -> AnyResult
    where
        T: Any + Send + Sync + 'static,
        U: Any + Send + Sync + 'static,
        F: FnOnce(T) -> Option<U>,
    {
        let ownership = self.ownership();
        if !self.is_ok() {
            return self;
        }
        let value_type_id = self.value_type_id().expect("checked is_ok above");
        let value = self
            .take_ok::<T>()
            .expect("caller asserted the Ok payload is T");
        match f(value) {
            Some(new_value) => {
                let size = std::mem::size_of::<U>();
                AnyResult::reconstruct_ok(new_value, size, value_type_id, ownership)
            }
            None => AnyResult::reconstruct_err(
                "Mapping function returned NULL",
                0,
                crate::types::PRIMITIVE_STRING,
                ownership,
            ),
        }
    }

    /// Mirror of [`Self::map_ok`] for the Err side.
    pub fn map_err<E, F, G>(self, g: G) -> AnyResult
    where
        E: Any + Send + Sync + 'static,
        F: Any + Send + Sync + 'static,
        G: FnOnce(E) -> Option<F>,
    {
        let ownership = self.ownership();
        if !self.is_err() {
            return self;
        }
        let error_type_id = self.error_type_id().expect("checked is_err above");
        let error = self
            .take_err::<E>()
            .expect("caller asserted the Err payload is E");
        match g(error) {
            Some(new_error) => {
                let size = std::mem::size_of::<F>();
                AnyResult::reconstruct_err(new_error, size, error_type_id, ownership)
            }
            None => AnyResult::reconstruct_err(
                "Mapping function returned NULL",
                0,
                crate::types::PRIMITIVE_STRING,
                ownership,
            ),
        }
    }

    /// If `self` is Ok, returns `g(payload)`. Short-circuits on the first
    /// Err in a chain by passing Err through unchanged.
    pub fn and_then<T, G>(self, g: G) -> AnyResult
    where
        T: Any + Send + Sync + 'static,
        G: FnOnce(T) -> AnyResult,
    {
        if !self.is_ok() {
            return self;
        }
        let value = self
            .take_ok::<T>()
            .expect("caller asserted the Ok payload is T");
        g(value)
    }

    /// Mirror of [`Self::and_then`]: recovers an Err by invoking `g(error)`.
    pub fn or_else<E, G>(self, g: G) -> AnyResult
    where
        E: Any + Send + Sync + 'static,
        G: FnOnce(E) -> AnyResult,
    {
        if !self.is_err() {
            return self;
        }
        let error = self
            .take_err::<E>()
            .expect("caller asserted the Err payload is E");
        g(error)
    }

    /// True iff the tag is Ok and `pred` (if supplied) accepts the payload.
    /// A `None` predicate means unconditional true, matching "null
    /// predicate = unconditional true" in the spec.
    pub fn is_ok_and<T: Any + Send + Sync + 'static>(&self, pred: Option<&dyn Fn(&T) -> bool>) -> bool {
        match self.peek_ok::<T>() {
            Some(value) => pred.map(|p| p(value)).unwrap_or(true),
            None => false,
        }
    }

    /// Mirror of [`Self::is_ok_and`] for the Err side.
    pub fn is_err_and<E: Any + Send + Sync + 'static>(&self, pred: Option<&dyn Fn(&E) -> bool>) -> bool {
        match self.peek_err::<E>() {
            Some(error) => pred.map(|p| p(error)).unwrap_or(true),
            None => false,
        }
    }

    /// Returns the Ok payload, or `default` on Err.
    pub fn unwrap_or<T: Any + Send + Sync + 'static>(self, default: T) -> T {
        if self.is_ok() {
            self.take_ok::<T>().unwrap_or(default)
        } else {
            default
        }
    }

    /// Returns the Ok payload, or `g(error)` on Err.
    pub fn unwrap_or_else<T, E, G>(self, g: G) -> T
    where
        T: Any + Send + Sync + 'static,
        E: Any + Send + Sync + 'static,
        G: FnOnce(E) -> T,
    {
        if self.is_ok() {
            self.take_ok::<T>().expect("caller asserted the Ok payload is T")
        } else {
            let error = self.take_err::<E>().expect("caller asserted the Err payload is E");
            g(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::result::{err_cstr, ok_i64};

    #[test]
    fn combinator_laws_and_then() {
        let ok = ok_i64(1);
        let out = ok.and_then::<i64, _>(|v| crate::result::ok_i64(v + 1));
        assert_eq!(*out.unwrap_ok::<i64>().unwrap(), 2);

        let err = err_cstr("boom");
        let out = err.and_then::<i64, _>(|_v| crate::result::ok_i64(9));
        assert!(out.is_err());
        assert_eq!(*out.unwrap_err::<&'static str>().unwrap(), "boom");
    }

    #[test]
    fn s2_and_then_short_circuits() {
        let r = err_cstr("boom");
        let called = std::cell::Cell::new(false);
        let out = r.and_then::<i64, _>(|v| {
            called.set(true);
            crate::result::ok_i64(v + 1)
        });
        assert!(!called.get());
        assert!(out.is_err());
    }

    #[test]
    fn or_else_recovers_err() {
        let r = err_cstr("boom");
        let out = r.or_else::<&'static str, _>(|_e| crate::result::ok_i64(7));
        assert_eq!(*out.unwrap_ok::<i64>().unwrap(), 7);
    }

    #[test]
    fn unwrap_or_defaults_on_err() {
        let r = err_cstr("boom");
        assert_eq!(r.unwrap_or(5i64), 5);
        let r = ok_i64(9);
        assert_eq!(r.unwrap_or(5i64), 9);
    }

    #[test]
    fn map_ok_null_promotes_to_err() {
        let r = ok_i64(1);
        let out = r.map_ok::<i64, i64, _>(|_v| None);
        assert!(out.is_err());
        assert_eq!(
            *out.unwrap_err::<&'static str>().unwrap(),
            "Mapping function returned NULL"
        );
    }

    #[test]
    fn is_ok_and_with_null_predicate_is_unconditional() {
        let r = ok_i64(1);
        assert!(r.is_ok_and::<i64>(None));
    }
}
