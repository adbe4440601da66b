//! Match engine `M` — dispatches an [`AnyResult`] to the first of N arms
//! that matches.

use std::any::Any;

use crate::result::{AnyResult, TypeId, ANY_TYPE};

/// What tag (and, for Ok/Err, which payload type) an arm accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Ok,
    Err,
    Wildcard,
}

/// One entry of a match table. `expected_type_id` of [`ANY_TYPE`] (`0`)
/// accepts any payload type for that tag.
pub struct Arm<'a> {
    pub pattern: Pattern,
    pub expected_type_id: TypeId,
    pub handler: Box<dyn FnMut(&(dyn Any + Send + Sync)) + 'a>,
}

impl<'a> Arm<'a> {
    pub fn new(
        pattern: Pattern,
        expected_type_id: TypeId,
        handler: impl FnMut(&(dyn Any + Send + Sync)) + 'a,
    ) -> Self {
        Arm {
            pattern,
            expected_type_id,
            handler: Box::new(handler),
        }
    }
}

/// Iterates `arms` in declaration order against `result`. The first arm
/// whose pattern matches the tag and whose `expected_type_id` is `0` or
/// equal to the relevant type id fires: its handler is invoked once with
/// the payload, and the arm's index is returned. Returns `-1` if no arm
/// fires. Wildcard never rejects.
pub fn dispatch(result: &AnyResult, arms: &mut [Arm]) -> i64 {
    for (index, arm) in arms.iter_mut().enumerate() {
        let fires = match arm.pattern {
            Pattern::Wildcard => true,
            Pattern::Ok => {
                result.is_ok()
                    && (arm.expected_type_id == ANY_TYPE
                        || Some(arm.expected_type_id) == result.value_type_id())
            }
            Pattern::Err => {
                result.is_err()
                    && (arm.expected_type_id == ANY_TYPE
                        || Some(arm.expected_type_id) == result.error_type_id())
            }
        };
        if fires {
            // The handler always sees the payload of the tag the value
            // actually carries, regardless of which pattern matched
            // (Wildcard fires on either tag).
            let empty: &(dyn Any + Send + Sync) = &();
            let payload = result.peek_ok_any().or_else(|| result.peek_err_any()).unwrap_or(empty);
            (arm.handler)(payload);
            return index as i64;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{err_cstr, ok_i64};
    use std::cell::Cell;

    #[test]
    fn s1_first_match_wins_and_invokes_once() {
        let r = ok_i64(42);
        let calls = Cell::new(0);
        let mut arms = vec![
            Arm::new(Pattern::Ok, ANY_TYPE, |payload| {
                calls.set(calls.get() + 1);
                assert_eq!(*payload.downcast_ref::<i64>().unwrap(), 42);
            }),
            Arm::new(Pattern::Err, ANY_TYPE, |_| panic!("must not fire")),
        ];
        let fired = dispatch(&r, &mut arms);
        assert_eq!(fired, 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn no_match_returns_negative_one() {
        let r = err_cstr("boom");
        let mut arms = vec![Arm::new(Pattern::Ok, ANY_TYPE, |_| {})];
        assert_eq!(dispatch(&r, &mut arms), -1);
    }

    #[test]
    fn wildcard_never_rejects() {
        let r = err_cstr("boom");
        let mut arms = vec![Arm::new(Pattern::Wildcard, ANY_TYPE, |_| {})];
        assert_eq!(dispatch(&r, &mut arms), 0);
    }

    #[test]
    fn match_determinism_repeated_invocation() {
        let r = ok_i64(1);
        let mut arms = || {
            vec![
                Arm::new(Pattern::Ok, ANY_TYPE, |_| {}),
                Arm::new(Pattern::Wildcard, ANY_TYPE, |_| {}),
            ]
        };
        assert_eq!(dispatch(&r, &mut arms()), dispatch(&r, &mut arms()));
    }
}
