//! Pattern completeness/redundancy check (§4.8) over a Result scrutinee's
//! arm vector.

use crate::match_engine::Pattern;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    Incomplete { missing: Vec<String> },
    Redundant { index: usize },
    Unreachable { index: usize },
}

/// Walks `arms` in declaration order, applying the three rules in order:
/// (i) any arm after a `Wildcard` is `Unreachable`, (ii) a second `Ok`,
/// `Err`, or `Wildcard` is `Redundant` at its own index, (iii) `{Ok, Err}`
/// must be covered literally or by a `Wildcard` for `Complete`.
pub fn check_completeness(arms: &[Pattern]) -> Completeness {
    let mut seen_ok = false;
    let mut seen_err = false;
    let mut seen_wildcard = false;

    for (index, arm) in arms.iter().enumerate() {
        if seen_wildcard {
            return Completeness::Unreachable { index };
        }
        match arm {
            Pattern::Ok if seen_ok => return Completeness::Redundant { index },
            Pattern::Err if seen_err => return Completeness::Redundant { index },
            Pattern::Ok => seen_ok = true,
            Pattern::Err => seen_err = true,
            Pattern::Wildcard => seen_wildcard = true,
        }
    }

    if seen_wildcard || (seen_ok && seen_err) {
        return Completeness::Complete;
    }

    let mut missing = Vec::new();
    if !seen_ok {
        missing.push("Ok".to_string());
    }
    if !seen_err {
        missing.push("Err".to_string());
    }
    Completeness::Incomplete { missing }
}

/// Renders a descriptive message for every non-`Complete` outcome, or
/// `None` for `Complete` — the gate `SafetyValidator::check_pattern_completeness`
/// uses to decide whether an outcome is worth delivering to the report sink.
pub fn violation_message(outcome: &Completeness) -> Option<String> {
    match outcome {
        Completeness::Complete => None,
        Completeness::Incomplete { missing } => {
            Some(format!("match is missing arm(s): {}", missing.join(", ")))
        }
        Completeness::Redundant { index } => {
            Some(format!("arm at index {index} repeats an already-covered tag"))
        }
        Completeness::Unreachable { index } => {
            Some(format!("arm at index {index} is unreachable after a preceding wildcard"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_wildcard_then_ok_marks_ok_unreachable() {
        let arms = [Pattern::Wildcard, Pattern::Ok];
        assert_eq!(check_completeness(&arms), Completeness::Unreachable { index: 1 });
    }

    #[test]
    fn s4_ok_ok_is_redundant_at_second_index() {
        let arms = [Pattern::Ok, Pattern::Ok];
        assert_eq!(check_completeness(&arms), Completeness::Redundant { index: 1 });
    }

    #[test]
    fn ok_and_err_together_are_complete() {
        let arms = [Pattern::Ok, Pattern::Err];
        assert_eq!(check_completeness(&arms), Completeness::Complete);
    }

    #[test]
    fn only_ok_is_incomplete_missing_err() {
        let arms = [Pattern::Ok];
        assert_eq!(
            check_completeness(&arms),
            Completeness::Incomplete { missing: vec!["Err".to_string()] }
        );
    }

    #[test]
    fn lone_wildcard_is_complete() {
        let arms = [Pattern::Wildcard];
        assert_eq!(check_completeness(&arms), Completeness::Complete);
    }
}
