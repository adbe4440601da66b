//! Safety validator `V` — configurable static/dynamic checks layered over
//! the Result engine and the analyzer substrate.
//!
//! Every check consults a [`SafetyConfig`] flag before doing any work; a
//! disabled check reports "valid" trivially rather than being skipped by
//! the caller, so call sites never need their own `if config.x` guard.

pub mod delimiters;
pub mod pattern;
pub mod type_check;
pub mod violation;

use std::panic::Location;
use std::sync::OnceLock;

pub use violation::{Severity as ViolationSeverity, SafetyViolation, ViolationCategory};

/// A read-mostly capability value: constructed once (directly, or via one
/// of the four presets) and passed into [`crate::analyzer::Analyzer::new`].
/// Updates replace the whole value rather than mutating flags in place, so
/// no partial visibility can be observed across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyConfig {
    pub parser_validation: bool,
    pub pattern_match_checks: bool,
    pub type_safety_checks: bool,
    pub ffi_annotation_verification: bool,
    pub boundary_checks: bool,
    pub ownership_tracking: bool,
    pub variadic_validation: bool,
    pub string_op_validation: bool,
    pub slice_bounds: bool,
    pub memory_layout: bool,
    pub concurrency_debug: bool,
    pub error_handling_aids: bool,
    pub security_enforcement: bool,
    pub stack_canaries: bool,
    pub ffi_call_logging: bool,
    pub constant_time_verification: bool,
    pub secure_memory_validation: bool,
    pub fault_injection: bool,
    pub performance_monitoring: bool,
}

impl SafetyConfig {
    const ALL_ON: SafetyConfig = SafetyConfig {
        parser_validation: true,
        pattern_match_checks: true,
        type_safety_checks: true,
        ffi_annotation_verification: true,
        boundary_checks: true,
        ownership_tracking: true,
        variadic_validation: true,
        string_op_validation: true,
        slice_bounds: true,
        memory_layout: true,
        concurrency_debug: true,
        error_handling_aids: true,
        security_enforcement: true,
        stack_canaries: true,
        ffi_call_logging: true,
        constant_time_verification: true,
        secure_memory_validation: true,
        fault_injection: true,
        performance_monitoring: true,
    };

    const ALL_OFF: SafetyConfig = SafetyConfig {
        parser_validation: false,
        pattern_match_checks: false,
        type_safety_checks: false,
        ffi_annotation_verification: false,
        boundary_checks: false,
        ownership_tracking: false,
        variadic_validation: false,
        string_op_validation: false,
        slice_bounds: false,
        memory_layout: false,
        concurrency_debug: false,
        error_handling_aids: false,
        security_enforcement: false,
        stack_canaries: false,
        ffi_call_logging: false,
        constant_time_verification: false,
        secure_memory_validation: false,
        fault_injection: false,
        performance_monitoring: false,
    };

    /// Everything on except the expensive, noisy checks a developer
    /// wouldn't want mid-edit-compile-run.
    pub fn debug() -> Self {
        SafetyConfig {
            fault_injection: false,
            performance_monitoring: false,
            ..Self::ALL_ON
        }
    }

    /// All checks off — the only preset with zero validator overhead.
    pub fn release() -> Self {
        Self::ALL_OFF
    }

    /// Parser/pattern/type checks on; the heavier runtime-debug aids off.
    pub fn testing() -> Self {
        SafetyConfig {
            concurrency_debug: false,
            ffi_call_logging: false,
            constant_time_verification: false,
            fault_injection: false,
            performance_monitoring: false,
            ..Self::ALL_ON
        }
    }

    /// Every check on, including the expensive security-oriented ones.
    pub fn paranoid() -> Self {
        Self::ALL_ON
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self::debug()
    }
}

static REPORT_SINK: OnceLock<Box<dyn Fn(SafetyViolation) + Send + Sync>> = OnceLock::new();

/// Registers the single process-wide report sink. Subsequent calls are
/// ignored (the sink is set-once, matching the spec's "a single report
/// sink" — there is no way to reconfigure once a validator has started
/// reporting).
pub fn set_report_sink(sink: impl Fn(SafetyViolation) + Send + Sync + 'static) {
    let _ = REPORT_SINK.set(Box::new(sink));
}

/// Delivers `violation` to the registered sink, or to `tracing::warn!` if
/// none was ever registered. Reporting is fire-and-forget: this never
/// returns an error and a validator check never aborts because of it.
pub fn report(violation: SafetyViolation) {
    match REPORT_SINK.get() {
        Some(sink) => sink(violation),
        None => tracing::warn!(
            category = ?violation.category,
            severity = ?violation.severity,
            file = %violation.source_file,
            line = violation.source_line,
            function = %violation.source_function,
            "{}",
            violation.message
        ),
    }
}

/// Runs the checks gated by `config` over one piece of input, bundling the
/// result structures each sub-check produces.
pub struct SafetyValidator {
    config: SafetyConfig,
}

impl SafetyValidator {
    pub fn new(config: SafetyConfig) -> Self {
        SafetyValidator { config }
    }

    pub fn config(&self) -> SafetyConfig {
        self.config
    }

    /// §4.8 delimiter balance. Disabled checks report `Ok(())` trivially.
    /// A failed scan is also delivered to the report sink, like every
    /// other validator violation.
    #[track_caller]
    pub fn check_delimiters(&self, source: &str) -> Result<(), delimiters::DelimiterError> {
        if !self.config.parser_validation {
            return Ok(());
        }
        let outcome = delimiters::check_balance(source);
        if let Err(error) = &outcome {
            let caller = Location::caller();
            report(SafetyViolation::new(
                ViolationCategory::DelimiterBalance,
                ViolationSeverity::Error,
                caller.file(),
                caller.line(),
                "check_delimiters",
                error.to_string(),
            ));
        }
        outcome
    }

    /// §4.8 pattern completeness/redundancy. Disabled checks report
    /// `Complete` trivially. `Incomplete`/`Redundant`/`Unreachable`
    /// outcomes are also delivered to the report sink.
    #[track_caller]
    pub fn check_pattern_completeness(
        &self,
        arms: &[crate::match_engine::Pattern],
    ) -> pattern::Completeness {
        if !self.config.pattern_match_checks {
            return pattern::Completeness::Complete;
        }
        let outcome = pattern::check_completeness(arms);
        if let Some(message) = pattern::violation_message(&outcome) {
            let caller = Location::caller();
            report(SafetyViolation::new(
                ViolationCategory::PatternCompleteness,
                ViolationSeverity::Warning,
                caller.file(),
                caller.line(),
                "check_pattern_completeness",
                message,
            ));
        }
        outcome
    }

    /// §4.8 Result type-usage check. Disabled checks report valid
    /// trivially and report nothing.
    pub fn check_result_usage(
        &self,
        result: &crate::result::AnyResult,
        expected_type_id: crate::result::TypeId,
    ) -> bool {
        if !self.config.type_safety_checks {
            return true;
        }
        type_check::check_result_usage(result, expected_type_id)
    }

    /// §4.8 slice type-check. Disabled checks report valid trivially.
    pub fn check_slice(&self, header: &type_check::SliceHeader, expected_element: crate::result::TypeId) -> bool {
        if !self.config.slice_bounds {
            return true;
        }
        type_check::check_slice(header, expected_element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_preset_disables_every_flag() {
        let config = SafetyConfig::release();
        assert!(!config.parser_validation);
        assert!(!config.pattern_match_checks);
        assert!(!config.performance_monitoring);
    }

    #[test]
    fn disabled_check_reports_valid_trivially() {
        let validator = SafetyValidator::new(SafetyConfig::release());
        assert!(validator.check_delimiters("{{{{ unbalanced").is_ok());
    }

    #[test]
    fn paranoid_preset_enables_every_flag() {
        let config = SafetyConfig::paranoid();
        assert!(config.fault_injection);
        assert!(config.constant_time_verification);
    }

    #[test]
    fn delimiter_and_pattern_violations_reach_the_report_sink() {
        use std::sync::{Arc, Mutex};

        let captured: Arc<Mutex<Vec<ViolationCategory>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_capture = Arc::clone(&captured);
        set_report_sink(move |violation| {
            sink_capture.lock().expect("capture mutex poisoned").push(violation.category);
        });

        let validator = SafetyValidator::new(SafetyConfig::debug());
        assert!(validator.check_delimiters("fn f() {{{").is_err());
        let _ = validator.check_pattern_completeness(&[
            crate::match_engine::Pattern::Ok,
            crate::match_engine::Pattern::Ok,
        ]);

        let seen = captured.lock().expect("capture mutex poisoned");
        assert!(seen.contains(&ViolationCategory::DelimiterBalance));
        assert!(seen.contains(&ViolationCategory::PatternCompleteness));
    }
}
