//! Validation for the run-polling bounds.

use crate::schema::AvatalkConfig;

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_polling(errors: &mut Vec<String>, config: &AvatalkConfig) {
    let polling = &config.polling;
    validate_range(
        errors,
        "polling.initial_interval_ms",
        polling.initial_interval_ms,
        10,
        60_000,
    );
    validate_range_f64(errors, "polling.multiplier", polling.multiplier, 1.0, 10.0);
    validate_range(
        errors,
        "polling.max_attempts",
        polling.max_attempts.into(),
        1,
        10_000,
    );
    validate_range(errors, "polling.deadline_secs", polling.deadline_secs, 1, 3600);

    if polling.max_interval_ms < polling.initial_interval_ms {
        errors.push(format!(
            "polling.max_interval_ms = {} is below polling.initial_interval_ms = {}",
            polling.max_interval_ms, polling.initial_interval_ms
        ));
    }
}

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &AvatalkConfig) {
    validate_range(
        errors,
        "session.event_capacity",
        config.session.event_capacity.into(),
        1,
        4096,
    );
}
