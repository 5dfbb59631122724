//! Relative timestamp labels ("5 minutes ago") for comments and history.

const MINUTE_MS: f64 = 60_000.0;
const HOUR_MS: f64 = 3_600_000.0;
const DAY_MS: f64 = 86_400_000.0;
const WEEK_MS: f64 = 604_800_000.0;

/// Human label for how long ago `then_ms` was, relative to `now_ms`.
///
/// Future or sub-minute timestamps render as "just now"; clock skew from
/// the server is not worth surfacing.
#[must_use]
pub fn relative_label(then_ms: f64, now_ms: f64) -> String {
    let delta = now_ms - then_ms;
    if delta < MINUTE_MS {
        return "just now".to_string();
    }
    let (unit_ms, unit) = if delta < HOUR_MS {
        (MINUTE_MS, "minute")
    } else if delta < DAY_MS {
        (HOUR_MS, "hour")
    } else if delta < WEEK_MS {
        (DAY_MS, "day")
    } else {
        (WEEK_MS, "week")
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (delta / unit_ms) as u64;
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::relative_label;

    const NOW: f64 = 1_700_000_000_000.0;

    #[test]
    fn sub_minute_and_future_are_just_now() {
        assert_eq!(relative_label(NOW - 30_000.0, NOW), "just now");
        assert_eq!(relative_label(NOW + 5_000.0, NOW), "just now");
    }

    #[test]
    fn units_scale_with_age() {
        assert_eq!(relative_label(NOW - 60_000.0, NOW), "1 minute ago");
        assert_eq!(relative_label(NOW - 300_000.0, NOW), "5 minutes ago");
        assert_eq!(relative_label(NOW - 7_200_000.0, NOW), "2 hours ago");
        assert_eq!(relative_label(NOW - 259_200_000.0, NOW), "3 days ago");
        assert_eq!(relative_label(NOW - 1_814_400_000.0, NOW), "3 weeks ago");
    }
}
