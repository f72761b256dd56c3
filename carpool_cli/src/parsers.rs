use jiff::{SignedDuration, SpanRelativeTo};

/// Accepts ISO 8601 (`PT10S`), friendly (`10s`, `1m 30s`) or a plain number
/// of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = if let Ok(duration) = input.parse::<SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<i64>() {
        SignedDuration::from_secs(seconds)
    } else {
        return Err(format!("Invalid duration {input:?}"));
    };

    if duration.is_negative() {
        return Err(format!("Duration {input:?} must not be negative"));
    }

    Ok(duration)
}
