use thiserror::Error;

/// Duration text a fresh or reset countdown starts from.
pub const DEFAULT_TIMER_INPUT: &str = "00:00:00";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("malformed duration {0:?}, expected HH:MM:SS")]
    Malformed(String),

    #[error("duration is too long")]
    Overflow,
}

/// Milliseconds for `hh:mm:ss`. Minutes and seconds above 59 simply carry.
pub(crate) fn hms_to_ms(hh: u64, mm: u64, ss: u64) -> Result<u64, DurationError> {
    hh.checked_mul(3600)
        .and_then(|h| mm.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(ss))
        .and_then(|secs| secs.checked_mul(1000))
        .ok_or(DurationError::Overflow)
}

/// Parse "HH:MM:SS" into milliseconds.
///
/// Exactly three colon-separated, non-negative integer segments are
/// accepted; surrounding whitespace on each segment is ignored.
pub fn parse_hms(input: &str) -> Result<u64, DurationError> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(DurationError::Malformed(input.to_string()));
    }
    let mut fields = [0u64; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        let part = part.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DurationError::Malformed(input.to_string()));
        }
        *field = part.parse::<u64>().map_err(|_| DurationError::Overflow)?;
    }
    hms_to_ms(fields[0], fields[1], fields[2])
}
