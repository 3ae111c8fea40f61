use chrono::{DateTime, Utc};
use rand::Rng;

pub const REPORT_ID_PREFIX: &str = "RPT";
const RANDOM_SEGMENT_LEN: usize = 6;
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// New report identifier of the form `RPT-<millis base36>-<6 random base36>`.
pub fn generate_report_id() -> String {
    generate_report_id_at(Utc::now())
}

pub(crate) fn generate_report_id_at(now: DateTime<Utc>) -> String {
    // Millisecond timestamps before the epoch do not occur for real clocks.
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();

    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_SEGMENT_LEN)
        .map(|_| char::from(BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())]))
        .collect();

    format!("{REPORT_ID_PREFIX}-{}-{random}", to_base36(millis))
}

/// True iff `candidate` matches `^RPT-[A-Z0-9]+-[A-Z0-9]+$`.
pub fn is_valid_report_id(candidate: &str) -> bool {
    segments(candidate).is_some()
}

/// Creation time in Unix milliseconds encoded in a report identifier.
pub fn extract_timestamp(candidate: &str) -> Option<i64> {
    let (timestamp, _) = segments(candidate)?;
    i64::from_str_radix(timestamp, 36).ok()
}

fn segments(candidate: &str) -> Option<(&str, &str)> {
    let rest = candidate.strip_prefix(REPORT_ID_PREFIX)?.strip_prefix('-')?;
    let (timestamp, random) = rest.split_once('-')?;
    (is_base36_segment(timestamp) && is_base36_segment(random)).then_some((timestamp, random))
}

fn is_base36_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|byte| byte.is_ascii_digit() || byte.is_ascii_uppercase())
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
