//! One-time passcode extraction from raw SMS text.

use regex::Regex;
use std::sync::LazyLock;

pub const OTP_NOT_FOUND: &str = "N/A";

struct OtpPattern {
    re: Regex,
    /// Extra check on a candidate match; the first accepted match is used.
    accept: fn(&str) -> bool,
}

fn any(_: &str) -> bool {
    true
}

fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

/// Tried in order; the first pattern with an accepted match decides the
/// result.  Narrow numeric shapes come before the broad fallbacks.
static OTP_PATTERNS: LazyLock<Vec<OtpPattern>> = LazyLock::new(|| {
    let table: [(&str, fn(&str) -> bool); 4] = [
        (r"\b\d{4,6}\b", any),
        (r"\d{3}\s?\d{3}", any),
        // Mixed codes like "AB12CD"; plain words are left to the last pattern.
        (r"\b[A-Za-z0-9]{4,12}\b", has_digit),
        (r"[\w-]{4,12}", any),
    ];
    table
        .into_iter()
        .map(|(p, accept)| OtpPattern {
            re: Regex::new(p).expect("static OTP pattern"),
            accept,
        })
        .collect()
});

/// Return the first OTP-looking token in `text`, or [`OTP_NOT_FOUND`].
pub fn extract_otp(text: &str) -> &str {
    OTP_PATTERNS
        .iter()
        .find_map(|p| p.re.find_iter(text).find(|m| (p.accept)(m.as_str())))
        .map(|m| m.as_str())
        .unwrap_or(OTP_NOT_FOUND)
}
