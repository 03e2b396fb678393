//! Dial-prefix → country label lookup.

use std::sync::LazyLock;

pub const UNKNOWN_COUNTRY: &str = "Unknown 🌍";

/// Known dial prefixes.  Lookup is longest-prefix-first; among equal lengths
/// the entry listed earlier wins.
const COUNTRY_PREFIXES: &[(&str, &str)] = &[
    ("1", "USA 🇺🇸"),
    ("377", "Monaco 🇲🇨"),
    ("20", "Egypt 🇪🇬"),
    ("228", "Togo 🇹🇬"),
    ("58", "Venezuela 🇻🇪"),
    ("216", "Tunisia 🇹🇳"),
    ("218", "Libya 🇱🇾"),
    ("880", "Bangladesh 🇧🇩"),
    ("91", "India 🇮🇳"),
    ("92", "Pakistan 🇵🇰"),
    ("963", "Syria 🇸🇾"),
    ("964", "Iraq 🇮🇶"),
    ("970", "Palestine 🇵🇸"),
    ("971", "UAE 🇦🇪"),
    ("972", "Israel 🇮🇱"),
    ("973", "Bahrain 🇧🇭"),
    ("974", "Qatar 🇶🇦"),
    ("966", "Saudi Arabia 🇸🇦"),
];

// Stable sort keeps table order for equal-length prefixes.
static BY_LENGTH: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    let mut table = COUNTRY_PREFIXES.to_vec();
    table.sort_by_key(|(prefix, _)| std::cmp::Reverse(prefix.len()));
    table
});

/// Resolve the country label for a phone number.  A leading `+` and
/// surrounding whitespace are ignored.
pub fn detect_country(number: &str) -> &'static str {
    let digits = number.trim().trim_start_matches('+');
    BY_LENGTH
        .iter()
        .find(|(prefix, _)| digits.starts_with(prefix))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_COUNTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(detect_country("971501234567"), "UAE 🇦🇪");
        assert_eq!(detect_country("8801712345678"), "Bangladesh 🇧🇩");
        assert_eq!(detect_country("966512345678"), "Saudi Arabia 🇸🇦");
    }

    #[test]
    fn single_digit_prefix_matches_when_nothing_longer_does() {
        assert_eq!(detect_country("12025550123"), "USA 🇺🇸");
    }

    #[test]
    fn two_digit_prefixes() {
        assert_eq!(detect_country("201001234567"), "Egypt 🇪🇬");
        assert_eq!(detect_country("919876543210"), "India 🇮🇳");
    }

    #[test]
    fn unmatched_number_is_unknown() {
        assert_eq!(detect_country("447911123456"), UNKNOWN_COUNTRY);
        assert_eq!(detect_country(""), UNKNOWN_COUNTRY);
    }

    #[test]
    fn plus_sign_is_ignored() {
        assert_eq!(detect_country("+97455123456"), "Qatar 🇶🇦");
    }

    #[test]
    fn table_is_ordered_longest_first() {
        let lens: Vec<usize> = BY_LENGTH.iter().map(|(p, _)| p.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        // Equal-length entries keep their declared order.
        let three: Vec<&str> = BY_LENGTH
            .iter()
            .filter(|(p, _)| p.len() == 3)
            .map(|(p, _)| *p)
            .collect();
        assert_eq!(&three[..3], &["377", "228", "216"]);
    }
}
