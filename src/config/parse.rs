//! Lenient value parsing for settings.
//!
//! Settings values are free-form strings. These helpers accept surrounding
//! whitespace and, for booleans, any letter case.

/// Parse an `i32`, or `None` if absent or not a number.
pub fn parse_i32(value: Option<&str>) -> Option<i32> {
    value?.trim().parse().ok()
}

/// Parse a `u16`, or `None` if absent or out of range.
pub fn parse_u16(value: Option<&str>) -> Option<u16> {
    value?.trim().parse().ok()
}

/// Parse `true`/`false` in any letter case, or `None` for anything else.
pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    let value = value?.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i32() {
        assert_eq!(parse_i32(Some("3")), Some(3));
        assert_eq!(parse_i32(Some(" -12 ")), Some(-12));
        assert_eq!(parse_i32(Some("+7")), Some(7));
        assert_eq!(parse_i32(Some("1.5")), None);
        assert_eq!(parse_i32(Some("")), None);
        assert_eq!(parse_i32(Some("99999999999")), None);
        assert_eq!(parse_i32(None), None);
    }

    #[test]
    fn test_parse_u16() {
        assert_eq!(parse_u16(Some("1433")), Some(1433));
        assert_eq!(parse_u16(Some("70000")), None);
        assert_eq!(parse_u16(Some("-1")), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(Some("true")), Some(true));
        assert_eq!(parse_bool(Some("True")), Some(true));
        assert_eq!(parse_bool(Some(" FALSE ")), Some(false));
        assert_eq!(parse_bool(Some("1")), None);
        assert_eq!(parse_bool(Some("yes")), None);
        assert_eq!(parse_bool(None), None);
    }
}
