//! Shared identifier types

/// Primary key of a book record
pub type Id = i64;

/// Parse a path segment into an [`Id`].
///
/// Leading whitespace and an optional sign are skipped and the leading run of
/// digits is used, so `"12abc"` is `12`. A segment with no leading digits
/// yields `None`, which callers treat as an unknown record.
pub fn parse_id(raw: &str) -> Option<Id> {
    let s = raw.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: Id = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("1763824855752"), Some(1_763_824_855_752));
        assert_eq!(parse_id(" 12"), Some(12));
        assert_eq!(parse_id("1abc"), Some(1));
        assert_eq!(parse_id("1.5"), Some(1));
        assert_eq!(parse_id("-3"), Some(-3));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-"), None);
        assert_eq!(parse_id(""), None);
    }
}
