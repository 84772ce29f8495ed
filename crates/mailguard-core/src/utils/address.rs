/// Recipient address normalization
use regex::Regex;
use std::sync::LazyLock;

// Greedy prefix, so the text after the last `<` wins; the closing `>` is optional
static ANGLE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^.*<([^<>]*)").unwrap());

/// Normalizes a recipient as SES reports it into the do-not-contact key
///
/// # Examples
/// ```
/// use mailguard_core::utils::address::normalize_address;
///
/// assert_eq!(normalize_address("Jane Doe <Jane@Example.com>"), "jane@example.com");
/// assert_eq!(normalize_address("  bob@example.com "), "bob@example.com");
/// ```
pub fn normalize_address(raw: &str) -> String {
    let address = match ANGLE_ADDRESS.captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()),
        None => raw,
    };

    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_form() {
        assert_eq!(normalize_address("Name <addr@example.com>"), "addr@example.com");
        assert_eq!(
            normalize_address("\"Doe, Jane\" <jane@example.com>"),
            "jane@example.com"
        );
    }

    #[test]
    fn test_plain_address() {
        assert_eq!(normalize_address("addr@example.com"), "addr@example.com");
        assert_eq!(normalize_address("ADDR@Example.COM"), "addr@example.com");
    }

    #[test]
    fn test_brackets_with_whitespace() {
        assert_eq!(normalize_address("Name < addr@example.com >"), "addr@example.com");
        assert_eq!(normalize_address("<addr@example.com>"), "addr@example.com");
    }

    #[test]
    fn test_unclosed_bracket() {
        assert_eq!(normalize_address("Name <a@example.com"), "a@example.com");
        assert_eq!(normalize_address("<Name> <a@example.com "), "a@example.com");
    }

    #[test]
    fn test_multiline_display_name() {
        assert_eq!(
            normalize_address("Very\nLong Name <addr@example.com> trailing"),
            "addr@example.com"
        );
    }
}
