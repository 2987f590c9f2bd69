//! Property-based tests for address-bar normalization.

use banana_studio::managers::navigation_sync::normalize_address;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("example.com", "https://example.com")]
#[case("  example.com  ", "https://example.com")]
#[case("http://example.com", "http://example.com")]
#[case("https://example.com/path?q=1", "https://example.com/path?q=1")]
#[case("HTTPS://EXAMPLE.COM", "HTTPS://EXAMPLE.COM")]
#[case("localhost:8080", "https://localhost:8080")]
#[case("ftp://files.test", "https://ftp://files.test")]
fn test_known_addresses(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_address(input).as_deref(), Some(expected));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn test_blank_addresses(#[case] input: &str) {
    assert_eq!(normalize_address(input), None);
}

proptest! {
    /// Every non-blank input normalizes to an http(s) URL.
    #[test]
    fn prop_result_has_web_scheme(input in "[ ]{0,3}[a-zA-Z0-9./:?=_-]{1,40}[ ]{0,3}") {
        let url = normalize_address(&input).unwrap();
        let lower = url.to_ascii_lowercase();
        prop_assert!(lower.starts_with("http://") || lower.starts_with("https://"));
    }

    /// Normalizing an already normalized address changes nothing.
    #[test]
    fn prop_idempotent(input in "[a-zA-Z0-9./:?=_-]{1,40}") {
        let once = normalize_address(&input).unwrap();
        let twice = normalize_address(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Bare hosts get exactly `https://` prepended to the trimmed input.
    #[test]
    fn prop_bare_host_gets_https(host in "[a-z0-9-]{1,20}\\.[a-z]{2,6}") {
        prop_assert_eq!(normalize_address(&host), Some(format!("https://{}", host)));
    }
}
