//! Tests for identifier sanitization

use super::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use test_case::test_case;

fn map(headers: &[&str]) -> HashMap<String, String> {
    prep_headers(headers.iter().map(Some))
}

fn expected(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// prep_headers
// ============================================================================

#[test]
fn test_prep_headers_cleans() {
    let result = map(&[
        "first name",
        "last-name",
        "email@address.com",
        "123Start",
        "!@#$%^&*()",
    ]);
    assert_eq!(
        result,
        expected(&[
            ("first name", "first_name"),
            ("last-name", "last_name"),
            ("email@address.com", "email_address_com"),
            ("123Start", "_123Start"),
            ("!@#$%^&*()", "__________"),
        ])
    );
}

#[test]
fn test_prep_headers_numerics() {
    assert_eq!(
        map(&["123", "4567", "890"]),
        expected(&[("123", "_123"), ("4567", "_4567"), ("890", "_890")])
    );
}

#[test]
fn test_prep_headers_max_length() {
    let a = "a".repeat(301);
    let b = "b".repeat(302);
    let result = map(&[&a, &b]);
    assert_eq!(result[&a], "a".repeat(300));
    assert_eq!(result[&b], "b".repeat(300));
}

#[test]
fn test_prep_headers_case_sensitive() {
    assert_eq!(
        map(&["Name", "NAME", "name"]),
        expected(&[("Name", "Name"), ("NAME", "NAME"), ("name", "name")])
    );
}

#[test]
fn test_prep_headers_unicode_and_emoji() {
    assert_eq!(
        map(&["naïve", "résumé", "🚀Launch", "Profit💰", "✈️Travel"]),
        expected(&[
            ("naïve", "na_ve"),
            ("résumé", "r_sum_"),
            ("🚀Launch", "__Launch"),
            ("Profit💰", "Profit__"),
            ("✈️Travel", "__Travel"),
        ])
    );
}

#[test]
fn test_prep_headers_sql_characters() {
    assert_eq!(
        map(&["select*", "from?", "100%Guaranteed"]),
        expected(&[
            ("select*", "select_"),
            ("from?", "from_"),
            ("100%Guaranteed", "_100_Guaranteed"),
        ])
    );
}

#[test]
fn test_prep_headers_empty_input() {
    assert!(map(&[]).is_empty());
}

#[test]
fn test_prep_headers_null_and_empty() {
    let result = prep_headers(vec![None, Some(""), Some("ok")]);
    assert_eq!(
        result,
        expected(&[
            ("null", "null"),
            ("empty_index_1", "empty_index_1"),
            ("ok", "ok")
        ])
    );
}

#[test]
fn test_prep_headers_duplicates_last_write_wins() {
    assert_eq!(map(&["name", "name"]), expected(&[("name", "name_2")]));
    // A counter kept per raw header would stop at name_2 here. Suffixes are
    // checked against every generated name, so the third copy gets name_3
    // and the pair form stays collision-free.
    assert_eq!(map(&["name", "name", "name"]), expected(&[("name", "name_3")]));
}

#[test]
fn test_prep_headers_distinct_originals_colliding() {
    assert_eq!(
        map(&["a b", "a-b", "a_b"]),
        expected(&[("a b", "a_b"), ("a-b", "a_b_2"), ("a_b", "a_b_3")])
    );
}

// ============================================================================
// prep_header_pairs
// ============================================================================

#[test]
fn test_prep_header_pairs_basic() {
    assert_eq!(
        prep_header_pairs(["first name", "last-name"].map(Some)),
        vec![
            ("first name".to_string(), "first_name".to_string()),
            ("last-name".to_string(), "last_name".to_string()),
        ]
    );
}

#[test]
fn test_prep_header_pairs_keeps_every_occurrence() {
    let pairs = prep_header_pairs(["name", "name", "name"].map(Some));
    let clean: Vec<_> = pairs.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(clean, vec!["name", "name_2", "name_3"]);
}

#[test]
fn test_prep_header_pairs_suffix_skips_taken_names() {
    let pairs = prep_header_pairs(["name_2", "name", "name"].map(Some));
    let clean: Vec<_> = pairs.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(clean, vec!["name_2", "name", "name_3"]);
}

#[test]
fn test_prep_header_pairs_detailed() {
    let pairs = prep_header_pairs(["name", "NAME", "name_1"].map(Some));
    let clean: Vec<_> = pairs.iter().map(|(_, c)| c.as_str()).collect();
    assert_eq!(clean, vec!["name", "NAME", "name_1"]);
}

#[test]
fn test_prep_header_pairs_suffix_fits_max_length() {
    let long = "x".repeat(400);
    let pairs = prep_header_pairs([long.as_str(), long.as_str()].map(Some));
    assert_eq!(pairs[0].1.len(), MAX_IDENT_LEN);
    assert_eq!(pairs[1].1.len(), MAX_IDENT_LEN);
    assert!(pairs[1].1.ends_with("_2"));
    assert_ne!(pairs[0].1, pairs[1].1);
}

// ============================================================================
// clean_name
// ============================================================================

#[test_case("first name", "first_name" ; "space")]
#[test_case("last-name", "last_name" ; "dash")]
#[test_case("email@address.com", "email_address_com" ; "email")]
#[test_case("123Start", "start" ; "leading digits")]
#[test_case("1stPlace", "stplace" ; "ordinal")]
#[test_case("100%Guaranteed", "guaranteed" ; "digits and symbol")]
#[test_case("🚀Launch", "launch" ; "leading emoji")]
#[test_case("Profit💰", "profit" ; "trailing emoji")]
#[test_case("!@#$%^&*()", "db_" ; "only symbols")]
#[test_case("", "db_" ; "empty")]
#[test_case("select", "db_select" ; "reserved select")]
#[test_case("TABLE", "db_table" ; "reserved upper")]
#[test_case("select*", "db_select" ; "reserved after strip")]
#[test_case("from?", "from" ; "not reserved")]
#[test_case("ab", "db_ab" ; "too short")]
#[test_case("name______domain", "name_domain" ; "underscore run")]
#[test_case("user!!!profile", "user_profile" ; "symbol run")]
#[test_case("Name", "name" ; "lower case")]
#[test_case("XMLHttpRequest", "xmlhttprequest" ; "camel case")]
#[test_case("résumé", "r_sum" ; "accents")]
#[test_case("hello_world", "hello_world" ; "already clean")]
fn test_clean_name(input: &str, expected: &str) {
    assert_eq!(clean_name(Some(input)), expected);
}

#[test]
fn test_clean_name_max_length() {
    let long = "a".repeat(310);
    assert_eq!(clean_name(Some(&long)).len(), MAX_IDENT_LEN);
}

#[test]
fn test_clean_name_missing() {
    let a = clean_name(None);
    let b = clean_name(None);
    assert!(a.starts_with("db_unknown_"));
    assert_eq!(a.len(), "db_unknown_".len() + 8);
    assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    assert_ne!(a, b);
}
