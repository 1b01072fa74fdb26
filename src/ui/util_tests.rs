#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Bakı", 10), "Bakı");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("Quba", 4), "Quba");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Lənkəran", 5), "Lənk…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("Şəki", 0), "");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("Gəncə", 1), "…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.5), "AZN"), "1,234.50 AZN");
}

#[test]
fn test_format_amount_no_commas() {
    assert_eq!(format_amount(dec!(999.99), "AZN"), "999.99 AZN");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0), "AZN"), "0.00 AZN");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50), "AZN"), "-42.50 AZN");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(10000000), "USD"), "10,000,000.00 USD");
}

#[test]
fn test_format_amount_without_label() {
    assert_eq!(format_amount(dec!(1500), ""), "1,500.00");
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("600"), Some(dec!(600)));
    assert_eq!(parse_amount(" 12.75 "), Some(dec!(12.75)));
}

#[test]
fn test_parse_amount_thousands() {
    assert_eq!(parse_amount("1,234.50"), Some(dec!(1234.50)));
    assert_eq!(parse_amount("1_000"), Some(dec!(1000)));
}

#[test]
fn test_parse_amount_rejects_garbage() {
    assert_eq!(parse_amount(""), None);
    assert_eq!(parse_amount("abc"), None);
    assert_eq!(parse_amount("12.3.4"), None);
}

// ── split_item_args ───────────────────────────────────────────

#[test]
fn test_split_item_args_multiword_name() {
    let (number, name, amount) = split_item_args("02 Road repairs north 1,500").unwrap();
    assert_eq!(number, "02");
    assert_eq!(name, "Road repairs north");
    assert_eq!(amount, dec!(1500));
}

#[test]
fn test_split_item_args_single_word_name() {
    let (number, name, amount) = split_item_args("01 Schools 250.5").unwrap();
    assert_eq!((number.as_str(), name.as_str()), ("01", "Schools"));
    assert_eq!(amount, dec!(250.5));
}

#[test]
fn test_split_item_args_too_few_parts() {
    assert!(split_item_args("01").is_err());
    assert!(split_item_args("01 600").is_err());
    assert!(split_item_args("").is_err());
}

#[test]
fn test_split_item_args_bad_amount() {
    let err = split_item_args("01 Roads lots").unwrap_err();
    assert!(err.contains("lots"));
}

// ── progress_bar ──────────────────────────────────────────────

#[test]
fn test_progress_bar_bounds() {
    assert_eq!(progress_bar(0.0, 4), "[░░░░]");
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(3.0, 4), "[████]");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_and_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (8, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}
