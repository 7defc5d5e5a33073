//! Fuzz target for expiry parsing.

#![no_main]

use card_field::expiry::{self, ExpiryMessages, YearMonth};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let today = YearMonth::new(2024, 6);
    let messages = ExpiryMessages::default();

    let parsed = expiry::parse_expiry(data);
    let validated = expiry::validate_expiry(data, today);
    let _ = expiry::is_expiry_invalid(data, &messages, today);

    if let Ok(date) = validated {
        assert_eq!(parsed, Ok(date));
        assert!(date >= today);
        assert!((1..=12).contains(&date.month));
    }
});
