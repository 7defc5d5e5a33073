//! Fuzz target for the as-you-type formatters.
//!
//! Formatting must never panic and must be stable on its own output.

#![no_main]

use card_field::{format, CardBrand, CardBrandRule};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = format::strip_formatting(data);
    let _ = format::format_cvc(data, format::CVC_MAX_LENGTH);
    let _ = format::format_zip(data, true);
    let _ = format::format_zip(data, false);
    let _ = format::format_expiry_on_delete(data);

    let formatted = format::format_card_number(data);
    assert_eq!(format::format_card_number(&formatted), formatted);

    for brand in CardBrand::ALL {
        let rule = CardBrandRule::default_for(brand);
        let once = format::format_card_number_for(data, Some(&rule));
        assert!(format::strip_formatting(&once).len() <= rule.max_length());
    }

    let expiry = format::format_expiry(data);
    assert!(expiry.chars().filter(|c| c.is_ascii_digit()).count() <= 4);
});
