//! Fuzz target for the field validators.

#![no_main]

use card_field::{detect, luhn, mask, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = validate::validate_cvc(data, None);
    let _ = validate::is_zip_valid(data);
    let _ = detect::detect_brand_str(data);
    let _ = luhn::validate_str(data);

    if validate::validate_card_number(data) {
        assert!(detect::detect_brand_str(data).is_some());
        assert!(luhn::validate_str(data));
    }

    let masked = mask::mask_digits(data);
    assert_eq!(masked.chars().count(), data.chars().count());
});
