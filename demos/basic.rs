//! Basic card form example.
//!
//! Run with: `cargo run --example basic`

use std::cell::RefCell;
use std::rc::Rc;

use card_field::{
    format, validate, CardForm, EditKind, FieldCallbacks, FieldId, FormConfig, Key,
};

fn main() {
    println!("=== Card Form Walkthrough ===\n");

    let mut config = FormConfig::default();
    config.enable_zip_input = true;

    let mut form = match CardForm::new(config) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    // Focus requests land here instead of a real DOM
    let focus_log = Rc::new(RefCell::new(Vec::new()));
    for field in FieldId::ALL {
        let log = Rc::clone(&focus_log);
        form.mount(field, None, move |ev| log.borrow_mut().push(ev.0));
    }

    form.set_callbacks(
        FieldId::Cvc,
        FieldCallbacks::new().on_error(|message| println!("  cvc error: {}", message)),
    );

    // Example 1: typing a Visa number reveals the postal field and advances
    println!("Typing a card number:");
    let mut value = String::new();
    for c in "4242424242424242".chars() {
        value.push(c);
        if let Some(shown) = form.change(FieldId::Number, &value, EditKind::Insert) {
            value = shown;
        }
    }
    let view = form.view();
    println!("  Display: {}", value);
    println!("  Image: {}", view.card_image);
    println!("  Postal field: {}", view.postal_field_visible);
    println!("  Focus moved to: {:?}", focus_log.borrow().last());
    println!();

    // Example 2: expiry in the past
    println!("Entering an expired date:");
    form.change(FieldId::Expiry, "01/20", EditKind::Insert);
    println!("  Error: {:?}", form.view().active_error_message);
    println!();

    // Example 3: deleting back to an empty field moves focus back
    println!("Deleting the expiry:");
    form.change(FieldId::Expiry, "", EditKind::Delete);
    form.key_down(FieldId::Expiry, Key::Backspace);
    println!("  Focus moved to: {:?}", focus_log.borrow().last());
    println!();

    // Example 4: a four-digit CVC for a Visa card
    println!("Entering a CVC:");
    form.change(FieldId::Cvc, "1234", EditKind::Insert);
    println!();

    // Standalone helpers
    println!("Helpers:");
    println!(
        "  format_card_number: {}",
        format::format_card_number("5555555555554444")
    );
    println!("  format_expiry: {}", format::format_expiry("4"));
    println!(
        "  validate_card_number: {}",
        validate::validate_card_number("4242 4242 4242 4241")
    );
    println!("  is_zip_valid: {}", validate::is_zip_valid("K1A 0B1"));
}
