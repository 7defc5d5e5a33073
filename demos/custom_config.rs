//! Loading a form configuration from JSON.
//!
//! Run with: `cargo run --example custom_config --features serde`

use card_field::{CardBrand, CardForm, EditKind, FieldId, FormConfig};

const CONFIG: &str = r#"{
    "enable_zip_input": true,
    "zip_numeric_only": false,
    "brand_overrides": {
        "visa": { "lengths": [16], "grouping": [4, 4, 4, 4] },
        "amex": { "cvc_length": 4 }
    },
    "images": {
        "brands": { "visa": "/img/visa.svg", "amex": "/img/amex.svg" },
        "placeholder": "/img/card.svg"
    },
    "labels": {
        "invalid_card_number": "Numero de tarjeta invalido",
        "invalid_cvc": "CVC invalido",
        "expiry_error": { "year_out_of_range": "La tarjeta ha vencido" }
    }
}"#;

fn main() {
    println!("=== Custom Configuration ===\n");

    let config = match FormConfig::from_json(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };

    let mut form = match CardForm::new(config) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };
    form.on_error(|field, message| println!("  [{}] {}", field, message));

    for field in FieldId::ALL {
        form.mount(field, None, |_| {});
    }

    println!("Visa limited to 16 digits:");
    let shown = form.change(FieldId::Number, "4242424242424242424", EditKind::Insert);
    println!("  Display: {:?}", shown);
    println!("  Image: {}", form.view().card_image);
    println!();

    println!("Expired card:");
    form.change(FieldId::Expiry, "03/19", EditKind::Insert);
    println!();

    println!("Unknown brand falls back to the placeholder image:");
    form.change(FieldId::Number, "9999", EditKind::Insert);
    println!("  Brand: {:?}", form.detected_brand());
    println!("  Image: {}", form.view().card_image);
    println!();

    println!("Rules in effect:");
    for brand in [CardBrand::Visa, CardBrand::Amex] {
        if let Some(rule) = form.card_types().rule(brand) {
            println!(
                "  {}: lengths {:?}, cvc {}",
                brand, rule.lengths, rule.cvc_length
            );
        }
    }
}
