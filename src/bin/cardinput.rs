//! CLI tool for exercising the card form.
//!
//! # Usage
//!
//! ```bash
//! # Format input the way a field would display it
//! cardinput format number 371449635398431
//! cardinput format expiry 1225
//!
//! # Validate a single value
//! cardinput number 4242424242424242
//! cardinput expiry 12/25
//! cardinput cvc 1234 --brand amex
//! cardinput zip 90210
//!
//! # Detect a brand from a partial number
//! cardinput detect 3714
//!
//! # Type a whole card into a form, one key at a time
//! cardinput simulate --number 4242424242424242 --expiry 1229 --cvc 123 --zip 90210
//!
//! # Verbose form logs
//! RUST_LOG=card_field=debug cardinput simulate --number 4242424242424242
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use card_field::{
    detect, expiry, format, mask, validate, CardBrand, CardForm, Clock, ConfigError, EditKind,
    FieldId, FormConfig, Key, KeyOutcome, KeyPress, SystemClock,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardinput")]
#[command(author, version, about = "Payment card form field tool")]
struct Cli {
    /// JSON form configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a value as a field would display it
    Format {
        /// Which field's formatter to use
        field: FieldArg,

        /// Raw input
        value: String,
    },

    /// Validate a card number
    Number {
        /// Card number (spaces and dashes allowed)
        card_number: String,
    },

    /// Validate an expiry date against the current month
    Expiry {
        /// Expiry date (MM/YY, MM/YYYY, MMYY, ...)
        date: String,
    },

    /// Validate a CVC
    Cvc {
        /// Security code
        cvc: String,

        /// Card brand (sets the expected length)
        #[arg(short, long)]
        brand: Option<String>,
    },

    /// Validate a postal code
    Zip {
        /// Postal code
        zip: String,
    },

    /// Detect card brand from a (partial) number
    Detect {
        /// Card number prefix
        card_number: String,
    },

    /// Type values into a form one key at a time
    Simulate {
        /// Card number to type
        #[arg(long, default_value = "")]
        number: String,

        /// Expiry to type
        #[arg(long, default_value = "")]
        expiry: String,

        /// CVC to type
        #[arg(long, default_value = "")]
        cvc: String,

        /// Postal code to type (enables the postal field)
        #[arg(long)]
        zip: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Number,
    Expiry,
    Cvc,
    Zip,
}

impl From<FieldArg> for FieldId {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Number => FieldId::Number,
            FieldArg::Expiry => FieldId::Expiry,
            FieldArg::Cvc => FieldId::Cvc,
            FieldArg::Zip => FieldId::Zip,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ok = match cli.command {
        Commands::Format { field, value } => cmd_format(field.into(), &value, &config),
        Commands::Number { card_number } => cmd_number(&card_number, &config, cli.output),
        Commands::Expiry { date } => cmd_expiry(&date, &config, cli.output),
        Commands::Cvc { cvc, brand } => cmd_cvc(&cvc, brand.as_deref(), &config, cli.output),
        Commands::Zip { zip } => cmd_zip(&zip, &config, cli.output),
        Commands::Detect { card_number } => cmd_detect(&card_number),
        Commands::Simulate {
            number,
            expiry,
            cvc,
            zip,
        } => cmd_simulate(config, &number, &expiry, &cvc, zip.as_deref()),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<FormConfig, ConfigError> {
    match path {
        Some(path) => FormConfig::from_file(path),
        None => Ok(FormConfig::default()),
    }
}

fn report(output: OutputFormat, valid: bool, detail: serde_json::Value, error: Option<&str>) {
    match output {
        OutputFormat::Text => {
            println!("Valid: {}", if valid { "yes" } else { "no" });
            if let serde_json::Value::Object(map) = &detail {
                for (key, value) in map {
                    match value {
                        serde_json::Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
            if let Some(error) = error {
                println!("Error: {}", error);
            }
        }
        OutputFormat::Json => {
            let mut body = serde_json::json!({ "valid": valid });
            if let (serde_json::Value::Object(body), serde_json::Value::Object(detail)) =
                (&mut body, detail)
            {
                body.extend(detail);
                if let Some(error) = error {
                    body.insert("error".to_string(), error.into());
                }
            }
            println!("{}", body);
        }
    }
}

fn cmd_format(field: FieldId, value: &str, config: &FormConfig) -> bool {
    let formatted = match field {
        FieldId::Number => {
            let table = match config.card_types() {
                Ok(table) => table,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return false;
                }
            };
            let brand = detect::detect_brand_str(value);
            format::format_card_number_for(value, table.rule_for(brand))
        }
        FieldId::Expiry => format::format_expiry(value),
        FieldId::Cvc => format::format_cvc(value, format::CVC_MAX_LENGTH),
        FieldId::Zip => format::format_zip(value, config.zip_numeric_only),
    };
    println!("{}", formatted);
    true
}

fn cmd_number(card_number: &str, config: &FormConfig, output: OutputFormat) -> bool {
    let table = match config.card_types() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };
    let valid = validate::validate_card_number_with(card_number, &table);
    let brand = detect::detect_brand_str(card_number);
    let detail = serde_json::json!({
        "brand": brand.map(|b| b.name()).unwrap_or("Unknown"),
        "masked": mask::mask_digits(card_number),
    });
    let error = (!valid).then_some(config.labels.invalid_card_number.as_str());
    report(output, valid, detail, error);
    valid
}

fn cmd_expiry(date: &str, config: &FormConfig, output: OutputFormat) -> bool {
    let today = SystemClock.today();
    match expiry::validate_expiry(date, today) {
        Ok(date) => {
            let detail = serde_json::json!({
                "month": date.month,
                "year": date.year,
                "formatted": date.to_string(),
            });
            report(output, true, detail, None);
            true
        }
        Err(e) => {
            let message = config.labels.expiry_error.message(e);
            report(output, false, serde_json::json!({}), Some(message));
            false
        }
    }
}

fn cmd_cvc(cvc: &str, brand: Option<&str>, config: &FormConfig, output: OutputFormat) -> bool {
    let brand = match brand.map(|b| CardBrand::from_name(b).ok_or(b)) {
        Some(Ok(brand)) => Some(brand),
        Some(Err(name)) => {
            eprintln!("Error: Unknown brand: {}", name);
            return false;
        }
        None => None,
    };
    let table = match config.card_types() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };

    let valid = validate::validate_cvc_with(cvc, brand, &table);
    let detail = serde_json::json!({ "expected_length": table.cvc_length(brand) });
    let error = (!valid).then_some(config.labels.invalid_cvc.as_str());
    report(output, valid, detail, error);
    valid
}

fn cmd_zip(zip: &str, config: &FormConfig, output: OutputFormat) -> bool {
    let valid = validate::is_zip_valid(zip);
    let error = (!valid).then_some(config.labels.invalid_zip_code.as_str());
    report(output, valid, serde_json::json!({}), error);
    valid
}

fn cmd_detect(card_number: &str) -> bool {
    if format::strip_formatting(card_number).is_empty() {
        eprintln!("Error: No digits provided");
        return false;
    }

    match detect::detect_brand_str(card_number) {
        Some(b) => {
            println!("Detected Brand: {}", b.name());
            println!("Valid Lengths: {:?}", b.valid_lengths());
            println!("CVC Length: {}", b.cvc_length());
        }
        None => println!("Detected Brand: Unknown"),
    }
    true
}

fn cmd_simulate(
    mut config: FormConfig,
    number: &str,
    expiry: &str,
    cvc: &str,
    zip: Option<&str>,
) -> bool {
    if zip.is_some() {
        config.enable_zip_input = true;
    }
    let zip_enabled = config.enable_zip_input;

    let mut form = match CardForm::new(config) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("Error: {}", e);
            return false;
        }
    };
    form.on_error(|field, message| println!("  [{}] error: {}", field, message));

    for field in FieldId::ALL {
        if field == FieldId::Zip && !zip_enabled {
            continue;
        }
        form.mount(field, None, move |ev| println!("  -> focus {}", ev.0));
    }

    let inputs = [
        (FieldId::Number, number),
        (FieldId::Expiry, expiry),
        (FieldId::Cvc, cvc),
        (FieldId::Zip, zip.unwrap_or("")),
    ];

    for (field, text) in inputs {
        if text.is_empty() {
            continue;
        }
        if field == FieldId::Zip && !form.view().postal_field_visible {
            println!("{}: hidden, skipped", field);
            continue;
        }

        println!("{}:", field);
        form.focus(field);
        let mut current = String::new();
        for c in text.chars() {
            if form.key_press(field, KeyPress::new(Key::Char(c))) == KeyOutcome::Suppress {
                println!("  '{}' suppressed", c);
                continue;
            }
            current.push(c);
            if let Some(shown) = form.change(field, &current, EditKind::Insert) {
                println!("  {:<22} (typed {:?})", shown, c);
                current = shown;
            }
        }
        form.blur(field);
    }

    let view = form.view();
    println!();
    println!("Card image: {}", view.card_image);
    println!("Postal field: {}", if view.postal_field_visible { "shown" } else { "hidden" });
    match view.active_error_message {
        Some(message) => println!("Error: {}", message),
        None => println!("Error: none"),
    }

    let complete = form.is_complete();
    println!("Complete: {}", if complete { "yes" } else { "no" });
    complete
}
