//! WebAssembly bindings for the card form.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { CardFormHandle, format_card_number } from 'card_field';
//!
//! await init();
//!
//! const form = new CardFormHandle('{"enable_zip_input": true}');
//! form.mount("number", null, () => numberInput.focus());
//! form.mount("expiry", null, () => expiryInput.focus());
//!
//! numberInput.addEventListener("keypress", (e) => {
//!     const hasSelection = numberInput.selectionStart !== numberInput.selectionEnd;
//!     if (!form.key_press("number", e.key, hasSelection)) e.preventDefault();
//! });
//! numberInput.addEventListener("input", (e) => {
//!     const deleting = e.inputType.startsWith("delete");
//!     numberInput.value = form.change("number", numberInput.value, deleting);
//!     cardImage.src = images[form.card_image];
//! });
//! ```

#![cfg(feature = "wasm")]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::controller::{EditKind, Key, KeyOutcome, KeyPress};
use crate::focus::FieldId;
use crate::{CardForm, FormConfig};

fn parse_field(field: &str) -> Result<FieldId, JsValue> {
    FieldId::from_id(field).ok_or_else(|| JsValue::from_str(&format!("Unknown field: {}", field)))
}

/// A card form driven from JavaScript.
///
/// Focus requests are queued while the form is borrowed and delivered to
/// the registered callbacks once the call returns, so a callback may call
/// back into the handle.
#[wasm_bindgen]
pub struct CardFormHandle {
    form: RefCell<CardForm>,
    pending: Rc<RefCell<Vec<FieldId>>>,
    focus_callbacks: RefCell<HashMap<FieldId, js_sys::Function>>,
}

#[wasm_bindgen]
impl CardFormHandle {
    /// Creates a form from an optional JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<CardFormHandle, JsValue> {
        let config = match config_json {
            Some(json) => {
                FormConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => FormConfig::default(),
        };
        let form = CardForm::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            form: RefCell::new(form),
            pending: Rc::new(RefCell::new(Vec::new())),
            focus_callbacks: RefCell::new(HashMap::new()),
        })
    }

    /// Mounts a field. `on_focus` is called with no arguments whenever the
    /// form wants this field focused.
    pub fn mount(
        &self,
        field: &str,
        initial: Option<String>,
        on_focus: js_sys::Function,
    ) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.focus_callbacks.borrow_mut().insert(field, on_focus);

        let pending = Rc::clone(&self.pending);
        self.form
            .borrow_mut()
            .mount(field, initial.as_deref(), move |ev| pending.borrow_mut().push(ev.0));
        Ok(())
    }

    /// Unmounts a field and forgets its focus callback.
    pub fn unmount(&self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.form.borrow_mut().unmount(field);
        self.focus_callbacks.borrow_mut().remove(&field);
        Ok(())
    }

    /// Returns false if the key press should be prevented.
    pub fn key_press(&self, field: &str, key: &str, has_selection: bool) -> Result<bool, JsValue> {
        let field = parse_field(field)?;
        let press = KeyPress {
            key: Key::from_dom(key),
            has_selection,
        };
        Ok(self.form.borrow().key_press(field, press) == KeyOutcome::Accept)
    }

    /// Handles an input event and returns the text to put back in the input.
    pub fn change(&self, field: &str, value: &str, deleting: bool) -> Result<String, JsValue> {
        let field = parse_field(field)?;
        let edit = if deleting {
            EditKind::Delete
        } else {
            EditKind::Insert
        };
        let shown = self.form.borrow_mut().change(field, value, edit);
        self.flush_focus();
        Ok(shown.unwrap_or_else(|| value.to_string()))
    }

    /// Handles a blur event.
    pub fn blur(&self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.form.borrow_mut().blur(field);
        self.flush_focus();
        Ok(())
    }

    /// Handles a keydown event.
    pub fn key_down(&self, field: &str, key: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.form.borrow_mut().key_down(field, Key::from_dom(key));
        self.flush_focus();
        Ok(())
    }

    /// Handles a focus event.
    pub fn focus(&self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field)?;
        self.form.borrow_mut().focus(field);
        Ok(())
    }

    /// Image key for the detected brand.
    #[wasm_bindgen(getter)]
    pub fn card_image(&self) -> String {
        self.form.borrow().view().card_image
    }

    /// Whether the postal input should be rendered.
    #[wasm_bindgen(getter)]
    pub fn postal_field_visible(&self) -> bool {
        self.form.borrow().view().postal_field_visible
    }

    /// Current error text, if any.
    #[wasm_bindgen(getter)]
    pub fn error_message(&self) -> Option<String> {
        self.form.borrow().view().active_error_message
    }

    /// Detected brand name, if any.
    #[wasm_bindgen(getter)]
    pub fn detected_brand(&self) -> Option<String> {
        self.form
            .borrow()
            .detected_brand()
            .map(|b| b.name().to_string())
    }

    /// True once every mounted field holds a valid value.
    #[wasm_bindgen(getter)]
    pub fn is_complete(&self) -> bool {
        self.form.borrow().is_complete()
    }
}

impl CardFormHandle {
    fn flush_focus(&self) {
        drain_focus(&self.pending, &self.focus_callbacks, |callback| {
            callback.call0(&JsValue::NULL).map(|_| ())
        });
    }
}

/// Runs the callback of every queued field. Returns how many calls failed.
fn drain_focus<C, E, F>(
    pending: &RefCell<Vec<FieldId>>,
    callbacks: &RefCell<HashMap<FieldId, C>>,
    mut call: F,
) -> usize
where
    C: Clone,
    E: std::fmt::Debug,
    F: FnMut(&C) -> Result<(), E>,
{
    let queued: Vec<FieldId> = pending.borrow_mut().drain(..).collect();
    let mut failed = 0;
    for field in queued {
        let callback = callbacks.borrow().get(&field).cloned();
        if let Some(callback) = callback {
            if let Err(err) = call(&callback) {
                debug!(field = %field, error = ?err, "focus callback threw");
                failed += 1;
            }
        }
    }
    failed
}

/// Formats a card number with the grouping of its detected brand.
#[wasm_bindgen]
pub fn format_card_number(input: &str) -> String {
    let table = crate::table::CardTypeTable::default();
    let brand = crate::detect::detect_brand_str(input);
    crate::format::format_card_number_for(input, table.rule_for(brand))
}

/// Formats expiry input as `MM / YY`.
#[wasm_bindgen]
pub fn format_expiry(input: &str) -> String {
    crate::format::format_expiry(input)
}

/// Detects the card brand from a (partial) card number.
#[wasm_bindgen]
pub fn detect_brand(input: &str) -> Option<String> {
    crate::detect::detect_brand_str(input).map(|b| b.name().to_string())
}

/// Masks a card number, keeping the last four digits.
#[wasm_bindgen]
pub fn mask_card_number(input: &str) -> String {
    crate::mask::mask_digits(input)
}
