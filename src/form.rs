//! The card form: field slots, shared state and focus transport.
//!
//! [`CardForm`] owns one [`FieldState`] per mounted field and the shared
//! [`FormState`]. Every event handler follows the same sequence:
//!
//! 1. build a [`FieldContext`] snapshot of the shared state
//! 2. let the field's controller update its own state and return effects
//! 3. apply the effects through the reducer, fire error callbacks, then
//!    forward any focus request to the transport
//! 4. invoke the field's passthrough callback
//!
//! Siblings therefore only ever observe a handler's updates after it has
//! finished.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use card_field::{CardForm, EditKind, FieldId, FormConfig};
//!
//! let mut form = CardForm::new(FormConfig::default()).unwrap();
//! let focused = Rc::new(RefCell::new(Vec::new()));
//!
//! for field in [FieldId::Number, FieldId::Expiry, FieldId::Cvc] {
//!     let log = Rc::clone(&focused);
//!     form.mount(field, None, move |ev| log.borrow_mut().push(ev.0));
//! }
//!
//! let shown = form.change(FieldId::Number, "4242424242424242", EditKind::Insert);
//! assert_eq!(shown.as_deref(), Some("4242 4242 4242 4242"));
//! assert_eq!(*focused.borrow(), vec![FieldId::Expiry]);
//! assert_eq!(form.view().card_image, "visa");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::config::FormConfig;
use crate::controller::{
    controller_for, EditKind, Effects, FieldContext, FieldController, FieldProps, Key, KeyOutcome,
    KeyPress,
};
use crate::error::ConfigError;
use crate::expiry::{Clock, SystemClock};
use crate::focus::{FieldId, FocusBus, FocusRequested, FocusTransport};
use crate::mask::mask_digits;
use crate::state::{FieldState, FormAction, FormState};
use crate::table::CardTypeTable;
use crate::CardBrand;

type ValueCallback = Box<dyn FnMut(&str)>;
type FormErrorCallback = Box<dyn FnMut(FieldId, &str)>;

/// Passthrough callbacks for one field.
///
/// `on_change` and `on_blur` receive the field's display value after the
/// form has handled the event; `on_error` receives each error message the
/// field publishes.
#[derive(Default)]
pub struct FieldCallbacks {
    on_change: Option<ValueCallback>,
    on_blur: Option<ValueCallback>,
    on_error: Option<ValueCallback>,
}

impl FieldCallbacks {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every change.
    pub fn on_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Called after every blur.
    pub fn on_blur(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_blur = Some(Box::new(f));
        self
    }

    /// Called with each error the field publishes.
    pub fn on_error(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for FieldCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCallbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

struct FieldSlot {
    controller: Box<dyn FieldController>,
    state: FieldState,
}

/// What the presentation layer renders around the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    /// Image key for the detected brand.
    pub card_image: String,
    /// Whether to render the postal input.
    pub postal_field_visible: bool,
    /// Danger text, if any.
    pub active_error_message: Option<String>,
    /// Whether to draw the invalid styling.
    pub is_invalid: bool,
}

/// A payment card form.
///
/// Generic over the focus transport; [`FocusBus`] by default.
pub struct CardForm<T: FocusTransport = FocusBus> {
    config: FormConfig,
    table: CardTypeTable,
    state: FormState,
    transport: T,
    clock: Box<dyn Clock>,
    fields: BTreeMap<FieldId, FieldSlot>,
    callbacks: HashMap<FieldId, FieldCallbacks>,
    on_error: Option<FormErrorCallback>,
}

impl CardForm<FocusBus> {
    /// Creates a form that routes focus through a [`FocusBus`].
    pub fn new(config: FormConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, FocusBus::new())
    }
}

impl<T: FocusTransport> CardForm<T> {
    /// Creates a form with an explicit focus transport.
    pub fn with_transport(config: FormConfig, transport: T) -> Result<Self, ConfigError> {
        let table = config.card_types()?;
        let state = FormState::new(config.images.placeholder.clone());

        Ok(Self {
            config,
            table,
            state,
            transport,
            clock: Box::new(SystemClock),
            fields: BTreeMap::new(),
            callbacks: HashMap::new(),
            on_error: None,
        })
    }

    /// Replaces the clock used for expiry checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Sets the form-level error callback, called with the publishing field
    /// and the message.
    pub fn on_error(&mut self, f: impl FnMut(FieldId, &str) + 'static) {
        self.on_error = Some(Box::new(f));
    }

    /// Sets the passthrough callbacks of `field`. They survive unmounting.
    pub fn set_callbacks(&mut self, field: FieldId, callbacks: FieldCallbacks) {
        self.callbacks.insert(field, callbacks);
    }

    /// Mounts `field`, registering `on_focus` for focus requests aimed at it.
    ///
    /// A non-empty `initial` value is formatted into the field and, for the
    /// number field, seeds the detected brand, image and postal visibility.
    /// Seeding never publishes errors or moves focus. Mounting an already
    /// mounted field resets it.
    pub fn mount(
        &mut self,
        field: FieldId,
        initial: Option<&str>,
        on_focus: impl Fn(FocusRequested) + 'static,
    ) {
        let mut slot = FieldSlot {
            controller: controller_for(field),
            state: FieldState::default(),
        };

        if let Some(value) = initial.filter(|v| !v.is_empty()) {
            let ctx = FieldContext {
                config: &self.config,
                table: &self.table,
                form: &self.state,
                today: self.clock.today(),
            };
            let effects = slot
                .controller
                .change(&mut slot.state, &ctx, value, EditKind::Insert);

            for action in effects.actions {
                if matches!(
                    action,
                    FormAction::DetectBrand { .. } | FormAction::SetPostalVisible(_)
                ) {
                    self.state = self.state.reduce(action);
                }
            }
        }

        debug!(field = %field, seeded = initial.is_some(), "field mounted");
        self.fields.insert(field, slot);
        self.transport.attach(field, Box::new(on_focus));
    }

    /// Unmounts `field`: its state is dropped (and wiped) and its focus
    /// handler detached.
    pub fn unmount(&mut self, field: FieldId) {
        if self.fields.remove(&field).is_some() {
            debug!(field = %field, "field unmounted");
        }
        self.transport.detach(field);
    }

    /// Returns true if `field` is mounted.
    pub fn is_mounted(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    /// Key press handler. Unmounted fields accept everything.
    pub fn key_press(&self, field: FieldId, press: KeyPress) -> KeyOutcome {
        let Some(slot) = self.fields.get(&field) else {
            return KeyOutcome::Accept;
        };
        let ctx = self.context();
        slot.controller.key_press(&slot.state, &ctx, press)
    }

    /// Change handler. Returns the text to write back into the input, or
    /// `None` if the field is not mounted.
    pub fn change(&mut self, field: FieldId, input: &str, edit: EditKind) -> Option<String> {
        let today = self.clock.today();
        let slot = self.fields.get_mut(&field)?;
        let ctx = FieldContext {
            config: &self.config,
            table: &self.table,
            form: &self.state,
            today,
        };

        let effects = slot.controller.change(&mut slot.state, &ctx, input, edit);
        let formatted = slot.state.formatted_value.clone();

        self.apply(field, effects);

        if let Some(cb) = self
            .callbacks
            .get_mut(&field)
            .and_then(|c| c.on_change.as_mut())
        {
            cb(&formatted);
        }

        Some(formatted)
    }

    /// Blur handler: runs the field's full validator.
    pub fn blur(&mut self, field: FieldId) {
        let today = self.clock.today();
        let Some(slot) = self.fields.get_mut(&field) else {
            return;
        };
        let ctx = FieldContext {
            config: &self.config,
            table: &self.table,
            form: &self.state,
            today,
        };

        slot.state.has_focus = false;
        let effects = slot.controller.blur(&mut slot.state, &ctx);
        let value = slot.state.formatted_value.clone();

        self.apply(field, effects);

        if let Some(cb) = self
            .callbacks
            .get_mut(&field)
            .and_then(|c| c.on_blur.as_mut())
        {
            cb(&value);
        }
    }

    /// Key down handler: Backspace/Delete on an empty field moves focus
    /// back one field.
    pub fn key_down(&mut self, field: FieldId, key: Key) {
        let Some(slot) = self.fields.get(&field) else {
            return;
        };
        let effects = slot.controller.key_down(&slot.state, key);
        self.apply(field, effects);
    }

    /// Focus handler: records which field has focus.
    pub fn focus(&mut self, field: FieldId) {
        for (id, slot) in self.fields.iter_mut() {
            slot.state.has_focus = *id == field;
        }
    }

    fn apply(&mut self, field: FieldId, effects: Effects) {
        let mut published = Vec::new();

        for action in effects.actions {
            if let FormAction::SetError { message, .. } = &action {
                published.push(message.clone());
            }
            self.state = self.state.reduce(action);
        }

        for message in &published {
            debug!(field = %field, message = %message, "error published");
            if let Some(cb) = self
                .callbacks
                .get_mut(&field)
                .and_then(|c| c.on_error.as_mut())
            {
                cb(message);
            }
            if let Some(cb) = self.on_error.as_mut() {
                cb(field, message);
            }
        }

        if let Some(event) = effects.focus {
            let direction = if Some(event.0) == field.next() {
                "advance"
            } else {
                "setback"
            };
            let value = self
                .fields
                .get(&field)
                .map(|s| mask_digits(&s.state.formatted_value))
                .unwrap_or_default();
            debug!(from = %field, to = %event.0, direction, value = %value, "focus requested");
            self.transport.request_focus(event);
        }
    }

    fn context(&self) -> FieldContext<'_> {
        FieldContext {
            config: &self.config,
            table: &self.table,
            form: &self.state,
            today: self.clock.today(),
        }
    }

    /// Render attributes for `field`, if mounted.
    pub fn field_props(&self, field: FieldId) -> Option<FieldProps> {
        let slot = self.fields.get(&field)?;
        Some(slot.controller.props(&slot.state, &self.context()))
    }

    /// State of `field`, if mounted.
    pub fn field_state(&self, field: FieldId) -> Option<&FieldState> {
        self.fields.get(&field).map(|s| &s.state)
    }

    /// Declarative view for the presentation layer.
    pub fn view(&self) -> FormView {
        let active_error_message = self.state.active_error.as_ref().map(|e| e.message.clone());
        FormView {
            card_image: self.state.card_image.clone(),
            postal_field_visible: self.state.postal_field_visible,
            is_invalid: active_error_message.is_some(),
            active_error_message,
        }
    }

    /// Shared state.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Brand inferred from the number field.
    pub fn detected_brand(&self) -> Option<CardBrand> {
        self.state.detected_brand
    }

    /// The configuration this form was built from.
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The brand table in use.
    pub fn card_types(&self) -> &CardTypeTable {
        &self.table
    }

    /// The focus transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns true once every mounted field holds a valid, complete value.
    pub fn is_complete(&self) -> bool {
        !self.fields.is_empty()
            && self.fields.values().all(|s| s.state.phase.is_complete_valid())
    }
}

impl<T: FocusTransport + fmt::Debug> fmt::Debug for CardForm<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: BTreeMap<_, _> = self.fields.iter().map(|(id, s)| (id, &s.state)).collect();
        f.debug_struct("CardForm")
            .field("state", &self.state)
            .field("fields", &fields)
            .field("transport", &self.transport)
            .finish()
    }
}
