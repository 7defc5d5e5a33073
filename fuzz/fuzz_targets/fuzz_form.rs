//! Fuzz target driving a whole form with arbitrary events.

#![no_main]

use arbitrary::Arbitrary;
use card_field::{
    CardForm, EditKind, FieldId, FixedClock, FormConfig, Key, KeyPress, YearMonth,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Field {
    Number,
    Expiry,
    Cvc,
    Zip,
}

impl From<Field> for FieldId {
    fn from(f: Field) -> Self {
        match f {
            Field::Number => FieldId::Number,
            Field::Expiry => FieldId::Expiry,
            Field::Cvc => FieldId::Cvc,
            Field::Zip => FieldId::Zip,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Event {
    Change(Field, String, bool),
    KeyPress(Field, char, bool),
    KeyDown(Field, bool),
    Blur(Field),
    Focus(Field),
    Unmount(Field),
    Mount(Field, Option<String>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    enable_zip: bool,
    zip_numeric_only: bool,
    events: Vec<Event>,
}

fuzz_target!(|input: Input| {
    let config = FormConfig {
        enable_zip_input: input.enable_zip,
        zip_numeric_only: input.zip_numeric_only,
        ..Default::default()
    };
    let Ok(form) = CardForm::new(config) else {
        return;
    };
    let mut form = form.with_clock(FixedClock(YearMonth::new(2024, 6)));
    for field in FieldId::ALL {
        form.mount(field, None, |_| {});
    }

    for event in input.events {
        match event {
            Event::Change(f, text, deleting) => {
                let edit = if deleting { EditKind::Delete } else { EditKind::Insert };
                let _ = form.change(f.into(), &text, edit);
            }
            Event::KeyPress(f, c, has_selection) => {
                let press = KeyPress {
                    key: Key::Char(c),
                    has_selection,
                };
                let _ = form.key_press(f.into(), press);
            }
            Event::KeyDown(f, backspace) => {
                let key = if backspace { Key::Backspace } else { Key::Delete };
                form.key_down(f.into(), key);
            }
            Event::Blur(f) => form.blur(f.into()),
            Event::Focus(f) => form.focus(f.into()),
            Event::Unmount(f) => form.unmount(f.into()),
            Event::Mount(f, initial) => form.mount(f.into(), initial.as_deref(), |_| {}),
        }

        let view = form.view();
        assert_eq!(view.is_invalid, view.active_error_message.is_some());
    }
});
