//! Per-instance phone entry widget state.
//!
//! `PhoneNumberInput` owns everything one widget needs: the selected
//! country, the phone digits with their caret, the country search text and
//! the active-field switch. External events go in, [`Effect`]s come out; the
//! widget never talks to the keyboard, the rendered field or the host
//! callbacks directly.

use tracing::debug;

use crate::caret::{CaretController, CaretSync};
use crate::config::WidgetConfig;
use crate::country::{CountryCode, CountryDirectory};
use crate::digits::{next_caret, DigitBuffer};
use crate::fields::{ActiveField, CaretStrategy, FieldSwitch, FocusEvent, KeyLayout, SearchBufferAction, SizeVariant};
use crate::format::{NumberFormatter, RuleFormatter};

/// Shown in place of the digits while the phone buffer is empty.
pub const PLACEHOLDER: &str = "Phone number";

/// Side effect requested by a widget transition, applied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Place the keyboard caret now and the rendered field caret after layout.
    SyncCaret(CaretSync),
    /// Point the shared keyboard at another buffer and key layout.
    RetargetKeyboard { target: ActiveField, layout: KeyLayout },
    /// Overwrite the keyboard's copy of a buffer.
    SetKeyboardBuffer { content: String, target: ActiveField },
    CountryCodeChanged(CountryCode),
    /// Full number with a leading `+` and calling code.
    PhoneNumberChanged(String),
}

/// One row of the country list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    pub code: CountryCode,
    pub calling_code: u16,
    pub display_name: &'static str,
}

#[derive(Debug, Clone, Default)]
struct SearchField {
    text: String,
    caret: usize,
}

/// Owned state of one phone entry widget.
pub struct PhoneNumberInput<F: NumberFormatter = RuleFormatter> {
    formatter: F,
    directory: CountryDirectory,
    country: CountryCode,
    locale: String,
    size: SizeVariant,
    strategy: CaretStrategy,
    phone: CaretController,
    search: SearchField,
    switch: FieldSwitch,
    list_open: bool,
}

impl PhoneNumberInput<RuleFormatter> {
    pub fn with_rules(config: &WidgetConfig) -> Self {
        Self::new(config, RuleFormatter::new())
    }
}

impl<F: NumberFormatter> PhoneNumberInput<F> {
    /// Seed the widget from `config`; the initial value loses its calling code.
    pub fn new(config: &WidgetConfig, formatter: F) -> Self {
        let country = config.initial_country;
        let initial = config.initial_value.as_deref().unwrap_or_default();
        let digits = formatter.strip_dialling_code(initial, country);
        let phone = CaretController::new(DigitBuffer::from_digits(&digits), country, &formatter);
        debug!(%country, digits = phone.buffer().as_str(), "phone entry widget created");

        Self {
            formatter,
            directory: CountryDirectory,
            country,
            locale: config.locale_or_default().to_string(),
            size: config.size,
            strategy: config.caret_strategy,
            phone,
            search: SearchField::default(),
            switch: FieldSwitch::default(),
            list_open: false,
        }
    }

    pub fn country(&self) -> CountryCode {
        self.country
    }

    pub fn calling_code(&self) -> u16 {
        self.directory.calling_code(self.country)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn size(&self) -> SizeVariant {
        self.size
    }

    pub fn active_field(&self) -> ActiveField {
        self.switch.active()
    }

    pub fn keyboard_layout(&self) -> KeyLayout {
        self.switch.active().into()
    }

    pub fn is_country_list_open(&self) -> bool {
        self.list_open
    }

    pub fn digits(&self) -> &str {
        self.phone.buffer().as_str()
    }

    pub fn formatted(&self) -> &str {
        self.phone.formatted()
    }

    pub fn raw_caret(&self) -> usize {
        self.phone.raw_caret()
    }

    pub fn formatted_caret(&self) -> usize {
        self.phone.formatted_caret()
    }

    pub fn search_text(&self) -> &str {
        &self.search.text
    }

    pub fn search_caret(&self) -> usize {
        self.search.caret
    }

    /// `+<calling code><digits>`, as reported to the host.
    pub fn full_number(&self) -> String {
        format!("+{}{}", self.calling_code(), self.digits())
    }

    /// The phone field's current caret command, for the initial push.
    pub fn current_sync(&self) -> CaretSync {
        CaretSync {
            target: ActiveField::PhoneDigits,
            raw: self.raw_caret(),
            formatted: self.formatted_caret(),
        }
    }

    /// Countries matching the search text in the widget locale.
    pub fn visible_countries(&self) -> Vec<CountryOption> {
        self.directory
            .filter(&self.search.text, &self.locale)
            .into_iter()
            .filter_map(|code| {
                let meta = self.directory.metadata(code, &self.locale);
                meta.display_name.map(|display_name| CountryOption {
                    code,
                    calling_code: meta.calling_code,
                    display_name,
                })
            })
            .collect()
    }

    /// The keyboard reported new content for the active buffer.
    pub fn keyboard_changed(&mut self, content: &str) -> Vec<Effect> {
        match self.switch.active() {
            ActiveField::PhoneDigits => {
                let sync = self.phone.on_edit(content, self.strategy, self.country, &self.formatter);
                let mut effects = Vec::with_capacity(3);
                if self.digits() != content {
                    // Dropped characters must leave the keyboard too, or its caret drifts.
                    effects.push(Effect::SetKeyboardBuffer {
                        content: self.digits().to_string(),
                        target: ActiveField::PhoneDigits,
                    });
                }
                effects.push(Effect::SyncCaret(sync));
                effects.push(Effect::PhoneNumberChanged(self.full_number()));
                effects
            }
            ActiveField::CountrySearch => {
                self.search.caret = next_caret(&self.search.text, content, self.search.caret, self.strategy);
                self.search.text = content.to_string();
                debug!(query = %self.search.text, "country search edited");
                vec![Effect::SyncCaret(self.search_sync())]
            }
        }
    }

    /// The keyboard moved its caret without editing (arrow keys).
    pub fn caret_moved(&mut self, raw: usize) -> Vec<Effect> {
        let sync = match self.switch.active() {
            ActiveField::PhoneDigits => self.phone.place(raw),
            ActiveField::CountrySearch => {
                self.search.caret = raw.min(self.search.text.chars().count());
                self.search_sync()
            }
        };
        vec![Effect::SyncCaret(sync)]
    }

    /// A character of the displayed number was clicked.
    pub fn click_formatted(&mut self, offset: usize) -> Vec<Effect> {
        let mut effects = self.activate_phone();
        effects.push(Effect::SyncCaret(self.phone.on_click(offset)));
        effects
    }

    /// The phone display was clicked outside any digit: caret goes to the end.
    pub fn focus_phone(&mut self) -> Vec<Effect> {
        let mut effects = self.activate_phone();
        effects.push(Effect::SyncCaret(self.phone.place_at_end()));
        effects
    }

    /// Flag button: open the list and search, or close it and return to the digits.
    pub fn toggle_country_list(&mut self) -> Vec<Effect> {
        if self.list_open {
            self.list_open = false;
            self.focus_phone()
        } else {
            self.list_open = true;
            self.activate_search(FocusEvent::CountryListOpened)
        }
    }

    /// The search box gained focus.
    pub fn focus_search(&mut self) -> Vec<Effect> {
        self.activate_search(FocusEvent::SearchFocused)
    }

    /// A country was picked from the list.
    pub fn select_country(&mut self, code: CountryCode) -> Vec<Effect> {
        self.list_open = false;
        let mut effects = Vec::new();
        if self.switch.transition(FocusEvent::CountrySelected) == SearchBufferAction::Clear {
            self.search = SearchField::default();
            effects.push(Effect::SetKeyboardBuffer {
                content: String::new(),
                target: ActiveField::CountrySearch,
            });
        }
        self.country = code;
        effects.push(Effect::RetargetKeyboard {
            target: ActiveField::PhoneDigits,
            layout: KeyLayout::Phone,
        });
        effects.push(Effect::SetKeyboardBuffer {
            content: self.digits().to_string(),
            target: ActiveField::PhoneDigits,
        });
        effects.push(Effect::SyncCaret(self.phone.on_country_change(code, &self.formatter)));
        effects.push(Effect::CountryCodeChanged(code));
        effects
    }

    fn activate_phone(&mut self) -> Vec<Effect> {
        self.switch.transition(FocusEvent::PhoneFocused);
        vec![
            Effect::RetargetKeyboard {
                target: ActiveField::PhoneDigits,
                layout: KeyLayout::Phone,
            },
            Effect::SetKeyboardBuffer {
                content: self.digits().to_string(),
                target: ActiveField::PhoneDigits,
            },
        ]
    }

    fn activate_search(&mut self, event: FocusEvent) -> Vec<Effect> {
        if self.switch.transition(event) == SearchBufferAction::Clear {
            self.search = SearchField::default();
        }
        debug!(?event, "country search active");
        vec![
            Effect::RetargetKeyboard {
                target: ActiveField::CountrySearch,
                layout: KeyLayout::Default,
            },
            Effect::SetKeyboardBuffer {
                content: self.search.text.clone(),
                target: ActiveField::CountrySearch,
            },
            Effect::SyncCaret(self.search_sync()),
        ]
    }

    fn search_sync(&self) -> CaretSync {
        // Search text is shown unformatted; hosts only hand this to the keyboard.
        CaretSync {
            target: ActiveField::CountrySearch,
            raw: self.search.caret,
            formatted: self.search.caret,
        }
    }
}
