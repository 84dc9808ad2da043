//! Host-side plumbing: collaborator traits, callbacks and deferred caret placement.
//!
//! The widget only emits [`Effect`]s. A host implements [`Keyboard`] and
//! [`TextField`] for its real input devices and feeds every batch of effects
//! through [`apply_effects`].

use std::fmt;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::caret::CaretSync;
use crate::country::CountryCode;
use crate::fields::{ActiveField, KeyLayout};
use crate::widget::Effect;

/// Fixed delay between a state change and placing the rendered field's caret.
pub const CARET_SYNC_DELAY: Duration = Duration::from_millis(50);

/// Shared input source: owns one text buffer per field plus a caret.
pub trait Keyboard {
    fn set_buffer(&mut self, content: &str, target: ActiveField);
    fn set_caret(&mut self, position: usize);
    fn caret_position(&self) -> Option<usize>;
    fn retarget(&mut self, target: ActiveField, layout: KeyLayout);
}

/// Rendered text field that shows the formatted number.
pub trait TextField {
    fn set_selection(&mut self, start: usize, end: usize);
    fn focus(&mut self);

    /// Whether the field has finished re-laying out since the last change.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Notifications to the embedding application.
#[derive(Default)]
pub struct Callbacks {
    pub on_country_code_change: Option<Box<dyn FnMut(CountryCode)>>,
    pub on_phone_number_change: Option<Box<dyn FnMut(&str)>>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_country_code_change", &self.on_country_code_change.is_some())
            .field("on_phone_number_change", &self.on_phone_number_change.is_some())
            .finish()
    }
}

/// Best-effort, delayed caret placement on the rendered field.
///
/// Only the latest command is kept. When its deadline passes and the field is
/// not ready, the command is dropped; the next edit schedules a fresh one.
#[derive(Debug, Clone)]
pub struct CaretScheduler {
    delay: Duration,
    pending: Option<(CaretSync, Instant)>,
}

impl Default for CaretScheduler {
    fn default() -> Self {
        Self::new(CARET_SYNC_DELAY)
    }
}

impl CaretScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule(&mut self, sync: CaretSync, now: Instant) {
        self.pending = Some((sync, now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the pending command if due. Returns the command that was applied.
    pub fn poll(&mut self, now: Instant, field: &mut dyn TextField) -> Option<CaretSync> {
        let (sync, deadline) = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;
        if !field.is_ready() {
            trace!(?sync, "field not laid out, caret command dropped");
            return None;
        }
        field.focus();
        field.set_selection(sync.formatted, sync.formatted);
        Some(sync)
    }
}

/// Route a batch of widget effects to the collaborators and callbacks.
pub fn apply_effects(
    effects: Vec<Effect>,
    keyboard: &mut dyn Keyboard,
    scheduler: &mut CaretScheduler,
    callbacks: &mut Callbacks,
    now: Instant,
) {
    for effect in effects {
        match effect {
            Effect::SyncCaret(sync) => {
                keyboard.set_caret(sync.raw);
                // The search box is not formatted, so only phone syncs need the rendered field.
                if sync.target == ActiveField::PhoneDigits {
                    scheduler.schedule(sync, now);
                }
            }
            Effect::RetargetKeyboard { target, layout } => keyboard.retarget(target, layout),
            Effect::SetKeyboardBuffer { content, target } => keyboard.set_buffer(&content, target),
            Effect::CountryCodeChanged(code) => {
                if let Some(callback) = callbacks.on_country_code_change.as_mut() {
                    callback(code);
                }
            }
            Effect::PhoneNumberChanged(number) => {
                if let Some(callback) = callbacks.on_phone_number_change.as_mut() {
                    callback(&number);
                }
            }
        }
    }
}
