//! Bound text inputs.
//!
//! Each side of the range has a [`RangeInput`]. Editing follows
//! `Idle -> Editing -> Committed | Reverted`: focusing the field replaces its
//! text with the formatted model value, Enter or blur commits, and text that
//! does not parse reverts to the last valid value without committing.

use range_slicer_core::logging::targets;

use crate::error::ParseError;
use crate::model::format_bound;
use crate::settings::parse_bound;

/// Which side of the range an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Start,
    End,
}

/// Text editing state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputState {
    #[default]
    Idle,
    Editing { text: String },
}

/// Result of committing an input.
#[derive(Debug)]
pub enum CommitOutcome {
    /// A new bound was accepted; `None` means unbounded.
    Committed(Option<f64>),
    /// The text parsed to the bound already in effect.
    Unchanged,
    /// The text did not parse; the last valid value is shown again.
    Reverted(ParseError),
    /// No data is bound; the edit was abandoned.
    Discarded,
}

/// One bound text field.
pub struct RangeInput {
    bound: Bound,
    /// Text currently shown.
    display: String,
    /// Last value accepted into the model.
    last_valid: Option<f64>,
    precision: u32,
    state: InputState,
}

impl RangeInput {
    /// Creates an empty, unbounded input for `bound`.
    pub fn new(bound: Bound) -> Self {
        Self {
            bound,
            display: String::new(),
            last_valid: None,
            precision: 0,
            state: InputState::Idle,
        }
    }

    /// Which side this input edits.
    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// Text currently shown.
    pub fn text(&self) -> &str {
        &self.display
    }

    /// Current editing state.
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Last value accepted into the model.
    pub fn last_valid(&self) -> Option<f64> {
        self.last_valid
    }

    /// Syncs the input from the range model.
    ///
    /// The shown text is only replaced when the field is not being edited.
    pub fn sync(&mut self, value: Option<f64>, precision: u32) {
        self.last_valid = value;
        self.precision = precision;
        if self.state == InputState::Idle {
            self.display = self.formatted();
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Focuses the field. The whole formatted value is selected for replacement.
    pub fn focus(&mut self) -> &str {
        self.display = self.formatted();
        self.state = InputState::Editing {
            text: self.display.clone(),
        };
        &self.display
    }

    /// Replaces the typed text.
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.display = text.clone();
        self.state = InputState::Editing { text };
    }

    /// Commits the typed text.
    pub fn commit(&mut self) -> CommitOutcome {
        let InputState::Editing { text } = std::mem::take(&mut self.state) else {
            return CommitOutcome::Unchanged;
        };

        match parse_bound(&text) {
            Ok(value) if value == self.last_valid => {
                self.display = self.formatted();
                CommitOutcome::Unchanged
            }
            Ok(value) => {
                self.last_valid = value;
                self.display = self.formatted();
                tracing::debug!(target: targets::INPUT, bound = ?self.bound, ?value, "bound committed");
                CommitOutcome::Committed(value)
            }
            Err(err) => {
                self.display = self.formatted();
                tracing::warn!(target: targets::INPUT, bound = ?self.bound, %err, "reverting bound input");
                CommitOutcome::Reverted(err)
            }
        }
    }

    /// Abandons the edit and shows the last valid value again.
    pub fn cancel(&mut self) {
        self.state = InputState::Idle;
        self.display = self.formatted();
    }

    fn formatted(&self) -> String {
        format_bound(self.last_valid, self.precision)
    }
}

static_assertions::assert_impl_all!(RangeInput: Send, Sync);
