//! Synchronisation between an editor's text and the value it edits.
//!
//! An editor holds two things that change independently: the text the user is typing and the
//! last value that was committed. [`TextEditor`] keeps them consistent without fighting the
//! user:
//!
//! - a keystroke commits only if the text is valid and parses to a value different from the
//!   last committed one
//! - a value arriving from elsewhere replaces the text only if it differs from the last
//!   committed value, so an echo of the user's own edit never reformats what they typed
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::{PrimitiveKind, TypeInfo};
//! use qrue::values::{DataSegment, EditOutcome, TextEditor};
//!
//! let mut editor = TextEditor::new(TypeInfo::primitive(PrimitiveKind::Int), None);
//! assert_eq!(editor.set_input("12"), EditOutcome::Committed);
//! assert_eq!(editor.set_input("12x"), EditOutcome::Invalid);
//!
//! // The echo of the committed value leaves the typed text alone.
//! assert!(!editor.sync_value(Some(DataSegment::Primitive(vec![12, 0, 0, 0]))));
//! assert_eq!(editor.text(), "12x");
//! ```

use tracing::trace;

use crate::{
    types::TypeInfo,
    values::{values_equal, DataPayload, DataSegment, TextCodec},
};

/// Result of feeding text to a [`TextEditor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The text produced a new value, which is now the committed value
    Committed,
    /// The text is valid but describes the committed value
    Unchanged,
    /// The text is not valid for the editor's type; nothing was committed
    Invalid,
}

/// Text and committed value of one editable field.
#[derive(Debug, Clone)]
pub struct TextEditor {
    codec: TextCodec,
    type_info: TypeInfo,
    text: String,
    value: Option<DataSegment>,
}

impl TextEditor {
    /// Create an editor with the default codec, showing `value`.
    #[must_use]
    pub fn new(type_info: TypeInfo, value: Option<DataSegment>) -> Self {
        TextEditor::with_codec(TextCodec::default(), type_info, value)
    }

    /// Create an editor with a specific codec, showing `value`.
    #[must_use]
    pub fn with_codec(codec: TextCodec, type_info: TypeInfo, value: Option<DataSegment>) -> Self {
        let text = codec.to_text(&type_info, value.as_ref());
        TextEditor {
            codec,
            type_info,
            text,
            value,
        }
    }

    /// Create an editor for a payload.
    #[must_use]
    pub fn for_payload(payload: DataPayload) -> Self {
        TextEditor::new(payload.type_info, payload.data)
    }

    /// The current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last committed value.
    #[must_use]
    pub fn value(&self) -> Option<&DataSegment> {
        self.value.as_ref()
    }

    /// The type being edited.
    #[must_use]
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// Returns `true` if the current text is valid; editors flag invalid text.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.codec.is_valid_text(&self.text, &self.type_info)
    }

    /// The committed value together with its type.
    #[must_use]
    pub fn payload(&self) -> DataPayload {
        DataPayload {
            type_info: self.type_info.clone(),
            data: self.value.clone(),
        }
    }

    /// Replaces the text with user input and commits it if it yields a new value.
    pub fn set_input(&mut self, input: impl Into<String>) -> EditOutcome {
        self.text = input.into();

        if !self.codec.is_valid_text(&self.text, &self.type_info) {
            return EditOutcome::Invalid;
        }
        let Ok(parsed) = self.codec.from_text(&self.text, &self.type_info) else {
            return EditOutcome::Invalid;
        };
        if values_equal(self.value.as_ref(), Some(&parsed)) {
            return EditOutcome::Unchanged;
        }

        trace!(text = %self.text, type_info = %self.type_info, "editor committed");
        self.value = Some(parsed);
        EditOutcome::Committed
    }

    /// Accepts a value from outside the editor.
    ///
    /// Returns `true` if the value differed from the committed one, in which case the text is
    /// re-rendered from it.
    pub fn sync_value(&mut self, value: Option<DataSegment>) -> bool {
        if values_equal(self.value.as_ref(), value.as_ref()) {
            return false;
        }
        self.text = self.codec.to_text(&self.type_info, value.as_ref());
        self.value = value;
        true
    }

    /// Switches the editor to a payload of a different type, discarding text and value.
    pub fn reset(&mut self, payload: DataPayload) {
        self.text = self.codec.to_text(&payload.type_info, payload.data.as_ref());
        self.type_info = payload.type_info;
        self.value = payload.data;
    }
}
