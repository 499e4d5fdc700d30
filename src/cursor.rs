//! Cursor interaction state machine: what the local cursor currently
//! represents.
//!
//! DESIGN
//! ======
//! - Four modes. `Hidden` is the rest state; `Chat` composes a cursor
//!   bubble; `ReactionSelector` shows the picker; `Reaction` arms an
//!   emoji for press-and-hold emission.
//! - Transitions return the `PresencePatch` the caller must publish, so
//!   the machine itself never touches the transport and tests can drive
//!   it without one.
//! - While the picker is open, cursor presence updates are suppressed so
//!   the picker does not fight with the live cursor. The one exception
//!   is a connection whose cursor is still unset, which may seed it.
//! - Chat text is capped at the bubble limit; input past the cap is
//!   dropped at the boundary rather than trimmed by peers.

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;

use crate::consts::CHAT_MESSAGE_MAX;
use crate::presence::PresencePatch;

// =============================================================================
// TYPES
// =============================================================================

/// What the local cursor currently represents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CursorMode {
    /// Plain pointer, nothing attached.
    #[default]
    Hidden,
    /// Composing a chat bubble at the cursor.
    Chat {
        /// Text in the input box right now.
        message: String,
        /// Last submitted line, shown above the input.
        previous_message: Option<String>,
    },
    /// Emoji picker is open.
    ReactionSelector,
    /// An emoji is armed; holding the pointer emits a trail.
    Reaction {
        /// Armed emoji.
        value: String,
        /// Whether the pointer is currently held down.
        is_pressed: bool,
    },
}

/// Local cursor state machine for one participant.
#[derive(Debug, Default)]
pub struct CursorMachine {
    mode: CursorMode,
}

// =============================================================================
// TRANSITIONS
// =============================================================================

impl CursorMachine {
    /// Machine at rest in `Hidden`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &CursorMode {
        &self.mode
    }

    /// Open an empty chat bubble. Reachable from any mode; any earlier
    /// conversational trail is dropped.
    pub fn open_chat(&mut self) {
        self.mode = CursorMode::Chat { message: String::new(), previous_message: None };
    }

    /// Replace the in-progress chat text, enforcing the bubble cap.
    ///
    /// Returns the patch that shares the text with peers, or `None`
    /// outside of `Chat`.
    pub fn chat_input(&mut self, text: &str) -> Option<PresencePatch> {
        let CursorMode::Chat { message, .. } = &mut self.mode else {
            return None;
        };
        let capped: String = text.chars().take(CHAT_MESSAGE_MAX).collect();
        message.clone_from(&capped);
        Some(PresencePatch::new().with_message(capped))
    }

    /// Submit the current chat line, demoting it to the trail and
    /// opening a fresh empty input. A no-op outside of `Chat`.
    pub fn chat_enter(&mut self) {
        if let CursorMode::Chat { message, previous_message } = &mut self.mode {
            *previous_message = Some(std::mem::take(message));
        }
    }

    /// Drop to `Hidden` from any mode.
    ///
    /// Returns the patch that retracts the outbound chat message.
    pub fn hide(&mut self) -> PresencePatch {
        self.mode = CursorMode::Hidden;
        PresencePatch::new().clear_message()
    }

    /// Open the emoji picker.
    pub fn open_selector(&mut self) {
        self.mode = CursorMode::ReactionSelector;
    }

    /// Arm an emoji picked from the selector.
    pub fn select_reaction(&mut self, value: impl Into<String>) {
        self.mode = CursorMode::Reaction { value: value.into(), is_pressed: false };
    }

    /// Pointer pressed. Only meaningful while an emoji is armed.
    pub fn pointer_down(&mut self) {
        if let CursorMode::Reaction { is_pressed, .. } = &mut self.mode {
            *is_pressed = true;
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        if let CursorMode::Reaction { is_pressed, .. } = &mut self.mode {
            *is_pressed = false;
        }
    }

    /// Pointer left the canvas. Forces `Hidden`.
    ///
    /// Returns the patch that retracts both cursor and chat message.
    pub fn pointer_leave(&mut self) -> PresencePatch {
        self.mode = CursorMode::Hidden;
        PresencePatch::new().clear_cursor().clear_message()
    }

    // --- queries -----------------------------------------------------

    /// Whether pointer moves should skip republishing cursor presence.
    #[must_use]
    pub fn suppresses_cursor(&self) -> bool {
        matches!(self.mode, CursorMode::ReactionSelector)
    }

    /// Emoji the sampler should emit this tick, if one is armed and the
    /// pointer is held down.
    #[must_use]
    pub fn pressed_reaction(&self) -> Option<&str> {
        match &self.mode {
            CursorMode::Reaction { value, is_pressed: true } => Some(value),
            _ => None,
        }
    }
}
