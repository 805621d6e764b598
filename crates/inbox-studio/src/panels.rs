//! Visibility of the auxiliary panels beside the interrupt.
//!
//! Rendered as a paired toggle, but the two flags are independent: both
//! panels may be open, or neither.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVisibility {
    /// Raw agent state panel.
    pub show_state: bool,
    /// Human-readable description panel.
    pub show_description: bool,
}

impl PanelVisibility {
    pub fn toggle_state(&mut self) {
        self.show_state = !self.show_state;
    }

    pub fn toggle_description(&mut self) {
        self.show_description = !self.show_description;
    }
}
