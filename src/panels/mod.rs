//! Panels: the top-level views the coordinator switches between.
//!
//! A panel is created once from its [`PanelDescriptor`] and lives until the
//! coordinator is dropped. Optional behavior (copy handling, per-session
//! reset, anchor locations) is exposed through capability accessors that
//! return `None` by default.

mod history;
mod registry;

pub use history::{NavigationSource, PanelHistory};
pub use registry::{PanelDescriptor, PanelRegistry};

use webinspector_keybindings::KeyEvent;

use crate::dom::{Anchor, ElementId};

/// Clipboard copy request routed to a panel or focus element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEvent {
    pub target: ElementId,
    data: Option<String>,
    default_prevented: bool,
}

impl CopyEvent {
    pub fn new(target: ElementId) -> Self {
        Self {
            target,
            data: None,
            default_prevented: false,
        }
    }

    /// Put `text` on the clipboard instead of the native selection.
    pub fn set_data(&mut self, text: impl Into<String>) {
        self.data = Some(text.into());
        self.default_prevented = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Panels (and focus elements) that produce their own clipboard content.
pub trait CopyHandler {
    fn handle_copy_event(&mut self, event: &mut CopyEvent);
}

/// Panels holding per-backend-session state.
pub trait Resettable {
    fn reset(&mut self);
}

/// Panels able to reveal a source location referenced by a link.
pub trait AnchorLocationHandler {
    fn can_show_anchor_location(&self, anchor: &Anchor) -> bool;
    fn show_anchor_location(&mut self, anchor: &Anchor);
}

/// Contract every installed panel satisfies.
pub trait Panel {
    /// Stable key, e.g. `"elements"` or `"network"`.
    fn key(&self) -> &str;

    fn show(&mut self);

    fn hide(&mut self);

    fn resize(&mut self) {}

    /// Returns true if the panel consumed the shortcut.
    fn handle_shortcut(&mut self, _event: &KeyEvent) -> bool {
        false
    }

    fn as_copy_handler(&mut self) -> Option<&mut dyn CopyHandler> {
        None
    }

    fn as_resettable(&mut self) -> Option<&mut dyn Resettable> {
        None
    }

    fn as_anchor_handler(&mut self) -> Option<&mut dyn AnchorLocationHandler> {
        None
    }
}
