//! Copy and paste routing.

use super::Inspector;
use crate::dom::ElementId;
use crate::editing::PasteEvent;
use crate::panels::CopyEvent;

impl Inspector {
    /// Copy request from the document.
    ///
    /// A ranged selection, an editable target or an open editing session
    /// keeps the native copy. Otherwise the focus element's copy handler, then
    /// the current panel's, may supply the clipboard content.
    pub fn document_copy(&mut self, target: ElementId) -> CopyEvent {
        let mut event = CopyEvent::new(target);
        if !self.is_loaded()
            || !self.dom.selection_is_collapsed()
            || self.dom.is_editable_field(target)
            || self.editing.is_editing_any_field()
        {
            return event;
        }

        if let Some(current) = self.focus.current()
            && let Some(handler) = self.focus_copy_handlers.get_mut(&current)
        {
            handler.handle_copy_event(&mut event);
            return event;
        }

        if let Some(handler) = self
            .panels
            .current_panel_mut()
            .and_then(|panel| panel.as_copy_handler())
        {
            handler.handle_copy_event(&mut event);
        }
        event
    }

    /// Paste into the document. Returns true if an editing session consumed it.
    pub fn document_paste(&mut self, target: ElementId, text: &str) -> bool {
        let Some(element) = self.editing.editing_element_for(self.dom.as_ref(), target) else {
            return false;
        };
        let event = PasteEvent {
            target,
            text: text.to_string(),
        };
        self.editing
            .handle_paste(self.dom.as_mut(), &mut self.focus, element, &event)
    }

    /// An element lost focus. An edited element commits.
    pub fn document_blur(&mut self, target: ElementId) -> bool {
        if !self.editing.is_being_edited(target) {
            return false;
        }
        self.editing
            .handle_blur(self.dom.as_mut(), &mut self.focus, target)
    }

    /// The host moved keyboard focus to `target`.
    pub fn document_focus_changed(&mut self, target: Option<ElementId>) {
        self.focus.set_current(self.dom.as_mut(), target);
    }
}
