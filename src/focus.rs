//! Current/previous focus element tracking.

use crate::dom::{Dom, ElementId};

/// The single process-wide focus slot and the element it replaced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusTracker {
    current: Option<ElementId>,
    previous: Option<ElementId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ElementId> {
        self.current
    }

    pub fn previous(&self) -> Option<ElementId> {
        self.previous
    }

    /// Make `element` the current focus element.
    ///
    /// Writing the current value again does nothing. A new non-null element is
    /// focused and, unless a selection already lives inside it, gets a caret
    /// at its start. Writing `None` blurs whatever was current.
    pub fn set_current(&mut self, dom: &mut dyn Dom, element: Option<ElementId>) {
        if self.current == element {
            return;
        }

        self.previous = self.current;
        self.current = element;

        match element {
            Some(element) => {
                dom.focus(element);
                if dom.selection_is_collapsed() && !dom.is_caret_inside(element) {
                    dom.place_caret(element);
                }
            }
            None => {
                if let Some(previous) = self.previous {
                    dom.blur(previous);
                }
            }
        }
    }

    /// Clear current (blurring it), then forget previous.
    pub fn reset(&mut self, dom: &mut dyn Dom) {
        self.set_current(dom, None);
        self.previous = None;
    }

    /// Hand focus back to the previous element if `element` still owns it.
    pub fn restore_from(&mut self, dom: &mut dyn Dom, element: ElementId) {
        let Some(current) = self.current else {
            return;
        };
        if dom.is_self_or_ancestor(element, current) {
            let previous = self.previous;
            self.set_current(dom, previous);
        }
    }
}
