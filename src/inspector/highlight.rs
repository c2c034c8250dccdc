//! Temporary DOM node highlighting.

use std::time::Duration;

use serde_json::json;

use super::Inspector;

/// How long a temporary highlight stays up.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

impl Inspector {
    /// Highlight `node_id` and hide it again after two seconds.
    ///
    /// A new request replaces the previous highlight and its timer.
    pub fn highlight_dom_node_for_two_seconds(&mut self, node_id: u64) {
        if let Some(timer) = self.highlight.hide_timer.take() {
            self.event_loop.clear_timer(timer);
        }
        self.highlight.node = Some(node_id);
        self.send_command("DOM.highlightNode", Some(json!({ "nodeId": node_id })), None);

        let timer = self.event_loop.set_timeout(
            HIGHLIGHT_DURATION,
            Box::new(|inspector: &mut Inspector| {
                inspector.highlight.hide_timer = None;
                inspector.hide_dom_node_highlight();
            }),
        );
        self.highlight.hide_timer = Some(timer);
    }

    pub fn hide_dom_node_highlight(&mut self) {
        if let Some(timer) = self.highlight.hide_timer.take() {
            self.event_loop.clear_timer(timer);
        }
        self.highlight.node = None;
        self.send_command("DOM.hideHighlight", None, None);
    }

    pub fn highlighted_node(&self) -> Option<u64> {
        self.highlight.node
    }

    /// Drop highlight state for a new session.
    pub(super) fn reset_highlight(&mut self) {
        if let Some(timer) = self.highlight.hide_timer.take() {
            self.event_loop.clear_timer(timer);
        }
        self.highlight.node = None;
    }
}
