//! Link click interception.
//!
//! Clicks on anchors never navigate. The link is followed by the first
//! strategy that applies: reveal an inspected source location, open a
//! profile, perform an internal link action, or fall back to the resources
//! panel. Double-click sensitive anchors delay single clicks so a second
//! click can cancel them.

use std::time::Duration;

use super::Inspector;
use crate::dom::{Anchor, ElementId};
use crate::links::{self, LinkAction};

/// Single-click follow delay for double-click sensitive anchors.
pub const FOLLOW_LINK_DELAY: Duration = Duration::from_millis(333);

const RESOURCES_PANEL: &str = "resources";
const PROFILES_PANEL: &str = "profiles";

/// Mouse click delivered to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: ElementId,
    /// 1 for a single click, 2 for the second click of a double click, ...
    pub click_count: u32,
}

impl ClickEvent {
    pub fn single(target: ElementId) -> Self {
        Self {
            target,
            click_count: 1,
        }
    }
}

impl Inspector {
    /// Returns true if native navigation must be suppressed.
    pub fn document_click(&mut self, event: ClickEvent) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let Some(anchor) = self.dom.enclosing_anchor(event.target) else {
            return false;
        };
        if anchor.target.as_deref() == Some("_blank") {
            return false;
        }
        // Clicks inside an edited element belong to the editor
        if self
            .editing
            .editing_element_for(self.dom.as_ref(), event.target)
            .is_some()
        {
            return true;
        }

        if let Some(timer) = self.follow_link_timer.take() {
            self.event_loop.clear_timer(timer);
        }

        if anchor.prevent_follow_on_double_click {
            if event.click_count == 1 {
                let timer = self.event_loop.set_timeout(
                    FOLLOW_LINK_DELAY,
                    Box::new(move |inspector: &mut Inspector| {
                        inspector.follow_link_timer = None;
                        inspector.follow_link(&anchor);
                    }),
                );
                self.follow_link_timer = Some(timer);
            }
            return true;
        }

        self.follow_link(&anchor);
        true
    }

    fn follow_link(&mut self, anchor: &Anchor) {
        crate::debug_log!("LINKS", "Following {}", anchor.href);

        if self.show_anchor_location(anchor) {
            return;
        }

        if links::parse_profile_url(&anchor.href).is_some() {
            self.show_profile_for_url(anchor);
            return;
        }

        if anchor.href.starts_with("webkit-link-action:") {
            match links::parse_link_action(&anchor.href) {
                Some(LinkAction::ShowPanel(key)) if self.panels.contains(&key) => {
                    self.show_panel(&key);
                }
                Some(LinkAction::ShowPanel(key)) => {
                    log::debug!("Link asks for unknown panel '{}'", key);
                }
                None => {}
            }
            return;
        }

        self.show_panel(RESOURCES_PANEL);
    }

    /// Reveal the location `anchor` points at in the preferred panel, else
    /// in resources. Returns false if neither can show it.
    pub fn show_anchor_location(&mut self, anchor: &Anchor) -> bool {
        let preferred = anchor
            .preferred_panel
            .clone()
            .unwrap_or_else(|| RESOURCES_PANEL.to_string());
        let mut candidates = vec![preferred];
        if candidates[0] != RESOURCES_PANEL {
            candidates.push(RESOURCES_PANEL.to_string());
        }

        for key in candidates {
            let can_show = self
                .panels
                .panel_mut(&key)
                .and_then(|panel| panel.as_anchor_handler())
                .is_some_and(|handler| handler.can_show_anchor_location(anchor));
            if !can_show {
                continue;
            }
            self.show_panel(&key);
            if let Some(handler) = self
                .panels
                .panel_mut(&key)
                .and_then(|panel| panel.as_anchor_handler())
            {
                handler.show_anchor_location(anchor);
            }
            return true;
        }
        false
    }

    fn show_profile_for_url(&mut self, anchor: &Anchor) {
        if !self.panels.contains(PROFILES_PANEL) {
            log::debug!("No profiles panel for {}", anchor.href);
            return;
        }
        self.show_panel(PROFILES_PANEL);
        if let Some(handler) = self
            .panels
            .panel_mut(PROFILES_PANEL)
            .and_then(|panel| panel.as_anchor_handler())
        {
            handler.show_anchor_location(anchor);
        }
    }
}
