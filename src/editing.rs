//! In-place editing sessions.
//!
//! Any element can become a transient text editor. A session is
//! `Editing -> Committed | Cancelled`; cleanup runs exactly once, before the
//! commit or cancel callback, and a blur while editing is a plain commit.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use webinspector_keybindings::{KeyEvent, Platform};
use winit::keyboard::NamedKey;

use crate::dom::{Dom, ElementId};
use crate::focus::FocusTracker;

const EDITING_CLASS: &str = "editing";

/// Focus movement requested when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    #[default]
    None,
    Forward,
    Backward,
}

impl MoveDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            MoveDirection::None => "",
            MoveDirection::Forward => "forward",
            MoveDirection::Backward => "backward",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported by the key, paste and custom finish handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingResult {
    Commit,
    Cancel,
    Move(MoveDirection),
}

/// Arguments passed to the commit callback.
pub struct CommitEvent {
    pub element: ElementId,
    pub new_content: String,
    pub old_content: String,
    pub context: Option<Box<dyn Any>>,
    pub move_direction: MoveDirection,
}

impl fmt::Debug for CommitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitEvent")
            .field("element", &self.element)
            .field("new_content", &self.new_content)
            .field("old_content", &self.old_content)
            .field("has_context", &self.context.is_some())
            .field("move_direction", &self.move_direction)
            .finish()
    }
}

/// Clipboard paste delivered to an element being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    pub target: ElementId,
    pub text: String,
}

pub type CommitHandler = Box<dyn FnOnce(CommitEvent)>;
pub type CancelHandler = Box<dyn FnOnce(ElementId, Option<Box<dyn Any>>)>;
pub type PasteHandler = Box<dyn FnMut(&PasteEvent) -> Option<EditingResult>>;
pub type FinishHandler = Box<dyn FnMut(&KeyEvent) -> Option<EditingResult>>;

/// Callbacks and options for one editing session.
#[derive(Default)]
pub struct EditingConfig {
    commit_handler: Option<CommitHandler>,
    cancel_handler: Option<CancelHandler>,
    paste_handler: Option<PasteHandler>,
    custom_finish_handler: Option<FinishHandler>,
    context: Option<Box<dyn Any>>,
    multiline: bool,
}

impl EditingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_commit(mut self, handler: impl FnOnce(CommitEvent) + 'static) -> Self {
        self.commit_handler = Some(Box::new(handler));
        self
    }

    pub fn on_cancel(
        mut self,
        handler: impl FnOnce(ElementId, Option<Box<dyn Any>>) + 'static,
    ) -> Self {
        self.cancel_handler = Some(Box::new(handler));
        self
    }

    pub fn on_paste(
        mut self,
        handler: impl FnMut(&PasteEvent) -> Option<EditingResult> + 'static,
    ) -> Self {
        self.paste_handler = Some(Box::new(handler));
        self
    }

    /// Replace the default Enter/Escape/Tab mapping.
    pub fn custom_finish_handler(
        mut self,
        handler: impl FnMut(&KeyEvent) -> Option<EditingResult> + 'static,
    ) -> Self {
        self.custom_finish_handler = Some(Box::new(handler));
        self
    }

    pub fn context(mut self, context: impl Any) -> Self {
        self.context = Some(Box::new(context));
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }
}

/// Returned by [`EditingManager::start_editing`]; ends that session only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditingHandle {
    element: ElementId,
    session: u64,
}

impl EditingHandle {
    pub fn element(&self) -> ElementId {
        self.element
    }
}

struct Session {
    id: u64,
    original_text: String,
    original_tab_index: i32,
    original_scroll: (f64, f64),
    move_direction: MoveDirection,
    config: EditingConfig,
}

/// Owns every open editing session, keyed by element.
pub struct EditingManager {
    platform: Platform,
    sessions: HashMap<ElementId, Session>,
    next_session: u64,
}

impl fmt::Debug for EditingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingManager")
            .field("platform", &self.platform)
            .field("open_sessions", &self.sessions.len())
            .finish()
    }
}

impl EditingManager {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            sessions: HashMap::new(),
            next_session: 0,
        }
    }

    /// Turn `element` into an editor.
    ///
    /// Returns `None` without side effects if `element` is already being edited.
    pub fn start_editing(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
        config: EditingConfig,
    ) -> Option<EditingHandle> {
        if self.sessions.contains_key(&element) {
            log::debug!("Element {:?} is already being edited", element);
            return None;
        }

        self.next_session += 1;
        let session = Session {
            id: self.next_session,
            original_text: dom.text_content(element),
            original_tab_index: dom.tab_index(element),
            original_scroll: dom.scroll_position(element),
            move_direction: MoveDirection::None,
            config,
        };
        let handle = EditingHandle {
            element,
            session: session.id,
        };
        self.sessions.insert(element, session);

        dom.add_class(element, EDITING_CLASS);
        if dom.tab_index(element) < 0 {
            dom.set_tab_index(element, 0);
        }
        focus.set_current(dom, Some(element));

        crate::debug_log!("EDITING", "Started session {} on {:?}", handle.session, element);
        Some(handle)
    }

    pub fn is_editing_any_field(&self) -> bool {
        !self.sessions.is_empty()
    }

    pub fn is_being_edited(&self, element: ElementId) -> bool {
        self.sessions.contains_key(&element)
    }

    /// The edited element containing `target`, if any.
    pub fn editing_element_for(&self, dom: &dyn Dom, target: ElementId) -> Option<ElementId> {
        self.sessions
            .keys()
            .copied()
            .find(|element| dom.is_self_or_ancestor(*element, target))
    }

    /// Commit the session behind `handle`. Returns false if it already ended.
    pub fn commit(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        handle: &EditingHandle,
    ) -> bool {
        if !self.owns(handle) {
            return false;
        }
        self.commit_element(dom, focus, handle.element)
    }

    /// Cancel the session behind `handle`. Returns false if it already ended.
    pub fn cancel(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        handle: &EditingHandle,
    ) -> bool {
        if !self.owns(handle) {
            return false;
        }
        self.cancel_element(dom, focus, handle.element)
    }

    /// Key press on an edited element. Returns true if the key was consumed.
    ///
    /// Tab only records the move direction and returns false: the host's own
    /// Tab handling moves focus away, and the resulting blur commits.
    pub fn handle_key_down(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
        event: &KeyEvent,
    ) -> bool {
        let platform = self.platform;
        let Some(session) = self.sessions.get_mut(&element) else {
            return false;
        };
        let result = match session.config.custom_finish_handler.as_mut() {
            Some(handler) => handler(event),
            None => default_finish(platform, session.config.multiline, event),
        };
        let Some(result) = result else {
            return false;
        };

        if let EditingResult::Move(direction) = result {
            session.move_direction = direction;
            if event.is_named(NamedKey::Tab) {
                return false;
            }
        }
        self.apply(dom, focus, element, result);
        true
    }

    /// Paste into an edited element. Returns true if the paste was consumed.
    pub fn handle_paste(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
        event: &PasteEvent,
    ) -> bool {
        let Some(session) = self.sessions.get_mut(&element) else {
            return false;
        };
        let Some(handler) = session.config.paste_handler.as_mut() else {
            return false;
        };
        let Some(result) = handler(event) else {
            return false;
        };
        if let EditingResult::Move(direction) = result {
            session.move_direction = direction;
        }
        self.apply(dom, focus, element, result);
        true
    }

    /// Focus left an edited element: implicit commit.
    pub fn handle_blur(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
    ) -> bool {
        self.commit_element(dom, focus, element)
    }

    fn owns(&self, handle: &EditingHandle) -> bool {
        self.sessions
            .get(&handle.element)
            .is_some_and(|s| s.id == handle.session)
    }

    fn apply(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
        result: EditingResult,
    ) {
        match result {
            EditingResult::Commit | EditingResult::Move(_) => {
                self.commit_element(dom, focus, element);
            }
            EditingResult::Cancel => {
                self.cancel_element(dom, focus, element);
            }
        }
    }

    fn commit_element(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
    ) -> bool {
        let Some(session) = self.sessions.remove(&element) else {
            return false;
        };
        let new_content = dom.text_content(element);
        cleanup(dom, focus, element, &session);
        crate::debug_log!("EDITING", "Committed session {} on {:?}", session.id, element);

        let Session {
            original_text,
            move_direction,
            config,
            ..
        } = session;
        if let Some(handler) = config.commit_handler {
            handler(CommitEvent {
                element,
                new_content,
                old_content: original_text,
                context: config.context,
                move_direction,
            });
        }
        true
    }

    fn cancel_element(
        &mut self,
        dom: &mut dyn Dom,
        focus: &mut FocusTracker,
        element: ElementId,
    ) -> bool {
        let Some(session) = self.sessions.remove(&element) else {
            return false;
        };
        dom.set_text_content(element, &session.original_text);
        cleanup(dom, focus, element, &session);
        crate::debug_log!("EDITING", "Cancelled session {} on {:?}", session.id, element);

        if let Some(handler) = session.config.cancel_handler {
            handler(element, session.config.context);
        }
        true
    }
}

fn cleanup(dom: &mut dyn Dom, focus: &mut FocusTracker, element: ElementId, session: &Session) {
    dom.remove_class(element, EDITING_CLASS);
    dom.set_tab_index(element, session.original_tab_index);
    dom.set_scroll_position(element, session.original_scroll);
    focus.restore_from(dom, element);
}

/// Enter commits (multiline fields need the primary modifier alone),
/// Escape cancels, Tab and Shift+Tab move.
fn default_finish(platform: Platform, multiline: bool, event: &KeyEvent) -> Option<EditingResult> {
    if event.is_named(NamedKey::Enter) {
        if !multiline || platform.is_primary_modifier_only(event.modifiers) {
            return Some(EditingResult::Commit);
        }
        return None;
    }
    if event.is_named(NamedKey::Escape) {
        return Some(EditingResult::Cancel);
    }
    if event.is_named(NamedKey::Tab) {
        let direction = if event.shift() {
            MoveDirection::Backward
        } else {
            MoveDirection::Forward
        };
        return Some(EditingResult::Move(direction));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HeadlessDom;
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::keyboard::ModifiersState;

    struct Fixture {
        dom: HeadlessDom,
        focus: FocusTracker,
        editing: EditingManager,
        div: ElementId,
    }

    fn fixture() -> Fixture {
        let mut dom = HeadlessDom::new();
        let div = dom.create_text_element(None, "old");
        Fixture {
            dom,
            focus: FocusTracker::new(),
            editing: EditingManager::new(Platform::Linux),
            div,
        }
    }

    fn key(named: NamedKey, modifiers: ModifiersState) -> KeyEvent {
        KeyEvent::named(named, modifiers)
    }

    #[test]
    fn start_marks_element_and_takes_focus() {
        let mut f = fixture();
        let handle = f
            .editing
            .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new());

        assert!(handle.is_some());
        assert!(f.dom.has_class(f.div, EDITING_CLASS));
        assert_eq!(f.dom.tab_index(f.div), 0);
        assert_eq!(f.focus.current(), Some(f.div));
        assert!(f.editing.is_editing_any_field());
    }

    #[test]
    fn second_start_on_same_element_is_refused() {
        let mut f = fixture();
        assert!(
            f.editing
                .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new())
                .is_some()
        );
        assert!(
            f.editing
                .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new())
                .is_none()
        );
    }

    #[test]
    fn commit_twice_invokes_handler_once() {
        let mut f = fixture();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let handle = f
            .editing
            .start_editing(
                &mut f.dom,
                &mut f.focus,
                f.div,
                EditingConfig::new().on_commit(move |_| *counter.borrow_mut() += 1),
            )
            .unwrap();

        assert!(f.editing.commit(&mut f.dom, &mut f.focus, &handle));
        assert!(!f.editing.commit(&mut f.dom, &mut f.focus, &handle));
        assert!(!f.editing.cancel(&mut f.dom, &mut f.focus, &handle));
        assert_eq!(*calls.borrow(), 1);
        assert!(!f.editing.is_editing_any_field());
    }

    #[test]
    fn stale_handle_does_not_end_newer_session() {
        let mut f = fixture();
        let first = f
            .editing
            .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new())
            .unwrap();
        f.editing.commit(&mut f.dom, &mut f.focus, &first);
        let _second = f
            .editing
            .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new())
            .unwrap();

        assert!(!f.editing.cancel(&mut f.dom, &mut f.focus, &first));
        assert!(f.editing.is_being_edited(f.div));
    }

    #[test]
    fn cancel_restores_original_text() {
        let mut f = fixture();
        let cancelled = Rc::new(RefCell::new(None));
        let sink = cancelled.clone();
        let handle = f
            .editing
            .start_editing(
                &mut f.dom,
                &mut f.focus,
                f.div,
                EditingConfig::new()
                    .context(42u32)
                    .on_cancel(move |el, ctx| {
                        *sink.borrow_mut() = Some((el, ctx.and_then(|c| c.downcast::<u32>().ok())))
                    }),
            )
            .unwrap();

        f.dom.set_text_content(f.div, "typed \u{1F600} text");
        f.editing.cancel(&mut f.dom, &mut f.focus, &handle);

        assert_eq!(f.dom.text_content(f.div), "old");
        assert!(!f.dom.has_class(f.div, EDITING_CLASS));
        assert_eq!(f.dom.tab_index(f.div), -1);
        let (el, ctx) = cancelled.borrow_mut().take().unwrap();
        assert_eq!(el, f.div);
        assert_eq!(ctx.map(|c| *c), Some(42));
    }

    #[test]
    fn cleanup_runs_before_commit_handler() {
        let mut f = fixture();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let handle = f
            .editing
            .start_editing(
                &mut f.dom,
                &mut f.focus,
                f.div,
                EditingConfig::new().on_commit(move |event| *sink.borrow_mut() = Some(event)),
            )
            .unwrap();
        f.dom.set_scroll_position(f.div, (0.0, 120.0));
        f.dom.set_text_content(f.div, "new");

        f.editing.commit(&mut f.dom, &mut f.focus, &handle);

        let event = seen.borrow_mut().take().unwrap();
        assert_eq!(event.new_content, "new");
        assert_eq!(event.old_content, "old");
        assert_eq!(f.dom.text_content(f.div), "new");
        assert_eq!(f.dom.scroll_position(f.div), (0.0, 0.0));
        assert_eq!(f.focus.current(), None);
    }

    #[test]
    fn escape_cancels() {
        let mut f = fixture();
        f.editing
            .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new());
        f.dom.set_text_content(f.div, "changed");

        let escape = key(NamedKey::Escape, ModifiersState::empty());
        assert!(f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &escape));
        assert_eq!(f.dom.text_content(f.div), "old");
    }

    #[test]
    fn multiline_enter_needs_primary_modifier() {
        let mut f = fixture();
        f.editing.start_editing(
            &mut f.dom,
            &mut f.focus,
            f.div,
            EditingConfig::new().multiline(true),
        );

        let plain = key(NamedKey::Enter, ModifiersState::empty());
        assert!(!f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &plain));
        assert!(f.editing.is_being_edited(f.div));

        let ctrl = key(NamedKey::Enter, ModifiersState::CONTROL);
        assert!(f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &ctrl));
        assert!(!f.editing.is_being_edited(f.div));
    }

    #[test]
    fn tab_records_direction_and_blur_commits() {
        let mut f = fixture();
        let direction = Rc::new(RefCell::new(None));
        let sink = direction.clone();
        f.editing.start_editing(
            &mut f.dom,
            &mut f.focus,
            f.div,
            EditingConfig::new().on_commit(move |e| *sink.borrow_mut() = Some(e.move_direction)),
        );

        let shift_tab = key(NamedKey::Tab, ModifiersState::SHIFT);
        assert!(!f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &shift_tab));
        assert!(f.editing.is_being_edited(f.div));

        assert!(f.editing.handle_blur(&mut f.dom, &mut f.focus, f.div));
        assert_eq!(*direction.borrow(), Some(MoveDirection::Backward));
        assert!(!f.editing.handle_blur(&mut f.dom, &mut f.focus, f.div));
    }

    #[test]
    fn custom_finish_move_commits_immediately() {
        let mut f = fixture();
        let direction = Rc::new(RefCell::new(None));
        let sink = direction.clone();
        f.editing.start_editing(
            &mut f.dom,
            &mut f.focus,
            f.div,
            EditingConfig::new()
                .custom_finish_handler(|event| {
                    event
                        .is_named(NamedKey::ArrowDown)
                        .then_some(EditingResult::Move(MoveDirection::Forward))
                })
                .on_commit(move |e| *sink.borrow_mut() = Some(e.move_direction)),
        );

        let enter = key(NamedKey::Enter, ModifiersState::empty());
        assert!(!f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &enter));

        let down = key(NamedKey::ArrowDown, ModifiersState::empty());
        assert!(f.editing.handle_key_down(&mut f.dom, &mut f.focus, f.div, &down));
        assert_eq!(*direction.borrow(), Some(MoveDirection::Forward));
    }

    #[test]
    fn paste_handler_outcome_is_applied() {
        let mut f = fixture();
        f.editing.start_editing(
            &mut f.dom,
            &mut f.focus,
            f.div,
            EditingConfig::new().on_paste(|event| {
                event.text.contains('\n').then_some(EditingResult::Cancel)
            }),
        );

        let single = PasteEvent {
            target: f.div,
            text: "x".into(),
        };
        assert!(!f.editing.handle_paste(&mut f.dom, &mut f.focus, f.div, &single));

        let multi = PasteEvent {
            target: f.div,
            text: "a\nb".into(),
        };
        assert!(f.editing.handle_paste(&mut f.dom, &mut f.focus, f.div, &multi));
        assert!(!f.editing.is_editing_any_field());
    }

    #[test]
    fn sessions_are_independent_per_element() {
        let mut f = fixture();
        let other = f.dom.create_text_element(None, "b");
        let a = f
            .editing
            .start_editing(&mut f.dom, &mut f.focus, f.div, EditingConfig::new())
            .unwrap();
        f.editing
            .start_editing(&mut f.dom, &mut f.focus, other, EditingConfig::new());

        f.editing.commit(&mut f.dom, &mut f.focus, &a);
        assert!(f.editing.is_editing_any_field());
        assert!(f.editing.is_being_edited(other));
    }
}
