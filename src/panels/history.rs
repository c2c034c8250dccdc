//! Linear back/forward history over panel activations.

/// Who asked for a panel activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSource {
    /// Normal activation; recorded in history.
    UserInitiated,
    /// Back/forward replay; not recorded again.
    HistoryReplay,
}

/// Browser-style history: one cursor, no branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl PanelHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Step back and return the key now under the cursor.
    pub fn go_back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Step forward and return the key now under the cursor.
    pub fn go_forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(String::as_str)
    }

    /// Record an activation: drop forward entries, then append `key` unless
    /// it is already the entry under the cursor.
    pub fn set_panel(&mut self, key: &str) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        if self.entries.last().is_some_and(|last| last == key) {
            return;
        }
        self.entries.push(key.to_string());
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor?).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
