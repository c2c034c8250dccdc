//! Reserved global shortcut actions.
//!
//! Action names are the `action` strings of the keybinding table.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalAction {
    PreviousPanel,
    NextPanel,
    HistoryBack,
    HistoryForward,
    ToggleConsole,
    Reload,
    ReloadIgnoringCache,
    ShowShortcutsHelp,
}

impl GlobalAction {
    pub const ALL: [GlobalAction; 8] = [
        GlobalAction::PreviousPanel,
        GlobalAction::NextPanel,
        GlobalAction::HistoryBack,
        GlobalAction::HistoryForward,
        GlobalAction::ToggleConsole,
        GlobalAction::Reload,
        GlobalAction::ReloadIgnoringCache,
        GlobalAction::ShowShortcutsHelp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GlobalAction::PreviousPanel => "previous_panel",
            GlobalAction::NextPanel => "next_panel",
            GlobalAction::HistoryBack => "history_back",
            GlobalAction::HistoryForward => "history_forward",
            GlobalAction::ToggleConsole => "toggle_console",
            GlobalAction::Reload => "reload",
            GlobalAction::ReloadIgnoringCache => "reload_ignoring_cache",
            GlobalAction::ShowShortcutsHelp => "show_shortcuts_help",
        }
    }
}

impl fmt::Display for GlobalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlobalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlobalAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown global action: {}", s))
    }
}
