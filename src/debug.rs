//! File-backed trace log for the coordinator's hot paths.
//!
//! Backend message dispatch and key routing run far too often for the `log`
//! facade, so they write here instead, and only when asked to:
//!
//! - `WEBINSPECTOR_DEBUG_LEVEL`
//!   - 0 or unset: off
//!   - 1: errors (socket failures, dropped frames)
//!   - 2: lifecycle and panel switches, global shortcut actions
//!   - 3: routing decisions (which stage consumed a key, editing sessions, link follows)
//!   - 4: every queued backend message and every wire frame
//! - `WEBINSPECTOR_DEBUG_CATEGORIES`: comma separated category filter such as
//!   `KEYS,EDITING`. Unset means every category.
//!
//! Output goes to `/tmp/webinspector_debug.log` on Unix, or
//! `%TEMP%\webinspector_debug.log` elsewhere, so the host's stdout/stderr stay
//! untouched.

use std::collections::HashSet;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Categories the coordinator writes under.
pub const CATEGORIES: &[&str] = &[
    "LIFECYCLE", "PANELS", "KEYS", "EDITING", "LINKS", "DISPATCH", "BACKEND",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn parse(val: &str) -> Self {
        match val.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DebugLevel::Off => "OFF  ",
            DebugLevel::Error => "ERROR",
            DebugLevel::Info => "INFO ",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Trace => "TRACE",
        }
    }
}

/// Which categories pass. `None` lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CategoryFilter(Option<HashSet<String>>);

impl CategoryFilter {
    fn parse(list: Option<&str>) -> Self {
        let Some(list) = list else {
            return Self(None);
        };
        let set: HashSet<String> = list
            .split(',')
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        if set.is_empty() { Self(None) } else { Self(Some(set)) }
    }

    fn allows(&self, category: &str) -> bool {
        self.0.as_ref().is_none_or(|set| set.contains(category))
    }
}

struct DebugLogger {
    level: DebugLevel,
    categories: CategoryFilter,
    file: Option<File>,
}

impl DebugLogger {
    fn from_env() -> Self {
        let level = std::env::var("WEBINSPECTOR_DEBUG_LEVEL")
            .map(|v| DebugLevel::parse(&v))
            .unwrap_or(DebugLevel::Off);
        let categories =
            CategoryFilter::parse(std::env::var("WEBINSPECTOR_DEBUG_CATEGORIES").ok().as_deref());
        if level == DebugLevel::Off {
            return Self {
                level,
                categories,
                file: None,
            };
        }

        // No file means no output; the inspector keeps running
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
            .ok();
        let mut logger = Self {
            level,
            categories,
            file,
        };
        logger.write_header();
        logger
    }

    fn write_header(&mut self) {
        let filter = match &self.categories.0 {
            Some(set) => {
                let mut names: Vec<&str> = set.iter().map(String::as_str).collect();
                names.sort_unstable();
                names.join(",")
            }
            None => CATEGORIES.join(","),
        };
        let rule = "=".repeat(80);
        self.write_raw(&format!(
            "\n{rule}\nwebinspector {} trace started at {}\nlevel={:?} categories={}\n{rule}\n",
            crate::VERSION,
            timestamp(),
            self.level,
            filter,
        ));
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn enabled(&self, level: DebugLevel, category: &str) -> bool {
        level != DebugLevel::Off && level <= self.level && self.categories.allows(category)
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if !self.enabled(level, category) {
            return;
        }
        self.write_raw(&format!(
            "[{}] [{}] [{}] {}\n",
            timestamp(),
            level.label(),
            category,
            msg
        ));
    }
}

fn log_path() -> PathBuf {
    if cfg!(unix) {
        PathBuf::from("/tmp/webinspector_debug.log")
    } else {
        std::env::temp_dir().join("webinspector_debug.log")
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::from_env()))
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// True if a message at `level` under `category` would be written.
pub fn is_enabled(level: DebugLevel, category: &str) -> bool {
    logger().lock().enabled(level, category)
}

/// Write a preformatted message.
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    logger().lock().log(level, category, msg);
}

/// Format and write only when the level and category pass.
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level, category) {
        log(level, category, &args.to_string());
    }
}

#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
