//! Localized UI strings.
//!
//! Tables are script files of `localizedStrings["key"] = "value";` lines.
//! Lookups never fail: a missing key renders as the key itself, optionally
//! annotated, and is reported once.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

const UNLOCALIZED_ANNOTATION: &str = " (not localized)";

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"localizedStrings\[\s*"((?:[^"\\]|\\.)*)"\s*\]\s*=\s*"((?:[^"\\]|\\.)*)"\s*;"#)
            .expect("localized string pattern is valid")
    })
}

/// String table plus the set of keys already reported missing.
#[derive(Debug, Default)]
pub struct Localizer {
    strings: HashMap<String, String>,
    annotate_missing: bool,
    reported_missing: HashSet<String>,
}

impl Localizer {
    pub fn new(annotate_missing: bool) -> Self {
        Self {
            annotate_missing,
            ..Default::default()
        }
    }

    /// Parse a table and add its entries. Returns how many were read.
    pub fn load_table(&mut self, text: &str) -> usize {
        let mut count = 0;
        for captures in entry_regex().captures_iter(text) {
            self.strings
                .insert(unescape(&captures[1]), unescape(&captures[2]));
            count += 1;
        }
        count
    }

    /// Load the table at `path` (a `file://` URL or a plain path).
    pub fn load_from_path(&mut self, path: &str) -> Result<usize> {
        let path = path.strip_prefix("file://").unwrap_or(path);
        let text = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read localized strings from {}", path))?;
        let count = self.load_table(&text);
        log::info!("Loaded {} localized strings from {}", count, path);
        Ok(count)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.strings.insert(key.to_string(), value.to_string());
    }

    pub fn set_annotate_missing(&mut self, annotate: bool) {
        self.annotate_missing = annotate;
    }

    /// Look up `key` and substitute `%s`, `%d` and `%%`.
    pub fn ui_string(&mut self, key: &str, args: &[&dyn Display]) -> String {
        let template = match self.strings.get(key) {
            Some(value) => value.clone(),
            None => {
                if self.reported_missing.insert(key.to_string()) {
                    log::warn!("Localized string \"{}\" not found", key);
                }
                if self.annotate_missing {
                    format!("{}{}", key, UNLOCALIZED_ANNOTATION)
                } else {
                    key.to_string()
                }
            }
        };
        format_template(&template, args)
    }
}

fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') | Some('d') => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push_str("undefined"),
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lines_are_parsed() {
        let mut l10n = Localizer::new(false);
        let count = l10n.load_table(
            r#"
            localizedStrings["Elements"] = "Éléments";
            localizedStrings["%d errors"] = "%d erreurs";
            localizedStrings["Say \"hi\""] = "Dis \"salut\"";
            "#,
        );
        assert_eq!(count, 3);
        assert_eq!(l10n.ui_string("Elements", &[]), "Éléments");
        assert_eq!(l10n.ui_string("%d errors", &[&3]), "3 erreurs");
        assert_eq!(l10n.ui_string("Say \"hi\"", &[]), "Dis \"salut\"");
    }

    #[test]
    fn missing_key_falls_back() {
        let mut l10n = Localizer::new(false);
        assert_eq!(l10n.ui_string("Line %d of %s", &[&4, &"main.js"]), "Line 4 of main.js");

        l10n.set_annotate_missing(true);
        assert_eq!(l10n.ui_string("Console", &[]), "Console (not localized)");
        assert_eq!(l10n.reported_missing.len(), 2);
    }

    #[test]
    fn percent_escapes() {
        assert_eq!(format_template("100%% of %s", &[&"x"]), "100% of x");
        assert_eq!(format_template("trailing %", &[]), "trailing %");
        assert_eq!(format_template("%s", &[]), "undefined");
    }

    #[test]
    fn load_from_missing_file_is_an_error() {
        let mut l10n = Localizer::new(false);
        assert!(l10n.load_from_path("file:///nonexistent/localizedStrings.js").is_err());
    }
}
