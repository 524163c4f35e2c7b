use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

const BUILT_IN: &str = include_str!("../../resources/errors.properties");

static GLOBAL: Lazy<ErrorTranslator> = Lazy::new(|| ErrorTranslator::from_properties(BUILT_IN));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Lookup table from provider error tokens to readable messages.
///
/// The table is read-only once built. [`ErrorTranslator::global`] is parsed lazily on
/// first use and shared by every client that does not configure its own table.
pub struct ErrorTranslator {
    messages: HashMap<String, String>,
}

impl ErrorTranslator {
    /// Table with no translations: every token translates to itself.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in table shipped with the crate.
    pub fn global() -> &'static ErrorTranslator {
        &GLOBAL
    }

    /// Parse a `.properties` document.
    ///
    /// Keys end at the first unescaped `=`, `:` or whitespace. Blank lines and lines
    /// starting with `#` or `!` are ignored, a trailing `\` joins the next line, and the
    /// usual escapes (`\t`, `\n`, `\r`, `\f`, `\uXXXX`, `\=`, ...) are decoded. A
    /// key without a value maps to the empty string; entries with an empty key are
    /// skipped.
    pub fn from_properties(source: &str) -> Self {
        let messages = logical_lines(source)
            .iter()
            .filter_map(|line| {
                let (key, value) = split_entry(line);
                (!key.is_empty()).then_some((key, value))
            })
            .collect();
        Self { messages }
    }

    /// Built-in table with the entries of the properties file at `path` layered on top.
    ///
    /// A missing or unreadable file is not an error: the built-in table is returned.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut translator = Self::global().clone();
        match std::fs::read_to_string(path) {
            Ok(source) => translator.extend(Self::from_properties(&source)),
            Err(err) => tracing::debug!(
                path = %path.display(),
                error = %err,
                "error translations not loaded; using built-in table"
            ),
        }
        translator
    }

    /// Add or replace entries from `other`.
    pub fn extend(&mut self, other: ErrorTranslator) {
        self.messages.extend(other.messages);
    }

    /// Message registered for `token`, or `default` if none is.
    pub fn translate_or<'a>(&'a self, token: &str, default: &'a str) -> &'a str {
        self.messages.get(token).map_or(default, String::as_str)
    }

    /// Message registered for `token`, or the token itself.
    pub fn translate<'a>(&'a self, token: &'a str) -> &'a str {
        self.translate_or(token, token)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\x0c')
}

/// Join continued lines and drop comments and blank lines.
fn logical_lines(source: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in source.lines() {
        let line = raw.trim_start_matches(is_blank);
        let mut current = match pending.take() {
            Some(previous) => previous,
            None if line.is_empty() || line.starts_with(['#', '!']) => continue,
            None => String::new(),
        };

        let trailing = line.chars().rev().take_while(|&ch| ch == '\\').count();
        if trailing % 2 == 1 {
            current.push_str(&line[..line.len() - 1]);
            pending = Some(current);
        } else {
            current.push_str(line);
            lines.push(current);
        }
    }
    lines.extend(pending);
    lines
}

fn split_entry(line: &str) -> (String, String) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (at, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '=' || ch == ':' || is_blank(ch) {
            key_end = at;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    let value = rest.trim_start_matches(is_blank);
    (unescape(&line[..key_end]), unescape(value))
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
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
