//! Flat key/value resource parser
//!
//! Mapping resources use the classic `.properties` layout:
//!
//! ```text
//! # Xbox 360 wired controller
//! vendor.id = 045e
//! product.id: 028e
//! button.A 0
//! buttonlabel.Start = Start \
//!                     Button
//! ```
//!
//! Comments start with `#` or `!`, the key ends at the first unescaped `=`,
//! `:` or whitespace, a trailing backslash continues the logical line, and the
//! usual backslash escapes (including `\uXXXX`) are decoded in keys and values.

use std::collections::HashMap;

use crate::error::PropertiesError;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Parsed key/value pairs in file order
///
/// A repeated key replaces the earlier value but keeps the position of its
/// first occurrence, so iteration order is stable for a given file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let mut props = Self::new();
        let mut lines = text.lines().enumerate();

        while let Some((idx, raw)) = lines.next() {
            let line_no = idx + 1;
            let first = raw.trim_start_matches(WHITESPACE);
            if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
                continue;
            }

            // Join continuation lines into one logical line
            let mut logical = String::new();
            let mut current = first;
            loop {
                if has_continuation(current) {
                    logical.push_str(&current[..current.len() - 1]);
                    match lines.next() {
                        Some((_, next)) => current = next.trim_start_matches(WHITESPACE),
                        None => break,
                    }
                } else {
                    logical.push_str(current);
                    break;
                }
            }

            let (key, value) = split_key_value(&logical);
            let key = unescape(key, line_no)?;
            let value = unescape(value, line_no)?;
            props.insert(key, value);
        }

        Ok(props)
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            },
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Values in file order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An odd number of trailing backslashes continues the line
fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            },
            _ => {},
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches(WHITESPACE);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    (key, rest.trim_start_matches(WHITESPACE))
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or(PropertiesError::MalformedUnicodeEscape { line })?;
                out.push(decoded);
            },
            Some(other) => out.push(other),
            None => {},
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_and_comments() {
        let props = Properties::parse(
            "# comment\n\
             ! also a comment\n\
             \n\
             vendor.id=045e\n\
             product.id : 028e\n\
             button.A 0\n\
             \tbutton.B   =   1\n",
        )
        .unwrap();

        assert_eq!(props.len(), 4);
        assert_eq!(props.get("vendor.id"), Some("045e"));
        assert_eq!(props.get("product.id"), Some("028e"));
        assert_eq!(props.get("button.A"), Some("0"));
        assert_eq!(props.get("button.B"), Some("1"));
        assert_eq!(props.get("# comment"), None);
    }

    #[test]
    fn test_file_order_and_duplicates() {
        let props = Properties::parse("b=1\na=2\nb=3\n").unwrap();
        let entries: Vec<_> = props.iter().collect();
        assert_eq!(entries, vec![("b", "3"), ("a", "2")]);
        assert_eq!(props.values().collect::<Vec<_>>(), vec!["3", "2"]);
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("buttonlabel.Start = Start \\\n    Button\nnext=1").unwrap();
        assert_eq!(props.get("buttonlabel.Start"), Some("Start Button"));
        assert_eq!(props.get("next"), Some("1"));

        // Escaped backslash is not a continuation
        let props = Properties::parse("path=c:\\\\\nnext=1").unwrap();
        assert_eq!(props.get("path"), Some("c:\\"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_escapes() {
        let props = Properties::parse("key\\=with\\:seps=tab\\there \\u00e9\nempty=\n").unwrap();
        assert_eq!(props.get("key=with:seps"), Some("tab\there \u{e9}"));
        assert_eq!(props.get("empty"), Some(""));
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = Properties::parse("ok=1\nbad=\\u12\n").unwrap_err();
        assert_eq!(err, PropertiesError::MalformedUnicodeEscape { line: 2 });
        assert!(Properties::parse("bad=\\uzzzz").is_err());
    }

    #[test]
    fn test_key_without_value() {
        let props = Properties::parse("lonely\n").unwrap();
        assert_eq!(props.get("lonely"), Some(""));
    }
}
