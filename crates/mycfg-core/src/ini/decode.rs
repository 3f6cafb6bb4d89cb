use std::collections::HashMap;

use log::debug;

use crate::ini::escape::unescape;
use crate::ini::options::DecodeOptions;
use crate::store::Store;
use crate::value::Value;

/// One meaningful line of INI input
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Line<'a> {
    /// `[name]`, holding the raw text between the brackets
    Section(&'a str),
    /// `key` or `key=value`, both raw
    Pair { key: &'a str, value: Option<&'a str> },
}

/// Classify a single line. Blank lines, full-line comments and lines with
/// an empty key return `None`.
pub(crate) fn scan_line(line: &str) -> Option<Line<'_>> {
    let body = line.trim_start();
    if body.is_empty() || body.starts_with([';', '#']) {
        return None;
    }

    if line.starts_with('[') {
        let trimmed = line.trim_end();
        if trimmed.len() >= 2 && trimmed.ends_with(']') {
            return Some(Line::Section(&trimmed[1..trimmed.len() - 1]));
        }
    }

    match separator_index(line) {
        Some(0) => None,
        Some(index) => Some(Line::Pair {
            key: &line[..index],
            value: Some(&line[index + 1..]),
        }),
        None => Some(Line::Pair {
            key: line,
            value: None,
        }),
    }
}

/// Byte index of the `=` that ends the key. A key written as a complete
/// quoted literal may itself contain `=`, so the search skips past its
/// closing quote. Anything else splits at the first `=`.
fn separator_index(line: &str) -> Option<usize> {
    let offset = line.len() - line.trim_start().len();
    let body = &line[offset..];

    let quote_end = match body.as_bytes().first() {
        Some(b'"') => closing_double_quote(body),
        Some(b'\'') => body[1..].find('\'').map(|i| i + 1),
        _ => None,
    };

    if let Some(end) = quote_end {
        let after = end + 1;
        let rest = &body[after..];
        let gap = rest.len() - rest.trim_start().len();
        match rest[gap..].as_bytes().first() {
            Some(b'=') => return Some(offset + after + gap),
            None => return None,
            // the quote closes inside the value, not around the key
            Some(_) => {}
        }
    }

    line.find('=')
}

fn closing_double_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in body.bytes().enumerate().skip(1) {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Decode INI text into a new Store
pub fn decode(text: &str, options: &DecodeOptions) -> Store {
    let mut store = Store::new();
    decode_into(text, &mut store, options);
    store
}

/// Decode INI text on top of an existing Store. Keys from the text
/// overwrite (or, for arrays, extend) what is already there.
pub fn decode_into(text: &str, store: &mut Store, options: &DecodeOptions) {
    debug!("ini decode: {} bytes, bracketed_array={}", text.len(), options.bracketed_array);

    let mut section: Vec<String> = Vec::new();
    let mut seen: HashMap<(Vec<String>, String), usize> = HashMap::new();

    for line in text.split(['\r', '\n']) {
        let Some(scanned) = scan_line(line) else {
            continue;
        };

        match scanned {
            Line::Section(raw) => {
                let name = unescape(raw).into_key();
                let parts: Vec<String> = name
                    .split(' ')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect();
                if parts.is_empty() {
                    continue;
                }
                debug!("ini decode: section [{}]", name);
                section_mut(store, &parts);
                section = parts;
            }
            Line::Pair { key, value } => {
                let raw_key = unescape(key).into_key();
                let is_array = if options.bracketed_array {
                    raw_key.len() > 2 && raw_key.ends_with("[]")
                } else {
                    let count = seen.entry((section.clone(), raw_key.clone())).or_insert(0);
                    *count += 1;
                    *count > 1
                };
                let key = if is_array && raw_key.ends_with("[]") {
                    raw_key[..raw_key.len() - 2].to_string()
                } else {
                    raw_key
                };
                let value = match value {
                    Some(raw) => unescape(raw).into_value(),
                    None => Value::Bool(true),
                };

                let target = section_mut(store, &section);
                assign(target, key, value, is_array);
            }
        }
    }
}

/// Walk (creating as needed) to the section at `path`
fn section_mut<'a>(root: &'a mut Store, path: &[String]) -> &'a mut Store {
    let mut current = root;
    for part in path {
        current = current.child_mut(part);
    }
    current
}

fn assign(target: &mut Store, key: String, value: Value, is_array: bool) {
    if is_array {
        match target.entry_mut(&key) {
            Some(Value::Array(_)) => {}
            Some(existing) => {
                let previous = std::mem::take(existing);
                *existing = Value::Array(vec![previous]);
            }
            None => {
                target.insert(key.clone(), Value::Array(Vec::new()));
            }
        }
    }

    // An existing array keeps growing even when the brackets are missing
    match target.entry_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        _ => {
            target.insert(key, value);
        }
    }
}
