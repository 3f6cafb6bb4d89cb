use log::debug;

use crate::ini::escape::escape;
use crate::ini::options::EncodeOptions;
use crate::store::Store;
use crate::value::Value;

/// Encode a Store as INI text.
///
/// Scalars and arrays of each level come first, nested stores follow as
/// `[section]` blocks. Null values are skipped.
pub fn encode(store: &Store, options: &EncodeOptions) -> String {
    let out = encode_section(store, options, options.section.as_deref());
    debug!("ini encode: {} keys -> {} bytes", store.len(), out.len());
    out
}

fn encode_section(store: &Store, options: &EncodeOptions, section: Option<&str>) -> String {
    let section = section.filter(|name| !name.is_empty());
    let eol = options.eol();
    let separator = options.separator();
    let array_suffix = if options.bracketed_array { "[]" } else { "" };

    let mut entries: Vec<(&String, &Value)> =
        store.iter().filter(|(_, value)| !value.is_null()).collect();
    if options.sort {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }

    let pad_to = if options.align { pad_width(&entries) } else { 0 };

    let mut out = String::new();
    let mut children: Vec<(&String, &Store)> = Vec::new();

    for &(key, value) in &entries {
        match value {
            Value::Array(items) => {
                let key = pad_end(escape(&format!("{}{}", key, array_suffix)), pad_to);
                for item in items {
                    out.push_str(&key);
                    out.push_str(separator);
                    out.push_str(&encode_value(item));
                    out.push_str(eol);
                }
            }
            Value::Map(child) => children.push((key, child)),
            scalar => {
                out.push_str(&pad_end(escape(key), pad_to));
                out.push_str(separator);
                out.push_str(&encode_value(scalar));
                out.push_str(eol);
            }
        }
    }

    if let Some(name) = section {
        if !out.is_empty() {
            let mut header = format!("[{}]{}", escape(name), eol);
            if options.newline {
                header.push_str(eol);
            }
            out.insert_str(0, &header);
        }
    }

    for (key, child) in children {
        let child_section = match section {
            Some(name) => format!("{} {}", name, key),
            None => key.clone(),
        };
        let block = encode_section(child, options, Some(&child_section));
        if !out.is_empty() && !block.is_empty() {
            out.push_str(eol);
        }
        out.push_str(&block);
    }

    out
}

/// Text for a value on the right of the separator. Arrays and maps nested
/// inside an array have no INI form and are written as JSON text.
fn encode_value(value: &Value) -> String {
    match value {
        Value::String(text) => escape(text),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Map(_) => value.to_json().to_string(),
    }
}

/// Width of the longest escaped non-section key. Array keys are measured
/// with a `[]` suffix whatever the array style.
fn pad_width(entries: &[(&String, &Value)]) -> usize {
    entries
        .iter()
        .filter(|(_, value)| !value.is_map())
        .map(|(key, value)| {
            let key = if value.is_array() {
                format!("{}[]", key)
            } else {
                key.to_string()
            };
            escape(&key).chars().count()
        })
        .max()
        .unwrap_or(0)
}

fn pad_end(text: String, width: usize) -> String {
    if width == 0 {
        return text;
    }
    format!("{:<width$}", text, width = width)
}
