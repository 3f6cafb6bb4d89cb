//! Token escaping shared by the INI encoder and decoder.

use crate::value::Value;

/// True when `token` is wrapped in a matching pair of `"` or `'`
pub fn is_quoted(token: &str) -> bool {
    token.len() > 1
        && ((token.starts_with('"') && token.ends_with('"'))
            || (token.starts_with('\'') && token.ends_with('\'')))
}

/// Escape a key, section name or string value for output.
///
/// Tokens the plain form cannot carry (including anything starting with a
/// quote) are written as a JSON string literal; everything else is written
/// as is with `;` and `#` escaped.
pub fn escape(token: &str) -> String {
    if needs_quoting(token) {
        return serde_json::Value::String(token.to_string()).to_string();
    }
    token.replace(';', "\\;").replace('#', "\\#")
}

fn needs_quoting(token: &str) -> bool {
    token.contains(['=', '\r', '\n'])
        || token.starts_with(['[', '"', '\''])
        || is_quoted(token)
        || token != token.trim()
        || has_ambiguous_backslash(token)
}

// `\\`, `\;` and `\#` would be read back as escapes.
fn has_ambiguous_backslash(token: &str) -> bool {
    token
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'\\' && matches!(pair[1], b'\\' | b';' | b'#'))
}

/// Result of reading a raw key, value or section token
#[derive(Debug, Clone, PartialEq)]
pub enum Unescaped {
    /// Bare token with escapes resolved and inline comment removed
    Plain(String),
    /// Quoted token, decoded as a JSON string literal where possible
    Quoted(String),
}

impl Unescaped {
    /// Use the token as a key
    pub fn into_key(self) -> String {
        match self {
            Unescaped::Plain(text) | Unescaped::Quoted(text) => text,
        }
    }

    /// Use the token as a value; only plain tokens are type-coerced
    pub fn into_value(self) -> Value {
        match self {
            Unescaped::Plain(text) => Value::from_ini_scalar(&text),
            Unescaped::Quoted(text) => Value::String(text),
        }
    }
}

/// Read a raw token from an INI line.
pub fn unescape(raw: &str) -> Unescaped {
    let token = raw.trim();
    if is_quoted(token) {
        // Single quotes are stripped before the JSON attempt, double quotes
        // are part of the JSON literal. Only a JSON string is accepted, so
        // `'42'` stays the string "42".
        let literal = if token.starts_with('\'') {
            &token[1..token.len() - 1]
        } else {
            token
        };
        return match serde_json::from_str::<serde_json::Value>(literal) {
            Ok(serde_json::Value::String(text)) => Unescaped::Quoted(text),
            _ => Unescaped::Quoted(literal.to_string()),
        };
    }

    let mut out = String::with_capacity(token.len());
    let mut escaped = false;
    for c in token.chars() {
        if escaped {
            if !matches!(c, '\\' | ';' | '#') {
                out.push('\\');
            }
            out.push(c);
            escaped = false;
        } else if c == ';' || c == '#' {
            break;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    if escaped {
        out.push('\\');
    }
    Unescaped::Plain(out.trim().to_string())
}
