//! Identifier conversion and name uniquification.

use unicode_ident::{is_xid_continue, is_xid_start};

use crate::error::{Result, SchemaError};

/// Prefix tried when a class name is reserved and no namespace prefix helps.
pub const UNIQUE_PREFIX: &str = "My";

/// Bound on suffixes and prefixes tried before giving up on a name.
pub const MAX_ATTEMPTS: u32 = 10_000;

/// Host-language names a generated class may not take.
pub const RESERVED: &[&str] = &[
    "Object",
    "Thread",
    "Compiler",
    "Class",
    "ClassLoader",
    "Package",
    "String",
    "Boolean",
    "Integer",
    "Long",
    "Short",
    "Double",
    "Float",
    "Byte",
    "Character",
    "int",
    "char",
    "byte",
    "short",
    "long",
    "double",
    "float",
    "boolean",
    "void",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '.' | ':' | ' ' | '#' | '/') || !(c == '_' || is_xid_continue(c))
}

/// Turn a schema name into an identifier.
///
/// Separators are dropped and the character after one is uppercased;
/// underscores and the case of the first letter are kept, so
/// `address_id` stays `address_id` and `po-number` becomes `poNumber`.
pub fn convert_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if is_separator(c) {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    match out.chars().next() {
        None => "_".to_string(),
        Some(first) if first != '_' && !is_xid_start(first) => format!("_{out}"),
        Some(_) => out,
    }
}

/// [`convert_name`] with the first letter uppercased, for class names.
pub fn class_name(name: &str) -> String {
    let converted = convert_name(name);
    let mut chars = converted.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => converted,
    }
}

/// Constant spelling of a schema name: `poNumber` becomes `PO_NUMBER`.
pub fn const_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || is_separator(c) {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_uppercase());
    }
    let trimmed = out.trim_end_matches('_');
    match trimmed.chars().next() {
        None => "_".to_string(),
        Some(first) if !is_xid_start(first) => format!("_{trimmed}"),
        Some(_) => trimmed.to_string(),
    }
}

/// The first of `base`, `base2`, `base3`, ... that `taken` rejects.
///
/// Returns the chosen suffix (`None` for the bare base) alongside the name
/// so callers can suffix related names the same way.
pub fn next_free(base: &str, mut taken: impl FnMut(&str) -> bool) -> Result<(String, Option<u32>)> {
    if !taken(base) {
        return Ok((base.to_string(), None));
    }
    for count in 2..MAX_ATTEMPTS {
        let candidate = format!("{base}{count}");
        if !taken(&candidate) {
            return Ok((candidate, Some(count)));
        }
    }
    Err(SchemaError::NamingExhausted(base.to_string()))
}
