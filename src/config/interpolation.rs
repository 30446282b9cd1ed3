//! Placeholder expressions embedded in configuration values.
//!
//! Syntax: `${name:arg1,arg2,...}`. Arguments are trimmed and may be quoted
//! with `'` or `"` to keep commas or surrounding spaces. `\${` is a literal `${`.
//!
//! A string that is exactly one placeholder takes the resolver's value as-is
//! (a list stays a list). Placeholders inside longer strings are replaced by
//! the string form of their value.

use super::resolvers::ResolverRegistry;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;

/// A piece of a parsed string value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Call { name: String, args: Vec<String> },
}

/// Resolve every placeholder in `value`, recursing through mappings and lists.
///
/// Mapping keys are never interpolated.
pub fn resolve_tree(value: Value, registry: &ResolverRegistry) -> ConfigResult<Value> {
    match value {
        Value::String(s) => resolve_str(&s, registry),
        Value::Array(items) => items
            .into_iter()
            .map(|item| resolve_tree(item, registry))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key, resolve_tree(item, registry)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other),
    }
}

/// Whether `s` contains an unescaped placeholder.
pub fn has_placeholder(s: &str) -> bool {
    matches!(parse(s), Ok(segments) if segments.iter().any(|s| matches!(s, Segment::Call { .. })))
}

fn resolve_str(s: &str, registry: &ResolverRegistry) -> ConfigResult<Value> {
    if !s.contains("${") {
        return Ok(Value::String(s.to_string()));
    }

    let segments = parse(s).map_err(|reason| {
        ConfigError::configuration(format!("invalid interpolation in '{}': {}", s, reason))
    })?;

    if let [Segment::Call { name, args }] = segments.as_slice() {
        return call(name, args, registry);
    }

    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Call { name, args } => out.push_str(&render(&call(&name, &args, registry)?)),
        }
    }
    Ok(Value::String(out))
}

fn call(name: &str, args: &[String], registry: &ResolverRegistry) -> ConfigResult<Value> {
    let resolver = registry.get(name).ok_or_else(|| {
        ConfigError::configuration(format!("Unsupported interpolation type {}", name))
    })?;
    tracing::debug!(resolver = %name, ?args, "Resolving placeholder");
    resolver.resolve(args).map_err(|e| {
        ConfigError::configuration(format!("error resolving '${{{}:{}}}': {}", name, args.join(","), e))
    })
}

/// String form of a resolved value used inside a longer string.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}

fn parse(s: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = s;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("\\${") {
            literal.push_str("${");
            rest = after;
        } else if let Some(after) = rest.strip_prefix("${") {
            let end = closing_brace(after).ok_or_else(|| "unterminated '${'".to_string())?;
            let body = &after[..end];
            if body.contains("${") {
                return Err("nested interpolation is not supported".to_string());
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(parse_call(body)?);
            rest = &after[end + 1..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Byte offset of the first `}` that is not inside a quoted argument.
fn closing_brace(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '}') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

fn parse_call(body: &str) -> Result<Segment, String> {
    let Some((name, raw_args)) = body.split_once(':') else {
        return Err(format!(
            "'${{{}}}' is not a resolver call; expected ${{name:args}}",
            body
        ));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("empty resolver name".to_string());
    }
    Ok(Segment::Call {
        name: name.to_string(),
        args: split_args(raw_args)?,
    })
}

fn split_args(raw: &str) -> Result<Vec<String>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => {
                args.push(finish_arg(&current));
                current.clear();
            }
            (None, c) => current.push(c),
        }
    }
    if let Some(q) = quote {
        return Err(format!("unterminated {} quote in arguments", q));
    }
    args.push(finish_arg(&current));
    Ok(args)
}

fn finish_arg(raw: &str) -> String {
    let trimmed = raw.trim();
    for q in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(q) && trimmed.ends_with(q) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}
