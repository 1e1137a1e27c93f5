//! # Canonical JSON
//!
//! Two renderings of a JSON value, both deterministic:
//!
//! | Function | Output |
//! |----------|--------|
//! | [`canonical_dumps`] | standard indented form, one scalar per line |
//! | [`pretty_print_json`] | same layout, but numeric arrays on a single line |
//!
//! The pretty form exists for sidecar files people read and diff:
//!
//! ```text
//! {
//!   "ImageOrientationPatientDICOM": [1, 0, 0, 0, 1, 0],
//!   "SeriesDescription": "T1w"
//! }
//! ```
//!
//! Neither form ever carries trailing whitespace, and keys are sorted by
//! default, so output is byte-identical across runs and machines.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::{PrettyOptions, UtilError};

/// Serialize `value` with the standard indenting writer.
///
/// With `sort_keys`, object keys are emitted in lexicographic order at every
/// level; otherwise they follow the map's own iteration order.
///
/// ```rust
/// use serde_json::json;
///
/// let text = niconv_utils::canonical_dumps(&json!({"b": 1, "a": [2]}), 2, true).unwrap();
/// assert_eq!(text, "{\n  \"a\": [\n    2\n  ],\n  \"b\": 1\n}");
/// ```
///
/// # Errors
///
/// [`UtilError::Serialization`] if `value` cannot be represented as JSON.
pub fn canonical_dumps<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
    sort_keys: bool,
) -> Result<String, UtilError> {
    let mut value = serde_json::to_value(value)?;
    if sort_keys {
        sort_keys_in_place(&mut value);
    }

    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
        &mut buf,
        PrettyFormatter::with_indent(indent.as_bytes()),
    );
    value.serialize(&mut ser)?;

    let text = String::from_utf8(buf).map_err(|e| UtilError::Serialization(e.to_string()))?;
    Ok(strip_trailing_whitespace(&text))
}

/// Render `value` for humans: structural indentation, with every array of
/// numbers collapsed onto one line.
///
/// An array is collapsed when it is non-empty and every element is a number
/// or a string made only of `-+.0-9e` characters (a number stored as text,
/// e.g. `"2.5"`). Any other array keeps one element per line.
///
/// ```rust
/// use niconv_utils::{pretty_print_json, PrettyOptions};
/// use serde_json::json;
///
/// let text = pretty_print_json(&json!({"a": [1, 2, 3], "b": "x"}), &PrettyOptions::default()).unwrap();
/// assert_eq!(text, "{\n  \"a\": [1, 2, 3],\n  \"b\": \"x\"\n}");
/// ```
///
/// # Errors
///
/// - [`UtilError::Serialization`] if a scalar cannot be encoded
/// - [`UtilError::InvariantViolation`] if `options.verify` is set and the
///   output does not parse back to `value`
pub fn pretty_print_json(value: &Value, options: &PrettyOptions) -> Result<String, UtilError> {
    let mut printer = Printer {
        options,
        out: String::new(),
    };
    printer.value(value, 0)?;
    let text = printer.out;

    if options.verify {
        verify_round_trip(value, &text)?;
    }
    Ok(text)
}

/// [`pretty_print_json`] for any serializable value.
///
/// # Errors
///
/// [`UtilError::Serialization`] if `value` cannot be represented as JSON
/// (for example a map whose keys are not strings).
pub fn to_pretty_string<T: Serialize + ?Sized>(
    value: &T,
    options: &PrettyOptions,
) -> Result<String, UtilError> {
    let value = serde_json::to_value(value)?;
    pretty_print_json(&value, options)
}

/// Drop bulky vendor fields from an aggregated conversion info structure.
///
/// Inside `global.const` and `time.samples`, removes every key starting with
/// `Csa` and any key equal to `SourceImageSequence` ignoring case. Those
/// fields can be huge and are recoverable from the stored DICOMs. The input
/// is left untouched.
pub fn slim_down_info(info: &Value) -> Value {
    let mut slim = info.clone();
    for (outer, inner) in [("global", "const"), ("time", "samples")] {
        if let Some(Value::Object(fields)) = slim.get_mut(outer).and_then(|v| v.get_mut(inner)) {
            fields.retain(|key, _| {
                !(key.starts_with("Csa") || key.eq_ignore_ascii_case("sourceimagesequence"))
            });
        }
    }
    slim
}

struct Printer<'a> {
    options: &'a PrettyOptions,
    out: String,
}

impl Printer<'_> {
    fn value(&mut self, value: &Value, depth: usize) -> Result<(), UtilError> {
        match value {
            Value::Array(items) => self.array(items, depth),
            Value::Object(map) => self.object(map, depth),
            scalar => self.scalar(scalar),
        }
    }

    fn scalar(&mut self, value: &Value) -> Result<(), UtilError> {
        self.out.push_str(&serde_json::to_string(value)?);
        Ok(())
    }

    fn array(&mut self, items: &[Value], depth: usize) -> Result<(), UtilError> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }

        if items.iter().all(is_numeric_scalar) {
            self.out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.scalar(item)?;
            }
            self.out.push(']');
            return Ok(());
        }

        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            self.value(item, depth + 1)?;
        }
        self.newline(depth);
        self.out.push(']');
        Ok(())
    }

    fn object(&mut self, map: &Map<String, Value>, depth: usize) -> Result<(), UtilError> {
        if map.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }

        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        if self.options.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }

        self.out.push('{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline(depth + 1);
            self.out.push_str(&serde_json::to_string(key)?);
            self.out.push_str(": ");
            self.value(value, depth + 1)?;
        }
        self.newline(depth);
        self.out.push('}');
        Ok(())
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
    }
}

fn is_numeric_scalar(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| matches!(c, '-' | '+' | '.' | 'e' | '0'..='9'))
        }
        _ => false,
    }
}

fn sort_keys_in_place(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(sort_keys_in_place),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys_in_place(&mut child);
                map.insert(key, child);
            }
        }
        _ => {}
    }
}

// Some writers put a space before each newline when indenting.
fn strip_trailing_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn verify_round_trip(original: &Value, text: &str) -> Result<(), UtilError> {
    let parsed: Value = serde_json::from_str(text).map_err(|e| UtilError::InvariantViolation {
        check: "json round-trip",
        details: format!("formatted output does not parse: {e}"),
    })?;
    if parsed != *original {
        return Err(UtilError::InvariantViolation {
            check: "json round-trip",
            details: "formatted output parses to a different value".to_string(),
        });
    }
    Ok(())
}
