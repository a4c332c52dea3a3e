//! Reading and re-rendering the site configuration file.
//!
//! The file is TOML whose top-level tables are sections and whose values are
//! settings. [`parse_document`] flattens it into a [`ConfigDocument`] of
//! strings; [`serialize`] writes a document back into the original text,
//! touching only the values that differ.
//!
//! Edits go through `toml_edit`, so comments, blank lines, key order and the
//! whitespace around each value survive. A replaced value keeps the decor
//! (leading spaces, trailing comment) of the one it replaces, and keeps its
//! TOML type when the new text fits it: `On`/`Off` on a boolean stays a
//! boolean, digits on an integer stay an integer. Anything else becomes a
//! string.

use thiserror::Error;
use toml_edit::{DocumentMut, Item, TableLike, Value};
use tracing::warn;

use crate::document::{ConfigDocument, normalize};

/// The file text is not a section-based config this crate can edit safely.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0}")]
    Syntax(#[from] toml_edit::TomlError),

    #[error("setting '{key}' is not inside a section")]
    OutsideSection { key: String },

    #[error("'{section}.{key}' is a nested table; sections must be flat")]
    NestedTable { section: String, key: String },

    #[error("'{key}' is an array of tables, not a section")]
    ArrayOfTables { key: String },
}

/// Parse config file text into a [`ConfigDocument`].
pub fn parse_document(text: &str) -> Result<ConfigDocument, FormatError> {
    let doc: DocumentMut = text.parse()?;
    read_sections(&doc)
}

/// Render `document` into `original`, replacing only changed values.
///
/// Fails if `original` cannot be parsed. Settings the file doesn't contain
/// are skipped, so the output never has keys the original lacked. When
/// nothing differs the original text is returned unchanged.
pub fn serialize(document: &ConfigDocument, original: &str) -> Result<String, FormatError> {
    let mut doc: DocumentMut = original.parse()?;
    let current = read_sections(&doc)?;

    let mut changed = 0usize;
    for section in document.sections() {
        for (key, value) in section.iter() {
            match current.get(section.name(), key) {
                None => warn!(
                    section = section.name(),
                    key, "setting is missing from the config file; not written"
                ),
                Some(existing) if existing == value => {}
                Some(_) => {
                    if replace_value(&mut doc, section.name(), key, value) {
                        changed += 1;
                    }
                }
            }
        }
    }

    if changed == 0 {
        return Ok(original.to_string());
    }
    Ok(restore_line_endings(doc.to_string(), original))
}

/// `toml_edit` renders every line break as `\n`; put back CRLF when the
/// original used it.
fn restore_line_endings(rendered: String, original: &str) -> String {
    if !original.contains("\r\n") {
        return rendered;
    }
    rendered.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn read_sections(doc: &DocumentMut) -> Result<ConfigDocument, FormatError> {
    let mut document = ConfigDocument::new();
    for (name, item) in doc.iter() {
        let table = match item {
            Item::None => continue,
            Item::ArrayOfTables(_) => {
                return Err(FormatError::ArrayOfTables { key: name.into() });
            }
            other => other
                .as_table_like()
                .ok_or_else(|| FormatError::OutsideSection { key: name.into() })?,
        };

        document.add_section(name);
        read_settings(&mut document, name, table)?;
    }
    Ok(document)
}

fn read_settings(
    document: &mut ConfigDocument,
    section: &str,
    table: &dyn TableLike,
) -> Result<(), FormatError> {
    for (key, item) in table.iter() {
        match item {
            Item::None => {}
            Item::Value(value) => document.insert(section, key, render_value(value)),
            Item::Table(_) | Item::ArrayOfTables(_) => {
                return Err(FormatError::NestedTable {
                    section: section.into(),
                    key: key.into(),
                });
            }
        }
    }
    Ok(())
}

/// String form of a TOML value as shown to administrators.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.value().clone(),
        Value::Integer(i) => i.value().to_string(),
        // Debug keeps the fraction: 1.0 renders as "1.0", not "1".
        Value::Float(f) => format!("{:?}", f.value()),
        Value::Boolean(b) => String::from(if *b.value() { "On" } else { "Off" }),
        Value::Datetime(d) => d.value().to_string(),
        Value::Array(_) | Value::InlineTable(_) => {
            let mut bare = value.clone();
            bare.decor_mut().clear();
            bare.to_string()
        }
    }
}

/// Build the replacement for `existing`, keeping its type when `raw` fits it.
fn coerce_value(existing: &Value, raw: &str) -> Value {
    let typed = match existing {
        Value::Boolean(_) => match normalize(raw) {
            "On" => Some(Value::from(true)),
            "Off" => Some(Value::from(false)),
            _ => None,
        },
        Value::Integer(_) => raw.trim().parse::<i64>().ok().map(Value::from),
        Value::Float(_) => raw.trim().parse::<f64>().ok().map(Value::from),
        Value::Datetime(_) => raw
            .trim()
            .parse::<toml_edit::Datetime>()
            .ok()
            .map(Value::from),
        Value::Array(_) => raw.parse::<Value>().ok().filter(Value::is_array),
        Value::InlineTable(_) => raw.parse::<Value>().ok().filter(Value::is_inline_table),
        Value::String(_) => None,
    };
    typed.unwrap_or_else(|| Value::from(raw))
}

fn replace_value(doc: &mut DocumentMut, section: &str, key: &str, raw: &str) -> bool {
    let Some(existing) = doc
        .get_mut(section)
        .and_then(Item::as_table_like_mut)
        .and_then(|table| table.get_mut(key))
        .and_then(Item::as_value_mut)
    else {
        return false;
    };

    let mut replacement = coerce_value(existing, raw);
    *replacement.decor_mut() = existing.decor().clone();
    *existing = replacement;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EditRequest, update};
    use crate::fixtures::test::SITE_CONFIG;

    #[test]
    fn parse_reads_sections_in_order() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let names: Vec<&str> = doc.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["general", "database", "cache"]);
        assert_eq!(doc.get("general", "base_url"), Some("http://old.example.org"));
    }

    #[test]
    fn parse_renders_scalars_as_strings() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        assert_eq!(doc.get("general", "installed"), Some("Off"));
        assert_eq!(doc.get("database", "persistent"), Some("On"));
        assert_eq!(doc.get("database", "port"), Some("3306"));
        assert_eq!(doc.get("cache", "web_cache_hours"), Some("1.5"));
        assert_eq!(doc.get("cache", "locales"), Some(r#"["en_US", "fr_CA"]"#));
    }

    #[test]
    fn parse_accepts_inline_table_sections() {
        let doc = parse_document("general = { installed = true, title = \"x\" }\n").unwrap();
        assert_eq!(doc.get("general", "installed"), Some("On"));
        assert_eq!(doc.get("general", "title"), Some("x"));
    }

    #[test]
    fn parse_keeps_empty_sections() {
        let doc = parse_document("[general]\n\n[email]\n").unwrap();
        assert_eq!(doc.sections().len(), 2);
        assert!(doc.section("email").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_bare_settings() {
        let err = parse_document("installed = true\n").unwrap_err();
        assert!(matches!(err, FormatError::OutsideSection { key } if key == "installed"));
    }

    #[test]
    fn parse_rejects_nested_tables() {
        let err = parse_document("[general]\na = 1\n[general.sub]\nb = 2\n").unwrap_err();
        assert!(matches!(err, FormatError::NestedTable { .. }));
    }

    #[test]
    fn parse_rejects_array_of_tables() {
        let err = parse_document("[[plugins]]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, FormatError::ArrayOfTables { .. }));
    }

    #[test]
    fn parse_rejects_syntax_errors() {
        let err = parse_document("[general\ninstalled = ").unwrap_err();
        assert!(matches!(err, FormatError::Syntax(_)));
    }

    #[test]
    fn serialize_no_op_is_byte_identical() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let out = serialize(&update(doc, &EditRequest::new()), SITE_CONFIG).unwrap();
        assert_eq!(out, SITE_CONFIG);
    }

    #[test]
    fn serialize_same_values_is_byte_identical() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new()
            .with("general", "installed", "off")
            .with("database", "port", "3306");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert_eq!(out, SITE_CONFIG);
    }

    #[test]
    fn serialize_replaces_only_changed_values() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("general", "base_url", "http://new.example.org");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();

        let expected = SITE_CONFIG.replace("http://old.example.org", "http://new.example.org");
        assert_eq!(out, expected);
    }

    #[test]
    fn serialize_keeps_trailing_comment() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("general", "base_url", "http://new");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(out.contains("base_url = \"http://new\"   # public address"));
        assert!(out.contains("# Set to On once installation has completed"));
    }

    #[test]
    fn serialize_keeps_boolean_type() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("general", "installed", "TRUE");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(out.contains("installed = true\n"));
        assert_eq!(parse_document(&out).unwrap().get("general", "installed"), Some("On"));
    }

    #[test]
    fn serialize_keeps_integer_type() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("database", "port", "5432");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(out.contains("port = 5432\n"));
    }

    #[test]
    fn serialize_falls_back_to_string() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("database", "port", "default");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(out.contains("port = \"default\"\n"));
    }

    #[test]
    fn serialize_rewrites_arrays() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("cache", "locales", r#"["en_US"]"#);
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(out.contains(r#"locales = ["en_US"]"#));
    }

    #[test]
    fn serialize_keeps_crlf_line_endings() {
        let original = "[general]\r\n# c\r\ninstalled = false\r\nurl = \"a\"  # x\r\n";
        let doc = parse_document(original).unwrap();
        let edits = EditRequest::new().with("general", "url", "b");
        let out = serialize(&update(doc, &edits), original).unwrap();
        assert_eq!(out, original.replace("\"a\"", "\"b\""));
    }

    #[test]
    fn serialize_keeps_lf_when_original_has_no_crlf() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let edits = EditRequest::new().with("database", "port", "5432");
        let out = serialize(&update(doc, &edits), SITE_CONFIG).unwrap();
        assert!(!out.contains('\r'));
    }

    #[test]
    fn float_keeps_its_fraction() {
        let original = "[cache]\nratio = 1.0\n";
        let doc = parse_document(original).unwrap();
        assert_eq!(doc.get("cache", "ratio"), Some("1.0"));

        let edits = EditRequest::new().with("cache", "ratio", "1.0");
        let unchanged = serialize(&update(doc, &edits), original).unwrap();
        assert_eq!(unchanged, original);
    }

    #[test]
    fn serialize_never_adds_keys() {
        let mut doc = parse_document(SITE_CONFIG).unwrap();
        doc.insert("general", "injected", "x");
        doc.insert("extra", "key", "y");
        let out = serialize(&doc, SITE_CONFIG).unwrap();
        assert_eq!(out, SITE_CONFIG);
    }

    #[test]
    fn serialize_rejects_malformed_original() {
        let doc = parse_document(SITE_CONFIG).unwrap();
        let result = serialize(&doc, "[general\nthis is not toml");
        assert!(matches!(result, Err(FormatError::Syntax(_))));
    }

    #[test]
    fn coerce_uses_string_for_unparseable_bool() {
        let existing = Value::from(true);
        assert!(coerce_value(&existing, "maybe").is_str());
        assert!(coerce_value(&existing, "Off").is_bool());
    }
}
