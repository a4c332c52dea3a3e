//! The site configuration as plain data, and the pure merge that applies an
//! administrator's edits to it.
//!
//! A [`ConfigDocument`] is an ordered list of sections, each an ordered list of
//! `setting = value` pairs with string values. Order follows the file so that a
//! saved file keeps its layout.
//!
//! An [`EditRequest`] is whatever the administrator submitted: any subset of
//! sections and settings. [`update`] applies it to a document without ever
//! adding or removing keys. Settings the document doesn't know are dropped, so
//! a crafted form submission cannot grow the config file.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::error::AdminError;

/// Ordered `section -> setting -> value` view of the site configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

/// One named group of settings, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    settings: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            settings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, appending the section and the setting if
    /// they are new. Used when building a document from a file; edits go
    /// through [`update`], which never appends.
    pub fn insert(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let idx = match self.sections.iter().position(|s| s.name == section) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(section));
                self.sections.len() - 1
            }
        };
        let settings = &mut self.sections[idx].settings;
        match settings.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => settings.push((key.to_string(), value)),
        }
    }

    /// Register an empty section. Sections with no settings still round-trip.
    pub fn add_section(&mut self, section: &str) {
        if self.section(section).is_none() {
            self.sections.push(Section::new(section));
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Total number of settings across all sections.
    pub fn len(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in section.iter() {
                writeln!(f, "{key} = {value}")?;
            }
        }
        Ok(())
    }
}

/// Serializes as a nested map in file order, for presentation layers that
/// want JSON.
impl Serialize for ConfigDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &SectionEntries(section))?;
        }
        map.end()
    }
}

struct SectionEntries<'a>(&'a Section);

impl Serialize for SectionEntries<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.settings.len()))?;
        for (key, value) in &self.0.settings {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Proposed values submitted by an administrator, keyed by section and setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl EditRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.set(section, key, value);
        self
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(BTreeMap::is_empty)
    }

    /// Fold `other` into `self`; on conflicts `other` wins.
    pub fn extend(&mut self, other: EditRequest) {
        for (section, settings) in other.sections {
            self.sections.entry(section).or_default().extend(settings);
        }
    }

    /// Parse one `section.key=value` or `section[key]=value` assignment.
    ///
    /// The value is everything after the first `=`, taken verbatim.
    pub fn parse_assignment(input: &str) -> Result<(String, String, String), AdminError> {
        let invalid = |reason: &str| AdminError::InvalidEdit {
            input: input.into(),
            reason: reason.into(),
        };

        let (target, value) = input
            .split_once('=')
            .ok_or_else(|| invalid("expected SECTION.KEY=VALUE"))?;
        let target = target.trim();

        let (section, key) = match target.strip_suffix(']').and_then(|t| t.split_once('[')) {
            Some(pair) => pair,
            None => target
                .split_once('.')
                .ok_or_else(|| invalid("setting name must be qualified by its section"))?,
        };

        if section.is_empty() || key.is_empty() {
            return Err(invalid("section and setting names must not be empty"));
        }
        Ok((section.into(), key.into(), value.into()))
    }

    /// Build a request from a list of assignments (see [`parse_assignment`](Self::parse_assignment)).
    /// Later assignments to the same setting win.
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self, AdminError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = Self::new();
        for assignment in assignments {
            let (section, key, value) = Self::parse_assignment(assignment.as_ref())?;
            request.set(&section, &key, &value);
        }
        Ok(request)
    }

    /// Build a request from a JSON object of objects:
    /// `{"general": {"base_url": "http://new", "installed": true}}`.
    ///
    /// Strings are taken as-is; numbers and booleans use their JSON text;
    /// `null` leaves the setting out. Anything deeper is rejected.
    pub fn from_json(text: &str) -> Result<Self, AdminError> {
        let invalid = |reason: String| AdminError::InvalidEdit {
            input: "<json>".into(),
            reason,
        };

        let root: serde_json::Value =
            serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
        let serde_json::Value::Object(sections) = root else {
            return Err(invalid("expected an object of sections".into()));
        };

        let mut request = Self::new();
        for (section, settings) in sections {
            let serde_json::Value::Object(settings) = settings else {
                return Err(invalid(format!("section '{section}' must be an object")));
            };
            for (key, value) in settings {
                let raw = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Number(n) => n.to_string(),
                    _ => {
                        return Err(invalid(format!(
                            "'{section}.{key}' must be a string, number or boolean"
                        )));
                    }
                };
                request.set(&section, &key, &raw);
            }
        }
        Ok(request)
    }

    /// Edited settings that `document` doesn't have, as `section.key`.
    /// [`update`] ignores these.
    pub fn unknown_keys(&self, document: &ConfigDocument) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|(section, settings)| {
                settings
                    .keys()
                    .filter(move |key| !document.contains(section, key))
                    .map(move |key| format!("{section}.{key}"))
            })
            .collect()
    }
}

/// Canonicalize boolean-looking input: `true`/`on` become `On`, `false`/`off`
/// become `Off` (any case). Everything else is returned unchanged.
pub fn normalize(raw: &str) -> &str {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on") {
        "On"
    } else if raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("off") {
        "Off"
    } else {
        raw
    }
}

/// Apply `edits` to `document`.
///
/// Only settings present in both are replaced, with their value passed through
/// [`normalize`]. The returned document has exactly the sections and keys of
/// the input.
pub fn update(mut document: ConfigDocument, edits: &EditRequest) -> ConfigDocument {
    for section in &mut document.sections {
        let Some(changes) = edits.sections.get(&section.name) else {
            continue;
        };
        for (key, value) in &mut section.settings {
            if let Some(raw) = changes.get(key.as_str()) {
                *value = normalize(raw).to_string();
            }
        }
    }
    document
}
