//! Strict mode for settings files: reject keys that [`AdminSettings`] doesn't
//! define, with the file and line, so a misspelt `sesions` section fails
//! loudly instead of silently falling back to defaults.

use std::path::Path;

use confique::Config;

use crate::error::AdminError;
use crate::settings::AdminSettings;

type SettingsLayer = <AdminSettings as Config>::Layer;

/// Check one settings file for unknown keys.
pub fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), AdminError> {
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: SettingsLayer = serde_ignored::deserialize(deserializer, |ignored| {
        unknown.push(ignored.to_string());
    })
    .map_err(|e| AdminError::SettingsParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown.is_empty() {
        return Ok(());
    }

    let errors = unknown
        .into_iter()
        .map(|key| AdminError::UnknownKey {
            line: find_key_line(content, &key),
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(AdminError::UnknownKeys(errors))
}

/// 1-based line of a dotted key, tracking `[section]` headers. Best effort:
/// quoted keys and inline tables are not handled. 0 when not found.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let (section, leaf) = match dotted_key.rsplit_once('.') {
        Some((section, leaf)) => (section, leaf),
        None => ("", dotted_key),
    };

    let mut current = String::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix('[')
            && !trimmed.starts_with("[[")
        {
            let header = header.trim_end_matches(']').trim();
            // An unknown section is reported by its header line.
            if header == dotted_key {
                return i + 1;
            }
            current = header.split('.').map(str::trim).collect::<Vec<_>>().join(".");
            continue;
        }

        if current == section
            && let Some(after) = trimmed.strip_prefix(leaf)
            && after.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/etc/adminfig/adminfig.toml")
    }

    fn unknown(content: &str) -> Vec<(String, usize)> {
        match validate_unknown_keys(content, &path()) {
            Err(AdminError::UnknownKeys(errors)) => errors
                .into_iter()
                .map(|e| match e {
                    AdminError::UnknownKey { key, line, .. } => (key, line),
                    other => panic!("Expected UnknownKey, got {other:?}"),
                })
                .collect(),
            other => panic!("Expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn valid_settings_pass() {
        let content = r#"
[site]
config_file = "/srv/site/config.toml"

[cache]
template_dir = "/srv/site/cache/t_compile"
data_dirs = ["/srv/site/cache/data"]
"#;
        assert!(validate_unknown_keys(content, &path()).is_ok());
    }

    #[test]
    fn unknown_key_in_section_has_line() {
        let content = "[site]\nconfig_file = \"x\"\nconfig_fiel = \"y\"\n";
        assert_eq!(unknown(content), [("site.config_fiel".to_string(), 3)]);
    }

    #[test]
    fn misspelt_section_reported() {
        let content = "[site]\nconfig_file = \"x\"\n\n[sesions]\ndir = \"/tmp\"\n";
        let found = unknown(content);
        assert_eq!(found.len(), 1);
        assert!(found[0].0.starts_with("sesions"));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = validate_unknown_keys("[cache]\ndata_dirs = 5\n", &path()).unwrap_err();
        assert!(matches!(err, AdminError::SettingsParse { .. }));
    }

    #[test]
    fn find_key_line_top_level() {
        assert_eq!(find_key_line("a = 1\nstray = 2\n", "stray"), 2);
        assert_eq!(find_key_line("a = 1\n", "missing"), 0);
    }
}
