use toml::{Table, Value};

use crate::merge::insert_path;

/// Build a settings layer from `{PREFIX}__SECTION__KEY` environment variables.
///
/// `__` separates levels; single `_` is part of the name. Names are
/// lowercased. Every admin setting is a string or a list of paths, so values
/// stay strings unless they look like a TOML array (`["a", "b"]`).
///
/// Takes the variables as an iterator so tests don't touch the real
/// environment.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let lowered: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        let segments: Vec<&str> = lowered.iter().map(String::as_str).collect();
        insert_path(&mut table, &segments, parse_env_value(&value));
    }

    table
}

fn parse_env_value(s: &str) -> Value {
    let trimmed = s.trim();
    if trimmed.starts_with('[')
        && let Ok(mut wrapper) = toml::from_str::<Table>(&format!("v = {trimmed}"))
        && let Some(array @ Value::Array(_)) = wrapper.remove("v")
    {
        return array;
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn nested_key() {
        let table = env_to_table(
            "ADMINFIG",
            vars(&[("ADMINFIG__SITE__CONFIG_FILE", "/srv/site/config.toml")]),
        );
        assert_eq!(
            table["site"]["config_file"].as_str().unwrap(),
            "/srv/site/config.toml"
        );
    }

    #[test]
    fn numeric_looking_token_stays_string() {
        let table = env_to_table("ADMINFIG", vars(&[("ADMINFIG__ACCESS__TOKEN", "12345")]));
        assert_eq!(table["access"]["token"].as_str().unwrap(), "12345");
    }

    #[test]
    fn array_value_parsed() {
        let table = env_to_table(
            "ADMINFIG",
            vars(&[("ADMINFIG__CACHE__DATA_DIRS", r#"["/tmp/a", "/tmp/b"]"#)]),
        );
        let dirs = table["cache"]["data_dirs"].as_array().unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[1].as_str().unwrap(), "/tmp/b");
    }

    #[test]
    fn broken_array_stays_string() {
        let table = env_to_table("ADMINFIG", vars(&[("ADMINFIG__CACHE__DATA_DIRS", "[oops")]));
        assert_eq!(table["cache"]["data_dirs"].as_str().unwrap(), "[oops");
    }

    #[test]
    fn unrelated_and_bare_prefix_ignored() {
        let table = env_to_table(
            "ADMINFIG",
            vars(&[
                ("OTHER__SITE__CONFIG_FILE", "x"),
                ("ADMINFIG", "x"),
                ("ADMINFIG__", "x"),
                ("ADMINFIG_SITE", "x"),
            ]),
        );
        assert!(table.is_empty());
    }
}
