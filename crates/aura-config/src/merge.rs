//! Deep merge of TOML values.
//!
//! The merge works on raw [`toml::Value`] trees rather than deserialized
//! structs, so a key missing from an overlay never overrides the base.

/// Recursively deep-merge `overlay` into `base`.
///
/// - Tables merge recursively per-field.
/// - Scalars and arrays from the overlay **replace** the base value.
pub fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Navigate into a nested value by path segments.
pub(crate) fn get_nested<'a>(val: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    let mut current = val;
    for segment in path {
        current = current.as_table()?.get(*segment)?;
    }
    Some(current)
}

/// Set a value at a nested path, creating intermediate tables as needed.
pub(crate) fn set_nested(val: &mut toml::Value, path: &[&str], new_val: toml::Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = val;
    for segment in parents {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry((*segment).to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    if let Some(table) = current.as_table_mut() {
        table.insert((*last).to_owned(), new_val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_tables_merge_scalars_replace() {
        let mut base = parse(
            r#"
            [terminal]
            history_limit = 100
            apps = ["notepad", "settings"]
            [terminal.effects]
            speed = 1.0
            "#,
        );
        let overlay = parse(
            r#"
            [terminal]
            apps = ["notepad"]
            [terminal.effects]
            speed = 0.5
            "#,
        );
        deep_merge(&mut base, &overlay);

        assert_eq!(
            get_nested(&base, &["terminal", "history_limit"]).and_then(toml::Value::as_integer),
            Some(100)
        );
        assert_eq!(
            get_nested(&base, &["terminal", "apps"])
                .and_then(toml::Value::as_array)
                .map(Vec::len),
            Some(1)
        );
        assert_eq!(
            get_nested(&base, &["terminal", "effects", "speed"]).and_then(toml::Value::as_float),
            Some(0.5)
        );
    }

    #[test]
    fn test_overlay_adds_new_keys() {
        let mut base = parse("[vfs]\nrecent_limit = 10\n");
        deep_merge(&mut base, &parse("[storage]\nbackend = \"memory\"\n"));
        assert_eq!(
            get_nested(&base, &["storage", "backend"]).and_then(toml::Value::as_str),
            Some("memory")
        );
    }

    #[test]
    fn test_set_nested_creates_tables() {
        let mut val = parse("");
        set_nested(
            &mut val,
            &["storage", "data_dir"],
            toml::Value::String("/tmp/aura".into()),
        );
        assert_eq!(
            get_nested(&val, &["storage", "data_dir"]).and_then(toml::Value::as_str),
            Some("/tmp/aura")
        );
    }
}
