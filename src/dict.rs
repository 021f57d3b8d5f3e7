use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// The data dictionary: a JSON document describing the tables and columns of
/// the core-banking database. Its internal structure is whatever the
/// institution ships — we carry it opaquely and embed it verbatim into the
/// SQL-generation prompt.
#[derive(Debug, Clone)]
pub struct DataDictionary {
    raw: Value,
}

impl DataDictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Data dictionary not found at {}", path.display()))?;
        let raw: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in data dictionary {}", path.display()))?;
        Ok(Self { raw })
    }

    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Pretty-printed JSON for prompt embedding.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    /// Best-effort table names for startup logging. Handles the two common
    /// shapes: a top-level object keyed by table name, or a `tables` array of
    /// objects carrying a `name` field.
    pub fn table_names(&self) -> Vec<String> {
        match &self.raw {
            Value::Object(map) => {
                if let Some(Value::Array(tables)) = map.get("tables") {
                    tables
                        .iter()
                        .filter_map(|t| t.get("name").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                } else {
                    map.keys().cloned().collect()
                }
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_names_path() {
        let err = DataDictionary::load(Path::new("/nonexistent/dict.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dict.json"));
    }

    #[test]
    fn test_load_and_render() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"accounts": {{"account_id": "primary key"}}}}"#).unwrap();
        let dict = DataDictionary::load(f.path()).unwrap();
        assert!(dict.render().contains("account_id"));
        assert_eq!(dict.table_names(), vec!["accounts"]);
    }

    #[test]
    fn test_table_names_from_tables_array() {
        let dict = DataDictionary::from_value(serde_json::json!({
            "tables": [
                {"name": "customers", "columns": []},
                {"name": "loans", "columns": []}
            ]
        }));
        assert_eq!(dict.table_names(), vec!["customers", "loans"]);
    }

    #[test]
    fn test_table_names_non_object() {
        let dict = DataDictionary::from_value(serde_json::json!(["free-form"]));
        assert!(dict.table_names().is_empty());
    }
}
