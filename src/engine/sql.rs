use serde::Deserialize;

/// Expected reply envelope: `{"sql": "..."}`.
#[derive(Debug, Deserialize)]
struct SqlEnvelope {
    #[serde(default)]
    sql: String,
}

/// Extract a SQL statement from a model reply.
///
/// Models routinely wrap the requested JSON in markdown fences, or skip the
/// envelope and answer with bare SQL. Strip fences first, then try the JSON
/// envelope, then fall back to treating the cleaned text as SQL itself.
pub fn extract_sql(reply: &str) -> Option<String> {
    let cleaned = strip_fences(reply);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(envelope) = serde_json::from_str::<SqlEnvelope>(&cleaned) {
        let sql = envelope.sql.trim();
        if sql.is_empty() {
            return None;
        }
        return Some(sql.to_string());
    }

    Some(cleaned)
}

/// Remove ```json / ```sql / ``` fence markers.
fn strip_fences(input: &str) -> String {
    input
        .replace("```json", "")
        .replace("```sql", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_fenced_json() {
        let reply = "```json\n{\"sql\": \"SELECT * FROM loans\"}\n```";
        assert_eq!(extract_sql(reply), Some("SELECT * FROM loans".to_string()));
    }

    #[test]
    fn test_extract_from_plain_json() {
        let reply = r#"{"sql": "SELECT COUNT(*) FROM customers"}"#;
        assert_eq!(
            extract_sql(reply),
            Some("SELECT COUNT(*) FROM customers".to_string())
        );
    }

    #[test]
    fn test_extract_from_fenced_raw_sql() {
        let reply = "```sql\nSELECT name FROM customers WHERE kyc_status = 'verified'\n```";
        assert_eq!(
            extract_sql(reply),
            Some("SELECT name FROM customers WHERE kyc_status = 'verified'".to_string())
        );
    }

    #[test]
    fn test_bare_text_falls_back_to_sql() {
        let reply = "SELECT SUM(amount) FROM transactions";
        assert_eq!(extract_sql(reply), Some(reply.to_string()));
    }

    #[test]
    fn test_empty_reply() {
        assert_eq!(extract_sql(""), None);
        assert_eq!(extract_sql("```\n```"), None);
    }

    #[test]
    fn test_envelope_with_empty_sql() {
        assert_eq!(extract_sql(r#"{"sql": "  "}"#), None);
    }
}
