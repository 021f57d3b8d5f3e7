/// Prompt sent for SQL generation. The data dictionary JSON is embedded
/// verbatim so the model grounds joins and column usage in the real schema.
pub fn sql_generation(schema_json: &str, request: &str) -> String {
    format!(
        r#"You are a SQL generation engine for a reporting tool.

Task: Convert the following request into a valid **SQLite** SQL query.
The database schema is provided below in JSON format.
Use this schema to ensure correct joins, column usage, and filtering.
Do not invent tables or columns that are not in the schema.

Database Schema (JSON):
{schema_json}

Output format must be ONLY JSON:
{{
  "sql": "<SQL query here>"
}}

User request: {request}
"#
    )
}

/// Prompt sent to turn a query result into a natural-language answer.
pub fn final_answer(question: &str, result: &str) -> String {
    format!(
        r#"You are a helpful NBFC banking assistant working with a *synthetic demo dataset*.
This is fictional and safe to share.

The user asked: "{question}"
The database query returned: {result}

Please give a clear, concise, and helpful answer in natural language.
"#
    )
}

/// Nudge appended when the first generation attempt yields no usable SQL.
pub const RETRY_NUDGE: &str = "Your previous reply did not contain a usable SQL query. \
    Reply with ONLY the JSON object {\"sql\": \"...\"} and nothing else.";
