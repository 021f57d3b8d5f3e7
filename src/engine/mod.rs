pub mod prompts;
pub mod sql;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::db::{Database, QueryResult};
use crate::dict::DataDictionary;
use crate::llm::{LlmClient, Message};

#[derive(Debug)]
pub struct AskOutcome {
    pub sql: String,
    pub rows: usize,
    pub answer: String,
}

/// The ask pipeline: question → generated SQL → query result → answer.
pub struct AskEngine {
    llm: Arc<LlmClient>,
    dict: DataDictionary,
    db: Arc<Database>,
}

impl AskEngine {
    pub fn new(llm: Arc<LlmClient>, dict: DataDictionary, db: Arc<Database>) -> Self {
        Self { llm, dict, db }
    }

    pub async fn ask(&self, question: &str) -> Result<AskOutcome> {
        let sql = self.generate_sql(question).await?;
        debug!(sql, "Executing generated query");

        let db = self.db.clone();
        let statement = sql.clone();
        let result = tokio::task::spawn_blocking(move || db.run_query(&statement))
            .await
            .context("Query task panicked")??;

        let rendered = render_result(&result);
        debug!(rows = result.rows.len(), "─── Query Result ───");
        for line in rendered.lines().take(20) {
            debug!("  │ {}", line);
        }

        let answer_prompt = prompts::final_answer(question, &rendered);
        debug!("─── Answer Prompt ───");
        for line in answer_prompt.lines() {
            debug!("  │ {}", line);
        }

        let answer = self.llm.complete(&answer_prompt).await?;

        Ok(AskOutcome {
            sql,
            rows: result.rows.len(),
            answer: answer.trim().to_string(),
        })
    }

    /// Ask the model for SQL, with one retry when the reply carries none.
    async fn generate_sql(&self, question: &str) -> Result<String> {
        let prompt = prompts::sql_generation(&self.dict.render(), question);
        debug!("─── SQL Generation Prompt ───");
        for line in prompt.lines().take(40) {
            debug!("  │ {}", line);
        }

        let reply = self.llm.complete(&prompt).await?;
        debug!(reply_len = reply.len(), "SQL generation reply");
        if let Some(found) = sql::extract_sql(&reply) {
            return Ok(found);
        }

        warn!("No usable SQL in reply, retrying once");
        let retry = vec![
            Message::user(prompt),
            Message::assistant(reply),
            Message::user(prompts::RETRY_NUDGE),
        ];
        let reply = self.llm.chat(&retry).await?;
        sql::extract_sql(&reply).context("Model produced no usable SQL after retry")
    }
}

/// A 1x1 result is passed to the answer prompt as the bare scalar, anything
/// else as a JSON dump of the rows.
fn render_result(result: &QueryResult) -> String {
    match result.scalar() {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => serde_json::to_string(&result.rows).unwrap_or_else(|_| "[]".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scalar_string_unquoted() {
        let result = QueryResult {
            columns: vec!["name".to_string()],
            rows: vec![vec![Value::String("Asha".to_string())]],
        };
        assert_eq!(render_result(&result), "Asha");
    }

    #[test]
    fn test_render_scalar_number() {
        let result = QueryResult {
            columns: vec!["count".to_string()],
            rows: vec![vec![Value::from(42)]],
        };
        assert_eq!(render_result(&result), "42");
    }

    #[test]
    fn test_render_multi_row_as_json() {
        let result = QueryResult {
            columns: vec!["id".to_string()],
            rows: vec![vec![Value::from(1)], vec![Value::from(2)]],
        };
        assert_eq!(render_result(&result), "[[1],[2]]");
    }

    #[test]
    fn test_render_empty_result() {
        let result = QueryResult {
            columns: vec!["id".to_string()],
            rows: vec![],
        };
        assert_eq!(render_result(&result), "[]");
    }
}
