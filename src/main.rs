use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};

use bankdesk::config::{CliArgs, LlmSettings};
use bankdesk::db::Database;
use bankdesk::dict::DataDictionary;
use bankdesk::engine::AskEngine;
use bankdesk::llm::LlmClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let level = args.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Load env — the API key comes from the runtime environment only.
    let _ = dotenv::dotenv();
    let settings = LlmSettings::from_env()?;

    let dict = DataDictionary::load(args.dictionary.as_ref())?;
    info!(tables = ?dict.table_names(), "Data dictionary loaded");

    let db = if args.seed.is_some() {
        Database::open_or_create(&args.db)?
    } else {
        Database::open(&args.db)?
    };
    let db = Arc::new(db);

    if let Some(seed_path) = &args.seed {
        let seed_sql = std::fs::read_to_string(seed_path)
            .with_context(|| format!("Seed file not found at {seed_path}"))?;
        db.apply_batch(&seed_sql)?;
        info!(path = %seed_path, "Seed applied");
    }

    let llm = Arc::new(LlmClient::new(&settings)?);
    info!(model = %settings.model, "LLM client initialized");

    let engine = AskEngine::new(llm, dict, db);

    // One-shot mode for scripted use.
    if let Some(question) = &args.question {
        let outcome = engine.ask(question).await?;
        println!("{}", outcome.answer);
        return Ok(());
    }

    run_shell(&engine).await
}

/// Interactive loop: one question per line, errors are reported and the loop
/// continues.
async fn run_shell(engine: &AskEngine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nAsk a question about the NBFC data (or type 'exit'): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match engine.ask(question).await {
            Ok(outcome) => println!("\n[ANSWER]: {}", outcome.answer),
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }

    Ok(())
}
