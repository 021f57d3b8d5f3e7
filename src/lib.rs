pub mod config;
pub mod db;
pub mod dict;
pub mod engine;
pub mod llm;
