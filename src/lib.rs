//! sentrifocus: LLM-backed focus enforcement backend
//!
//! This library provides:
//! - Verdict service that classifies a page as ALLOWED or BLOCKED for a goal
//! - OpenAI-compatible LLM providers (Groq by default)
//! - HTTP server exposing `/verify` to browser extensions
//! - Layered configuration with a fatal check for the API key

pub mod config;
pub mod llm;
pub mod transport;
pub mod verdict;

pub use config::{Config, ConfigError};
pub use verdict::{ClassificationRequest, Decision, Verdict, VerdictService};
