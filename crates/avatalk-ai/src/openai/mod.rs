//! OpenAI Assistants API client.
//!
//! Implements the `AssistantApi` trait over the v2 Assistants endpoints
//! (https://api.openai.com/v1/assistants, /threads, /runs).

mod api;
mod client;
mod config;

pub use client::OpenAiAssistants;
pub use config::OpenAiConfig;
