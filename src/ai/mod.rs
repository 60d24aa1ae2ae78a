//! Language model integration for day recaps.
//!
//! # Module Structure
//!
//! - `openai`: HTTP client for OpenAI-compatible chat completion APIs
//! - `prompts`: the recap system prompt and message builder
//!
//! # Example
//!
//! ```no_run
//! use bitacora::ai::{recap_summary_prompt, ChatModel, OpenAIClient};
//! use bitacora::Config;
//!
//! let config = Config::load()?;
//! let client = OpenAIClient::new(&config.openai)?;
//! let recap = client.complete(&recap_summary_prompt("08:00 am Gym"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod openai;
pub mod prompts;

// Re-export commonly used types
pub use openai::{ChatModel, Message, OpenAIClient};
pub use prompts::{recap_summary_prompt, RECAP_SYSTEM_PROMPT};
