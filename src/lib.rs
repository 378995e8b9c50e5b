//! Relnotes - changelogs from GitHub history, written by a language model
//!
//! Relnotes fetches the commits between two refs (or every release in a
//! date window) from GitHub, condenses them into compact summaries, asks an
//! OpenAI-compatible model to categorize and describe them, and renders the
//! answer as markdown.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Fetch → Summarize → Ask → Render → Write
//! - [`core`] - Domain types, configuration, commit summaries, release timelines
//! - [`forge`] - Abstraction for remote forges (GitHub)
//! - [`llm`] - Language model client, prompts and response parsing
//! - [`ui`] - Markdown rendering and user interaction utilities
//!
//! # Guarantees
//!
//! 1. Inputs and credentials are validated before any network call
//! 2. All network calls run in sequence, one at a time
//! 3. Rendering is deterministic for a given model answer
//! 4. Any failure aborts the run before output is written

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod llm;
pub mod ui;
