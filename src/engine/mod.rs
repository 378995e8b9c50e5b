//! engine
//!
//! Orchestrates changelog generation.
//!
//! # Lifecycle
//!
//! Every mode runs the same stages, strictly in order:
//!
//! 1. **Fetch**: commits for a range, or reference points and segments for
//!    a date window ([`crate::forge`], [`crate::core::timeline`])
//! 2. **Summarize**: compact commit digests ([`crate::core::summary`])
//! 3. **Ask**: one model call per range or segment ([`crate::llm`])
//! 4. **Render**: deterministic markdown ([`crate::ui::markdown`])
//! 5. **Write**: file or stdout ([`output`])
//!
//! A failure at any stage aborts the run before anything is written.
//!
//! # Example
//!
//! ```ignore
//! use relnotes::engine::Generator;
//!
//! let generator = Generator::new(forge, client, &settings, verbosity)?;
//! generator.validate_access().await?;
//! let changelog = generator.generate(&range).await?;
//! print!("{}", changelog.markdown);
//! ```

pub mod generate;
pub mod output;

pub use generate::{Changelog, GenerateError, Generator, PrTimelineChangelog, TimelineChangelog};
pub use output::{timeline_output_name, write_output, OutputTarget};
