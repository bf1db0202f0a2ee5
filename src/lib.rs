//! # papertriage
//!
//! Hugging Face Papers Interest Triage - LLM Classifier & Prompt Benchmark
//!
//! ## Modules
//!
//! - [`papers`] - Hugging Face daily-papers scraping
//! - [`prompts`] - Persona wrapper, candidate templates, renderer
//! - [`textgen`] - text-generation-webui API client
//! - [`classify`] - Single-abstract classification
//! - [`dataset`] - Labeled TSV dataset loading
//! - [`score`] - Template benchmark over the labeled dataset
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use papertriage::prompts::{default_persona, interest_templates, render};
//!
//! let persona = default_persona();
//! let templates = interest_templates();
//! let prompt = render(&templates[0], &persona, "We study X.");
//! println!("{}", prompt);
//! ```

pub mod classify;
pub mod dataset;
pub mod error;
pub mod papers;
pub mod prompts;
pub mod score;
pub mod textgen;

pub use error::{Result, TriageError};
