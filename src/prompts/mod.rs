//! Prompt module for LLM-based operations.
//!
//! This module provides the persona wrapper, the candidate instruction
//! templates, and the template renderer.

pub mod interest;

pub use interest::*;
