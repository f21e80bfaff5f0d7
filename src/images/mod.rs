//! Image generation module
//!
//! Provides:
//! - Prompt assembly from catalog entries
//! - The product shot generation pipeline

mod gen;
mod prompt;

pub use gen::{extract_image, generate_case_image, GenerateError, GeneratedImage};
pub use prompt::{build_prompt, prompt_preamble, PROMPT_SUFFIX};
