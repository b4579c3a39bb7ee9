//! Storybook generator - turns a short family memory into an illustrated PDF
//!
//! A rhyming story is written by Gemini, each page is illustrated within one
//! style-guided image session, and the pages are laid out as a square picture
//! book with a patterned cover and a back-cover message.

pub mod ai;
pub mod app;
pub mod book;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod models;
pub mod prompts;
pub mod story;

pub use error::{Error, Result};
