//! Headshot studio: turns an uploaded photo into a corporate headshot
//!
//! Accepts a multipart image upload, streams it to Gemini together with a
//! fixed headshot prompt, and relays the first generated image (or the model's
//! text fallback) back to the browser as JSON.

pub mod ai;
pub mod cli;
pub mod error;
pub mod function;
pub mod models;
pub mod prompts;
pub mod reconcile;
pub mod response;
pub mod upload;
pub mod web;

pub use error::{Error, Result};
