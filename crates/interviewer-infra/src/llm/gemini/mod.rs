//! Google Gemini provider over the native `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
