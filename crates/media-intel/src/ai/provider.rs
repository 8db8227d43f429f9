//! Provider trait for the text-generation backend behind chart insights.
//!
//! The [`InsightRequester`](super::InsightRequester) only needs "prompt in,
//! text out"; everything backend specific (endpoint, authentication, response
//! decoding) lives behind [`InsightProvider`].
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/` (e.g., `openai.rs`)
//! 2. Implement the [`InsightProvider`] trait for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`

use crate::error::Result;

/// A backend that turns a prompt into generated text.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a requester can be shared.
///
/// # Error Handling
///
/// Implementations report failures with the insight variants of
/// [`DashboardError`](crate::DashboardError): `Authorization`, `Api`,
/// `Transport` and `ResponseShape`. The requester turns them into
/// user-facing text.
pub trait InsightProvider: Send + Sync {
    /// Send one prompt and return the generated text.
    ///
    /// Makes exactly one request; no retries.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}
