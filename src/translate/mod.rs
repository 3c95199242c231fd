/*!
 * Translation execution for document blocks.
 *
 * This module contains the translation side of the pipeline. It is split
 * into several submodules:
 *
 * - `provider`: The `Translator` trait and the OpenAI-compatible chat
 *   client implementing it
 * - `prompts`: Prompt assembly and response cleanup
 * - `batch`: Concurrent batch execution under the adaptive limiter
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, TaskOutcome};
pub use self::provider::{ChatProvider, Translator};

// Submodules
pub mod batch;
pub mod prompts;
pub mod provider;
