/*!
 * # blocktrans
 *
 * A Rust library for translating parsed-document content blocks with
 * adaptive concurrency.
 *
 * The input is the flat, ordered sequence of typed blocks that a document
 * extraction service produces for one PDF (text paragraphs, headers,
 * lists, tables, images, and whatever kinds future extractor versions
 * add). The pipeline decides per block what to translate, fans the
 * resulting text fragments out over a dynamically sized pool of
 * translation calls, and writes the results back onto their originating
 * blocks in the original order.
 *
 * ## Features
 *
 * - Capability-table dispatch over an open set of block kinds; unknown
 *   kinds pass through to output unmodified instead of being dropped
 * - Adaptive rate limiting: concurrency grows under sustained success and
 *   backs off immediately on rate-limit signals from the provider
 * - Terminology substitution with longest-match-first, whole-word,
 *   case-insensitive replacement and URL protection
 * - Per-fragment failure markers instead of silent content loss
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Block and document data model
 * - `registry`: Per-kind translation capability table
 * - `collector`: Translation task collection
 * - `context`: Neighboring-text context windows
 * - `limiter`: Adaptive concurrency controller
 * - `terminology`: Terminology map loading and substitution
 * - `translate`: Translator trait, chat provider client, batch execution
 * - `reattach`: Order-preserving result write-back
 * - `pipeline`: Single-document orchestration
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod collector;
pub mod context;
pub mod document;
pub mod errors;
pub mod limiter;
pub mod pipeline;
pub mod reattach;
pub mod registry;
pub mod terminology;
pub mod translate;

// Re-export main types for easier usage
pub use app_config::Config;
pub use collector::{TaskCollector, TranslationTask};
pub use document::{Block, Document};
pub use errors::{AppError, PipelineError, TerminologyError, TranslateError};
pub use limiter::AdaptiveLimiter;
pub use pipeline::{Pipeline, PipelineReport};
pub use registry::{ExtractionMode, KindEntry, Registry};
pub use terminology::Terminology;
pub use translate::{BatchTranslator, ChatProvider, TaskOutcome, Translator};
