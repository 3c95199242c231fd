/*!
 * Single-document orchestration.
 *
 * Glues the stages together for one document: collect tasks, translate
 * them concurrently, reattach the results. The block sequence itself is
 * mutated in place; its set and order never change. Per-fragment
 * failures degrade to markers in the output, never to dropped content;
 * only an empty block stream is a document-level failure.
 */

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::app_config::Config;
use crate::collector::{TaskCollector, TranslationTask};
use crate::document::Document;
use crate::errors::{PipelineError, TranslateError};
use crate::limiter::AdaptiveLimiter;
use crate::reattach;
use crate::registry::Registry;
use crate::terminology::Terminology;
use crate::translate::{BatchTranslator, TaskOutcome, Translator};

/// One failed fragment, for operator review.
#[derive(Debug, Clone)]
pub struct FailedFragment {
    pub block_index: usize,
    pub page_index: usize,
    pub output_field: &'static str,
    pub item_index: usize,
    pub error: TranslateError,
}

/// Summary of one document run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Blocks in the document (unchanged by processing)
    pub block_count: usize,
    /// Translation tasks collected
    pub task_count: usize,
    /// Tasks that produced a translation
    pub translated_count: usize,
    /// Fragments that exhausted retries; their output fields hold the
    /// failure marker
    pub failed: Vec<FailedFragment>,
}

impl PipelineReport {
    /// Whether every collected task translated successfully.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Single-document translation pipeline.
pub struct Pipeline {
    registry: Registry,
    translator: BatchTranslator,
}

impl Pipeline {
    /// Build a pipeline from configuration and a translation
    /// collaborator, loading terminology from the configured directory.
    pub fn new(config: &Config, provider: Arc<dyn Translator>) -> Result<Self> {
        let terminology = match &config.terminology_dir {
            Some(dir) => Terminology::from_dir(dir)?,
            None => Terminology::default(),
        };
        Ok(Self::with_components(
            Registry::standard(),
            provider,
            Arc::new(terminology),
            Arc::new(AdaptiveLimiter::new(&config.concurrency)),
            config,
        ))
    }

    /// Build a pipeline from explicit components. The limiter may be
    /// shared with other pipelines; it is the only cross-call state.
    pub fn with_components(
        registry: Registry,
        provider: Arc<dyn Translator>,
        terminology: Arc<Terminology>,
        limiter: Arc<AdaptiveLimiter>,
        config: &Config,
    ) -> Self {
        Self {
            registry,
            translator: BatchTranslator::new(provider, terminology, limiter, &config.translation),
        }
    }

    /// Replace the kind policy table.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn limiter(&self) -> &Arc<AdaptiveLimiter> {
        self.translator.limiter()
    }

    /// Process one document in place: classify, translate, reattach.
    pub async fn process(&self, document: &mut Document) -> Result<PipelineReport, PipelineError> {
        if document.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        let tasks = TaskCollector::new(&self.registry).collect(document);
        info!(
            "processing document: {} blocks, {} translation tasks",
            document.len(),
            tasks.len()
        );

        let outcomes = self.translator.translate_all(&tasks).await;
        reattach::reattach(document, &tasks, &outcomes);

        Ok(build_report(document.len(), &tasks, &outcomes))
    }
}

fn build_report(
    block_count: usize,
    tasks: &[TranslationTask],
    outcomes: &[TaskOutcome],
) -> PipelineReport {
    let mut report = PipelineReport {
        block_count,
        task_count: tasks.len(),
        ..Default::default()
    };

    for (task, outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            TaskOutcome::Translated(_) => report.translated_count += 1,
            TaskOutcome::Failed(error) => report.failed.push(FailedFragment {
                block_index: task.block_index,
                page_index: task.page_index,
                output_field: task.output_field,
                item_index: task.item_index,
                error: error.clone(),
            }),
        }
    }

    report
}
