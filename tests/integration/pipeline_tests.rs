/*!
 * End-to-end tests for single-document translation.
 *
 * All tests run against the scripted mock translator; no network calls
 * are made.
 */

use std::sync::Arc;

use blocktrans::errors::{PipelineError, TranslateError};
use blocktrans::reattach::failure_placeholder;
use blocktrans::{Block, Document, Pipeline, Registry, Terminology};
use serde_json::json;

use crate::common::mock_provider::MockTranslator;
use crate::common::{init_test_logging, sample_document_json, test_config, test_pipeline};

#[tokio::test]
async fn test_process_withSampleDocument_shouldTranslateAndPreserveOrder() {
    init_test_logging();
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    let pipeline = test_pipeline(mock.clone(), &config);

    let mut document = Document::from_json(sample_document_json()).unwrap();
    let untouched_before = serde_json::to_string(&document.blocks[1]).unwrap();

    let report = pipeline.process(&mut document).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.block_count, 3);
    assert_eq!(report.task_count, 3);
    assert_eq!(report.translated_count, 3);
    assert_eq!(mock.call_count(), 3);

    // Block set and order unchanged
    let kinds: Vec<&str> = document.blocks.iter().map(|b| b.kind.as_str()).collect();
    assert_eq!(kinds, vec!["text", "unknown_future_kind", "list"]);

    assert_eq!(
        document.blocks[0].field_text("text_translated"),
        Some("HELLO WORLD")
    );
    // The unknown kind passes through byte for byte
    let untouched_after = serde_json::to_string(&document.blocks[1]).unwrap();
    assert_eq!(untouched_before, untouched_after);

    let items = document.blocks[2].field_list("list_items_translated").unwrap();
    assert_eq!(items, vec!["ALPHA ITEM", "BETA ITEM"]);
}

#[test]
fn test_process_withEmptyDocument_shouldFail() {
    let config = test_config();
    let pipeline = test_pipeline(Arc::new(MockTranslator::new()), &config);

    let mut document = Document::default();
    let result = tokio_test::block_on(pipeline.process(&mut document));
    assert!(matches!(result, Err(PipelineError::EmptyDocument)));
}

#[tokio::test]
async fn test_process_withNothingTranslatable_shouldReportZeroTasks() {
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    let pipeline = test_pipeline(mock.clone(), &config);

    let mut document = Document::new(vec![
        Block::new("header", 0),
        Block::new("page_number", 0),
        Block::new("unknown_future_kind", 1),
    ]);

    let report = pipeline.process(&mut document).await.unwrap();
    assert_eq!(report.task_count, 0);
    assert!(report.is_complete());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_process_withRateLimitThenSuccess_shouldRetryAndBackOff() {
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    mock.fail_next(TranslateError::RateLimited("429".to_string()));
    let pipeline = test_pipeline(mock.clone(), &config);

    let mut block = Block::new("text", 0);
    block.set_field("text", json!("Hello"));
    let mut document = Document::new(vec![block]);

    let report = pipeline.process(&mut document).await.unwrap();

    // One failed attempt plus one successful retry
    assert_eq!(mock.call_count(), 2);
    assert!(report.is_complete());
    assert_eq!(document.blocks[0].field_text("text_translated"), Some("HELLO"));

    // The rate-limit signal halved the worker target (initial 4)
    assert_eq!(pipeline.limiter().current_workers(), 2.0);
}

#[tokio::test]
async fn test_process_withExhaustedRetries_shouldWriteMarker() {
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    // retry_count 2 allows three attempts in total
    for _ in 0..3 {
        mock.fail_next(TranslateError::Timeout("deadline".to_string()));
    }
    let pipeline = test_pipeline(mock.clone(), &config);

    let mut block = Block::new("text", 2);
    block.set_field("text", json!("Hello"));
    let mut document = Document::new(vec![block]);

    let report = pipeline.process(&mut document).await.unwrap();

    assert_eq!(mock.call_count(), 3);
    assert!(!report.is_complete());
    assert_eq!(report.translated_count, 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].block_index, 0);
    assert_eq!(report.failed[0].page_index, 2);
    assert_eq!(report.failed[0].output_field, "text_translated");
    assert!(matches!(report.failed[0].error, TranslateError::Timeout(_)));

    assert_eq!(
        document.blocks[0].field_text("text_translated"),
        Some(failure_placeholder("Hello").as_str())
    );

    // Timeouts never shrink the worker target
    assert_eq!(pipeline.limiter().current_workers(), 4.0);
}

#[tokio::test]
async fn test_process_withInvalidInputItem_shouldFailOnlyThatPosition() {
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    mock.fail_text("item three", TranslateError::InvalidInput("rejected".to_string()));
    let pipeline = test_pipeline(mock.clone(), &config);

    let mut list = Block::new("list", 0);
    list.set_field(
        "list_items",
        json!(["item one", "item two", "item three", "item four", "item five"]),
    );
    let mut document = Document::new(vec![list]);

    let report = pipeline.process(&mut document).await.unwrap();

    // InvalidInput is not retried, so exactly one call per item
    assert_eq!(mock.call_count(), 5);
    assert_eq!(report.task_count, 5);
    assert_eq!(report.translated_count, 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].item_index, 2);
    assert!(matches!(
        report.failed[0].error,
        TranslateError::InvalidInput(_)
    ));

    let items = document.blocks[0].field_list("list_items_translated").unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0], "ITEM ONE");
    assert_eq!(items[2], failure_placeholder("item three"));
    assert_eq!(items[4], "ITEM FIVE");
}

#[tokio::test]
async fn test_process_withTerminology_shouldSubstituteBeforeCalling() {
    let config = test_config();
    let mock = Arc::new(MockTranslator::new());
    let terminology = Terminology::from_map(
        [("transformer".to_string(), "transformateur".to_string())].into(),
    );
    let pipeline = Pipeline::with_components(
        Registry::standard(),
        mock.clone(),
        Arc::new(terminology),
        Arc::new(blocktrans::AdaptiveLimiter::new(&config.concurrency)),
        &config,
    );

    let mut block = Block::new("text", 0);
    block.set_field("text", json!("The Transformer architecture scales."));
    let mut document = Document::new(vec![block]);

    pipeline.process(&mut document).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "The transformateur architecture scales.");
    assert_eq!(
        document.blocks[0].field_text("text_translated"),
        Some("THE TRANSFORMATEUR ARCHITECTURE SCALES.")
    );
}

#[tokio::test]
async fn test_process_withSustainedSuccess_shouldGrowWorkerTarget() {
    let mut config = test_config();
    config.concurrency.increase_interval_secs = 0;
    let mock = Arc::new(MockTranslator::new());
    let pipeline = test_pipeline(mock.clone(), &config);

    // 25 successes cross the 20-sample window once
    let blocks: Vec<Block> = (0..25)
        .map(|i| {
            let mut block = Block::new("text", i);
            block.set_field("text", json!(format!("Paragraph number {}", i)));
            block
        })
        .collect();
    let mut document = Document::new(blocks);

    let report = pipeline.process(&mut document).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.translated_count, 25);
    assert!(pipeline.limiter().current_workers() > 4.0);
}

#[tokio::test]
async fn test_process_runTwice_shouldProduceIdenticalOutput() {
    let config = test_config();
    let pipeline = test_pipeline(Arc::new(MockTranslator::new()), &config);

    let mut document = Document::from_json(sample_document_json()).unwrap();
    pipeline.process(&mut document).await.unwrap();
    let first = serde_json::to_string(&document).unwrap();

    pipeline.process(&mut document).await.unwrap();
    let second = serde_json::to_string(&document).unwrap();
    assert_eq!(first, second);
}
