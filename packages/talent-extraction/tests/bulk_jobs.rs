//! Integration tests for bulk jobs run end to end.
//!
//! These tests drive the public API only:
//! 1. Classify and queue a batch
//! 2. Run it through the worker pool and the shared limiter
//! 3. Observe aggregate status while and after it runs

use std::sync::Arc;
use std::time::Duration;

use talent_extraction::{
    testing::{CallbackRecorder, FailingParser, ManualClock},
    traits::fetcher::RawSource,
    BulkJobOrchestrator, Derivation, ExtractionAdapters, ExtractionError, JobCallbacks,
    LabeledResumeParser, MockFetcher, Platform, RateLimiter, ResumeParser, SourceKind,
    TaskStatus,
};

/// Helper to build an orchestrator over a mock fetcher and a frozen clock.
fn setup(
    fetcher: &MockFetcher,
    parser: Arc<dyn ResumeParser>,
    max_concurrent: usize,
    limit: u32,
) -> BulkJobOrchestrator {
    let limiter = RateLimiter::with_clock(limit, Arc::new(ManualClock::at_millis(1_000)));
    let adapters = ExtractionAdapters::new(Arc::new(fetcher.clone()), parser, Arc::new(limiter));
    BulkJobOrchestrator::new(Arc::new(adapters), max_concurrent)
}

#[tokio::test(start_paused = true)]
async fn test_mixed_batch_classified_and_routed() {
    let fetcher = MockFetcher::new().with_latency(Duration::from_millis(100));
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 10);

    let job_id = orchestrator
        .submit(
            ["https://linkedin.com/in/a", "https://github.com/b", "https://bad"],
            JobCallbacks::default(),
        )
        .unwrap();

    let tasks = orchestrator.tasks(job_id.as_str()).unwrap();
    let platforms: Vec<Platform> = tasks.iter().map(|t| t.platform).collect();
    assert_eq!(
        platforms,
        vec![Platform::Linkedin, Platform::Github, Platform::Unknown]
    );
    assert_eq!(orchestrator.get_status(job_id.as_str()).unwrap().total, 3);

    let status = orchestrator.wait_for_completion(job_id.as_str()).await.unwrap();
    assert_eq!(status.total, 3);
    assert_eq!(status.completed, 3);

    // Unknown still gets extracted, as a webpage
    assert!(fetcher
        .calls_for(SourceKind::Webpage)
        .contains(&"https://bad".to_string()));
    let unknown = status
        .results
        .iter()
        .find(|item| item.locator == "https://bad")
        .unwrap();
    assert_eq!(unknown.result.source_kind(), SourceKind::Webpage);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_fails_excess_tasks() {
    let fetcher = MockFetcher::new().with_latency(Duration::from_millis(10));
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 3, 10);

    let locators: Vec<String> = (0..15).map(|i| format!("https://site{i}.example")).collect();
    let job_id = orchestrator
        .submit(locators, JobCallbacks::default())
        .unwrap();
    let status = orchestrator.wait_for_completion(job_id.as_str()).await.unwrap();

    assert_eq!(status.total, 15);
    assert_eq!(status.completed, 10);
    assert_eq!(status.failed, 5);

    let tasks = orchestrator.tasks(job_id.as_str()).unwrap();
    let limited = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Failed)
        .filter(|t| {
            t.error
                .as_deref()
                .is_some_and(|e| e.starts_with("rate limit exceeded for webpage"))
        })
        .count();
    assert_eq!(limited, 5);

    // Rejected tasks never reach the fetcher
    assert_eq!(fetcher.call_count(), 10);
}

#[tokio::test]
async fn test_unknown_job_id() {
    let fetcher = MockFetcher::new();
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 10);

    let err = orchestrator.get_status("does-not-exist").unwrap_err();
    assert!(matches!(err, ExtractionError::JobNotFound { ref job_id } if job_id == "does-not-exist"));

    let err = orchestrator
        .wait_for_completion("does-not-exist")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::JobNotFound { .. }));
}

#[tokio::test]
async fn test_empty_batch_creates_no_job() {
    let fetcher = MockFetcher::new();
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 10);

    let err = orchestrator
        .submit(Vec::<&str>::new(), JobCallbacks::default())
        .unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidArgument { .. }));
    assert!(orchestrator.job_ids().is_empty());
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_document_falls_back_when_parser_fails() {
    let locator = "https://jane.dev/files/resume.pdf";
    let fetcher = MockFetcher::new().with_source(RawSource::new(
        locator,
        "Jane Doe\njane@example.com\n+1 555 123 4567\n\nSKILLS\nRust, Python and Docker\n",
    ));
    let parser = Arc::new(FailingParser::default());
    let orchestrator = setup(&fetcher, parser.clone(), 1, 10);

    let adapters = orchestrator.adapters();
    let result = adapters.extract_document(locator).await.unwrap();
    let record = result.as_document().unwrap();

    assert_eq!(parser.call_count(), 1);
    assert_eq!(record.derivation, Derivation::Fallback);
    let info = record.personal_info.as_ref().unwrap();
    assert_eq!(info.name.as_deref(), Some("Jane Doe"));
    assert_eq!(info.email.as_deref(), Some("jane@example.com"));
    assert!(info.phone.is_some());
    assert_eq!(record.skills, vec!["Rust", "Python", "Docker"]);
    assert_eq!(record.sections[0].heading, "SKILLS");
}

#[tokio::test(start_paused = true)]
async fn test_status_partition_holds_while_running() {
    let fetcher = MockFetcher::new().with_latency(Duration::from_millis(40));
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 3, 100);

    let locators: Vec<String> = (0..12).map(|i| format!("https://p{i}.example")).collect();
    let job_id = orchestrator
        .submit(locators, JobCallbacks::default())
        .unwrap();

    let mut samples = 0;
    loop {
        let status = orchestrator.get_status(job_id.as_str()).unwrap();
        assert_eq!(
            status.completed + status.failed + status.processing + status.pending,
            status.total
        );
        assert!(status.processing <= 3);
        samples += 1;
        if status.is_complete {
            break;
        }
        tokio::time::sleep(Duration::from_millis(7)).await;
    }

    assert!(samples > 1);
    assert!(fetcher.peak_concurrency() <= 3);
    assert!(fetcher.peak_concurrency() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_status_is_stable_after_completion() {
    let fetcher = MockFetcher::new().with_failure("https://down.example", "HTTP 503");
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 10);

    let job_id = orchestrator
        .submit(["https://up.example", "https://down.example"], JobCallbacks::default())
        .unwrap();
    let finished = orchestrator.wait_for_completion(job_id.as_str()).await.unwrap();

    let first = orchestrator.get_status(job_id.as_str()).unwrap();
    let second = orchestrator.get_status(job_id.as_str()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, finished);
    assert_eq!((first.completed, first.failed), (1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_callbacks_fire_for_every_settlement() {
    let fetcher = MockFetcher::new()
        .with_latency(Duration::from_millis(20))
        .with_failure("https://down.example", "HTTP 503");
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 10);
    let recorder = CallbackRecorder::new();

    let job_id = orchestrator
        .submit(
            [
                "https://linkedin.com/in/a",
                "https://down.example",
                "https://github.com/b",
                "https://c.example",
            ],
            recorder.callbacks(),
        )
        .unwrap();
    orchestrator.wait_for_completion(job_id.as_str()).await.unwrap();

    assert_eq!(recorder.progress(), vec![(1, 4), (2, 4), (3, 4), (4, 4)]);

    let mut completed = recorder.completed_locators();
    completed.sort();
    assert_eq!(
        completed,
        vec![
            "https://c.example",
            "https://github.com/b",
            "https://linkedin.com/in/a"
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_jobs_are_tracked_independently() {
    let fetcher = MockFetcher::new().with_latency(Duration::from_millis(30));
    let orchestrator = setup(&fetcher, Arc::new(LabeledResumeParser), 2, 100);

    let first = orchestrator
        .submit(["https://a.example"], JobCallbacks::default())
        .unwrap();
    let second = orchestrator
        .submit(
            ["https://b.example", "https://c.example"],
            JobCallbacks::default(),
        )
        .unwrap();
    assert_ne!(first, second);

    let second_status = orchestrator.wait_for_completion(second.as_str()).await.unwrap();
    let first_status = orchestrator.wait_for_completion(first.as_str()).await.unwrap();

    assert_eq!(first_status.total, 1);
    assert_eq!(second_status.total, 2);
    assert_eq!(first_status.results[0].locator, "https://a.example");
    assert_eq!(
        second_status
            .results
            .iter()
            .map(|r| r.locator.as_str())
            .collect::<Vec<_>>(),
        vec!["https://b.example", "https://c.example"]
    );
}
