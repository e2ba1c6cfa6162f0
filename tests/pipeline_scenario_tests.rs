mod common;

use common::{downloading, ScriptedProducer};
use gin_sync::common::{AppError, StatusEvent};
use gin_sync::pipeline::{self, status_channel, OutputMode};
use gin_sync::ui::{MemoryTerminal, RenderStyle};

#[tokio::test]
async fn download_with_one_timeout_reports_one_failure() {
    let producer = ScriptedProducer::new(vec![
        downloading("f1", "45%"),
        downloading("f1", "100%"),
        StatusEvent::failed("f2", "Downloading", "timeout"),
    ]);
    let mut term = MemoryTerminal::new(Some(60));

    let verdict = pipeline::run(
        producer,
        Vec::new(),
        0,
        false,
        &mut term,
        RenderStyle::default(),
    )
    .await;

    let err = verdict.expect_err("one file failed");
    assert_eq!(err, AppError::OperationsFailed { count: 1 });
    assert_eq!(err.to_string(), "1 operation failed");
    assert_eq!(
        term.screen_lines(),
        vec![" Downloading f1 OK", " Downloading f2 timeout"]
    );
}

#[tokio::test]
async fn last_event_per_file_decides_across_states() {
    let events = vec![
        StatusEvent::complete("a", "Locking"),
        StatusEvent::complete("b", "Locking"),
        StatusEvent::complete("a", "Uploading"),
    ];

    for mode in [
        OutputMode::Plain,
        OutputMode::ProgressBar { nitems: 2 },
        OutputMode::Structured,
    ] {
        let (tx, rx) = status_channel();
        for event in &events {
            tx.send(event.clone());
        }
        drop(tx);

        let mut term = MemoryTerminal::new(None);
        let outcomes = pipeline::render(rx, mode, &mut term, RenderStyle::default()).await;
        assert_eq!(outcomes.get("a"), Some(true), "{mode:?}");
        assert_eq!(outcomes.get("b"), Some(true), "{mode:?}");
        assert_eq!(outcomes.verdict(), Ok(()), "{mode:?}");
    }
}

#[tokio::test]
async fn closed_empty_channel_succeeds_in_every_mode() {
    for (json, nitems) in [(false, 0), (false, 5), (true, 0)] {
        let (tx, rx) = status_channel();
        drop(tx);

        let mut term = MemoryTerminal::new(None);
        let verdict =
            pipeline::format_output(rx, nitems, json, &mut term, RenderStyle::default()).await;
        assert_eq!(verdict, Ok(()));
        assert!(term.contents().is_empty());
    }
}

#[tokio::test]
async fn producer_listing_nothing_closes_immediately() {
    let producer = ScriptedProducer::new(Vec::new());
    let mut term = MemoryTerminal::new(None);

    let verdict = pipeline::run(
        producer.clone(),
        Vec::new(),
        0,
        false,
        &mut term,
        RenderStyle::default(),
    )
    .await;

    assert_eq!(verdict, Ok(()));
    assert_eq!(producer.seen_paths(), Some(Vec::new()));
}

#[tokio::test]
async fn unfinished_file_is_counted_as_failure() {
    let producer = ScriptedProducer::new(vec![
        downloading("done", "100%"),
        downloading("stalled", "30%"),
    ]);
    let mut term = MemoryTerminal::new(None);

    let verdict = pipeline::run(
        producer,
        vec!["done".into(), "stalled".into()],
        2,
        false,
        &mut term,
        RenderStyle::default(),
    )
    .await;

    assert_eq!(verdict, Err(AppError::OperationsFailed { count: 1 }));
}

#[tokio::test]
async fn two_failures_use_plural_summary() {
    let producer = ScriptedProducer::new(vec![
        StatusEvent::failed("a", "Removing content", "only 0 copies"),
        StatusEvent::failed("b", "Removing content", "only 0 copies"),
    ]);
    let mut term = MemoryTerminal::new(None);

    let err = pipeline::run(producer, Vec::new(), 0, true, &mut term, RenderStyle::default())
        .await
        .expect_err("both files failed");

    assert_eq!(err.to_string(), "2 operations failed");
    assert_eq!(term.contents().lines().count(), 2);
}

#[tokio::test]
async fn zero_items_bar_matches_plain_log() {
    let events = vec![
        downloading("f1", "45%"),
        downloading("f1", "100%"),
        StatusEvent::failed("f2", "Downloading", "timeout"),
    ];

    let mut bar_term = MemoryTerminal::new(Some(50));
    let bar = pipeline::render(
        feed(&events),
        OutputMode::ProgressBar { nitems: 0 },
        &mut bar_term,
        RenderStyle::default(),
    )
    .await;

    let mut plain_term = MemoryTerminal::new(Some(50));
    let plain = pipeline::render(
        feed(&events),
        OutputMode::Plain,
        &mut plain_term,
        RenderStyle::default(),
    )
    .await;

    assert_eq!(bar, plain);
    assert_eq!(bar_term.screen_lines(), plain_term.screen_lines());
}

#[tokio::test]
async fn structured_output_is_in_producer_order() {
    let producer = ScriptedProducer::new(vec![
        downloading("b", "10%"),
        downloading("a", "10%"),
        downloading("b", "100%"),
        downloading("a", "100%"),
    ]);
    let mut term = MemoryTerminal::new(None);

    pipeline::run(producer, Vec::new(), 2, true, &mut term, RenderStyle::default())
        .await
        .expect("all complete");

    let order: Vec<(String, String)> = term
        .contents()
        .lines()
        .map(|line| {
            let event: StatusEvent = serde_json::from_str(line).expect("json record");
            (event.file_name, event.progress)
        })
        .collect();
    assert_eq!(
        order,
        vec![
            ("b".to_string(), "10%".to_string()),
            ("a".to_string(), "10%".to_string()),
            ("b".to_string(), "100%".to_string()),
            ("a".to_string(), "100%".to_string()),
        ]
    );
}

fn feed(events: &[StatusEvent]) -> gin_sync::pipeline::StatusReceiver {
    let (tx, rx) = status_channel();
    for event in events {
        tx.send(event.clone());
    }
    rx
}
