//! Cancellation and timeout of in-flight store calls

use super::*;
use crate::queue::{QueueError, Status};
use std::time::{Duration as StdDuration, Instant};

const SLOW: StdDuration = StdDuration::from_secs(10);

#[tokio::test]
async fn test_cancel_aborts_in_flight_dequeue() {
    let (store, client) = client().await;
    enqueue_all(&client, &[record("1", 1)]).await;
    store.faults().set_latency(Some(SLOW)).unwrap();

    let consumer = client.create_consumer("primary").unwrap();
    let ctx = CallContext::background();
    let token = ctx.token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(StdDuration::from_millis(20)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = consumer
        .dequeue(&Status::ready(), 10, &ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, QueueError::Cancelled { operation: "dequeue" }));
    assert!(err.is_cancellation());
    assert!(started.elapsed() < StdDuration::from_secs(5));
}

#[tokio::test]
async fn test_timeout_aborts_in_flight_enqueue() {
    let (store, client) = client().await;
    store.faults().set_latency(Some(SLOW)).unwrap();

    let ctx = CallContext::with_timeout(StdDuration::from_millis(20));
    let started = Instant::now();
    let err = client
        .create_publisher()
        .enqueue(&record("1", 1), &ctx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueueError::TimedOut {
            operation: "enqueue",
            ..
        }
    ));
    assert!(started.elapsed() < StdDuration::from_secs(5));

    store.faults().set_latency(None).unwrap();
    assert_eq!(store.item_count(TABLE).await.unwrap(), 0);
}

#[tokio::test]
async fn test_cancelled_context_fails_before_any_call() {
    let (store, client) = client().await;
    let ctx = CallContext::background();
    ctx.cancel();

    let err = client
        .create_publisher()
        .enqueue(&record("1", 1), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::Cancelled { .. }));
    assert_eq!(store.item_count(TABLE).await.unwrap(), 0);

    let consumer = client.create_consumer("primary").unwrap();
    let err = consumer
        .acknowledge(
            &[crate::queue::Receipt {
                id: "1".into(),
                timestamp: at(1),
                provenance: "p".into(),
            }],
            &Status::delivered(),
            &ctx,
        )
        .await
        .unwrap_err();
    assert!(err.is_cancellation());
    assert!(matches!(err, QueueError::AckInterrupted { ref partial, .. } if partial.is_empty()));
}

#[tokio::test]
async fn test_deadline_spans_every_page() {
    let (store, client) = client_with_page_size(1).await;
    let records: Vec<Record> = (0..3).map(|i| record(&i.to_string(), i)).collect();
    enqueue_all(&client, &records).await;
    store
        .faults()
        .set_latency(Some(StdDuration::from_millis(40)))
        .unwrap();

    // Each page alone fits the deadline; three pages do not
    let ctx = CallContext::with_timeout(StdDuration::from_millis(100));
    let err = client
        .create_consumer("primary")
        .unwrap()
        .dequeue(&Status::ready(), 10, &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::TimedOut { .. }));
}
