//! Queue protocol integration tests
//!
//! Exercise the public API the way an embedding application would: one
//! shared table, several destinations, publishers and consumers created from
//! independent clients.

mod common;

use common::*;
use sprinkler::queue::api::*;
use sprinkler::store::MemoryStore;
use std::sync::Arc;

#[tokio::test]
async fn test_fan_out_to_every_destination() {
    let (_store, client) = memory_client().await;
    let publisher = client.create_publisher();
    let ctx = CallContext::background();
    for (id, secs) in [("a", 1), ("b", 2), ("c", 3)] {
        assert!(publisher.enqueue(&record(id, secs), &ctx).await.unwrap());
    }

    for destination in ["primary", "secondary"] {
        let consumer = client.create_consumer(destination).unwrap();
        let receipts = consumer.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
        assert_eq!(ids(&receipts), vec!["a", "b", "c"], "{}", destination);
    }
}

#[tokio::test]
async fn test_destinations_progress_independently() {
    let (_store, client) = memory_client().await;
    let ctx = CallContext::background();
    let publisher = client.create_publisher();
    for i in 0..4 {
        publisher
            .enqueue(&record(&i.to_string(), i), &ctx)
            .await
            .unwrap();
    }

    let primary = client.create_consumer("primary").unwrap();
    let secondary = client.create_consumer("secondary").unwrap();

    let first_two = primary.dequeue(&Status::ready(), 2, &ctx).await.unwrap();
    let report = primary
        .acknowledge(&first_two, &Status::delivered(), &ctx)
        .await
        .unwrap();
    assert!(report.all_acknowledged());

    let remaining = primary.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    assert_eq!(ids(&remaining), vec!["2", "3"]);

    let untouched = secondary.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    assert_eq!(ids(&untouched), vec!["0", "1", "2", "3"]);
}

#[tokio::test]
async fn test_duplicate_send_does_not_requeue_delivered_record() {
    let (_store, client) = memory_client().await;
    let ctx = CallContext::background();
    let publisher = client.create_publisher();
    let consumer = client.create_consumer("primary").unwrap();

    publisher.enqueue(&record("1", 1), &ctx).await.unwrap();
    let receipts = consumer.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    consumer
        .acknowledge(&receipts, &Status::delivered(), &ctx)
        .await
        .unwrap();

    assert!(!publisher.enqueue(&record("1", 1), &ctx).await.unwrap());
    assert!(consumer
        .dequeue(&Status::ready(), 10, &ctx)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_newer_version_requeues_for_every_destination() {
    let (_store, client) = memory_client().await;
    let ctx = CallContext::background();
    let publisher = client.create_publisher();
    let primary = client.create_consumer("primary").unwrap();

    publisher.enqueue(&record("1", 1), &ctx).await.unwrap();
    let receipts = primary.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    primary
        .acknowledge(&receipts, &Status::delivered(), &ctx)
        .await
        .unwrap();

    assert!(publisher.enqueue(&record("1", 9), &ctx).await.unwrap());
    let requeued = primary.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    assert_eq!(requeued.len(), 1);
    assert_eq!(requeued[0].timestamp, at(9));
}

#[tokio::test]
async fn test_clients_over_one_store_share_records() {
    let store = Arc::new(MemoryStore::new());
    let producer = provisioned(Arc::clone(&store)).await;
    let reader = QueueClient::new(Arc::clone(&store), QueueConfig::default()).unwrap();
    let ctx = CallContext::background();

    producer
        .create_publisher()
        .enqueue(&record("shared", 1), &ctx)
        .await
        .unwrap();

    let receipts = reader
        .create_consumer("secondary")
        .unwrap()
        .dequeue(&Status::ready(), 10, &ctx)
        .await
        .unwrap();
    assert_eq!(ids(&receipts), vec!["shared"]);
}

#[tokio::test]
async fn test_custom_destination_registry() {
    let store = Arc::new(MemoryStore::new());
    let registry = DestinationRegistry::new(vec![
        Destination::named("billing"),
        Destination::new("audit", "audit-state", "audit-state-index"),
    ])
    .unwrap();
    let config = QueueConfig::new("events", Default::default(), registry).unwrap();
    let ctx = CallContext::background();

    create_schema(store.as_ref(), &config, &ctx).await.unwrap();
    assert!(schema_exists(store.as_ref(), &config, &ctx).await.unwrap());

    let client = QueueClient::new(Arc::clone(&store), config).unwrap();
    client
        .create_publisher()
        .enqueue(&record("1", 1), &ctx)
        .await
        .unwrap();

    let audit = client.create_consumer("audit").unwrap();
    assert_eq!(audit.destination().status_attribute, "audit-state");
    let receipts = audit.dequeue(&Status::ready(), 10, &ctx).await.unwrap();
    assert_eq!(ids(&receipts), vec!["1"]);
    assert!(matches!(
        client.create_consumer("primary"),
        Err(QueueError::UnknownDestination { .. })
    ));

    delete_schema(store.as_ref(), client.config(), &ctx)
        .await
        .unwrap();
    assert!(!schema_exists(store.as_ref(), client.config(), &ctx)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_operations_on_missing_table_explain_the_fix() {
    use sprinkler::core::error_handling::ContextualError;

    let store = Arc::new(MemoryStore::new());
    let client = QueueClient::new(store, QueueConfig::default()).unwrap();
    let err = client
        .create_publisher()
        .enqueue(&record("1", 1), &CallContext::background())
        .await
        .unwrap_err();

    assert!(err.is_user_actionable());
    assert!(err.user_message().unwrap().contains("sprinkler init"));
}

#[tokio::test]
async fn test_concurrent_versions_converge_on_newest() {
    let (store, client) = memory_client().await;
    let ctx = CallContext::background();
    let publisher = client.create_publisher();

    let sends = (0..20).map(|secs| {
        let publisher = publisher.clone();
        let ctx = ctx.clone();
        async move { publisher.enqueue(&record("contended", secs), &ctx).await }
    });
    let results = futures::future::join_all(sends).await;
    assert!(results.iter().all(Result::is_ok));

    let item = store.get_item("sprinkler", "contended").await.unwrap().unwrap();
    assert_eq!(item["timestamp"], sprinkler::core::time::encode_timestamp(&at(19)));
}

#[tokio::test]
async fn test_concurrent_consumers_on_separate_destinations() {
    let (_store, client) = memory_client().await;
    let ctx = CallContext::background();
    let publisher = client.create_publisher();
    for i in 0..6 {
        publisher
            .enqueue(&record(&i.to_string(), i), &ctx)
            .await
            .unwrap();
    }

    let drain = |destination: &'static str| {
        let consumer = client.create_consumer(destination).unwrap();
        let ctx = ctx.clone();
        async move {
            let receipts = consumer.dequeue(&Status::ready(), 10, &ctx).await?;
            consumer
                .acknowledge(&receipts, &Status::delivered(), &ctx)
                .await
        }
    };
    let (primary, secondary) = futures::future::join(drain("primary"), drain("secondary")).await;

    assert_eq!(primary.unwrap().acknowledged().len(), 6);
    assert_eq!(secondary.unwrap().acknowledged().len(), 6);
}
