//! Subcommands run end to end against an in-memory store

use sprinkler::app::cli::{Command, InitArgs, ReceiveArgs, StreamArgs};
use sprinkler::app::commands::{dispatch, CommandEnv};
use sprinkler::schema::QueueConfig;
use sprinkler::store::{KeyValueStore, MemoryStore};
use std::io::Cursor;
use std::sync::Arc;

type Env = CommandEnv<Cursor<Vec<u8>>, Vec<u8>>;

fn env(store: &Arc<MemoryStore>, answers: &str) -> Env {
    CommandEnv::new(
        Arc::clone(store) as Arc<dyn KeyValueStore>,
        QueueConfig::default(),
        Cursor::new(answers.as_bytes().to_vec()),
        Vec::new(),
    )
}

fn stream(count: usize) -> Command {
    Command::Stream(StreamArgs {
        delay: 0,
        count: Some(count),
        seed: Some(1),
        provenance: "https://localhost:8000/".to_string(),
    })
}

fn receive(destination: &str, count: usize) -> Command {
    Command::Receive(ReceiveArgs {
        destination: destination.to_string(),
        status: "READY".to_string(),
        count,
        ack_status: "DELIVERED".to_string(),
        yes: true,
    })
}

async fn run(store: &Arc<MemoryStore>, command: Command, answers: &str) -> String {
    let mut env = env(store, answers);
    dispatch(&command, &mut env).await.unwrap();
    String::from_utf8(env.output).unwrap()
}

#[tokio::test]
async fn test_init_stream_receive() {
    let store = Arc::new(MemoryStore::new());

    run(&store, Command::Init(InitArgs::default()), "").await;
    let streamed = run(&store, stream(5), "").await;
    assert!(streamed.contains("Sent 5 records"));
    assert_eq!(store.item_count("sprinkler").await.unwrap(), 5);

    let received = run(&store, receive("primary", 3), "").await;
    assert!(received.contains("Acknowledged: 3 of 3"));

    let rest = run(&store, receive("primary", 10), "").await;
    assert!(rest.contains("Acknowledged: 2 of 2"));

    let nothing = run(&store, receive("primary", 10), "").await;
    assert!(nothing.contains("No READY records for destination 'primary'"));

    let secondary = run(&store, receive("secondary", 10), "").await;
    assert!(secondary.contains("Acknowledged: 5 of 5"));
}

#[tokio::test]
async fn test_receive_before_init_fails() {
    let store = Arc::new(MemoryStore::new());
    let mut env = env(&store, "");
    let err = dispatch(&receive("primary", 1), &mut env).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Store dequeue failed: Requested resource not found: table 'sprinkler'"
    );
}

#[tokio::test]
async fn test_cancelled_token_stops_receive() {
    let store = Arc::new(MemoryStore::new());
    run(&store, Command::Init(InitArgs::default()), "").await;
    run(&store, stream(2), "").await;

    let mut env = env(&store, "");
    env.token.cancel();
    let err = dispatch(&receive("primary", 10), &mut env).await.unwrap_err();
    assert!(err.is_cancellation());
}
