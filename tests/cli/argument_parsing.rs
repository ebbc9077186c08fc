//! CLI argument parsing tests

use clap::Parser;
use sprinkler::app::cli::args::*;
use std::path::PathBuf;

fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("sprinkler").chain(argv.iter().copied()))
}

#[test]
fn test_stream_defaults() {
    let args = parse(&["stream"]).unwrap();
    assert_eq!(
        args.command,
        Command::Stream(StreamArgs {
            delay: 10,
            count: Some(100),
            seed: None,
            provenance: "https://localhost:8000/".to_string(),
        })
    );
}

#[test]
fn test_stream_unbounded_count() {
    let args = parse(&["stream", "-c", "-1", "-d", "0", "-s", "42"]).unwrap();
    match args.command {
        Command::Stream(stream) => {
            assert_eq!(stream.count, None);
            assert_eq!(stream.delay, 0);
            assert_eq!(stream.seed, Some(42));
        }
        other => panic!("expected stream, got {:?}", other),
    }
}

#[test]
fn test_stream_rejects_zero_and_negative_counts() {
    assert!(parse(&["stream", "--count", "0"]).is_err());
    assert!(parse(&["stream", "--count", "-2"]).is_err());
}

#[test]
fn test_receive_defaults() {
    let args = parse(&["receive"]).unwrap();
    assert_eq!(
        args.command,
        Command::Receive(ReceiveArgs {
            destination: "primary".to_string(),
            status: "READY".to_string(),
            count: 100,
            ack_status: "DELIVERED".to_string(),
            yes: false,
        })
    );
}

#[test]
fn test_aliases() {
    assert!(matches!(parse(&["i"]).unwrap().command, Command::Init(_)));
    assert!(matches!(parse(&["s"]).unwrap().command, Command::Stream(_)));
    assert!(matches!(parse(&["r"]).unwrap().command, Command::Receive(_)));
}

#[test]
fn test_global_flags_after_subcommand() {
    let args = parse(&["receive", "-t", "events", "-S", "memory", "--log-file", "run.log"]).unwrap();
    assert_eq!(args.table.as_deref(), Some("events"));
    assert_eq!(args.store.as_deref(), Some("memory"));
    assert_eq!(args.log_file, Some(PathBuf::from("run.log")));
}

#[test]
fn test_conflicting_color_flags() {
    assert!(parse(&["--color", "--no-color", "init"]).is_err());
}

#[test]
fn test_subcommand_required() {
    assert!(parse(&[]).is_err());
}

#[test]
fn test_verbosity_adjusts_log_level() {
    assert_eq!(parse(&["-vv", "init"]).unwrap().effective_log_level(None), "trace");
    assert_eq!(parse(&["-q", "init"]).unwrap().effective_log_level(None), "warn");
    assert_eq!(
        parse(&["-qqqqqq", "init"]).unwrap().effective_log_level(Some("error")),
        "off"
    );
    assert_eq!(
        parse(&["-v", "-l", "error", "init"])
            .unwrap()
            .effective_log_level(None),
        "error"
    );
}

#[test]
fn test_invalid_log_format() {
    assert!(parse(&["-o", "xml", "init"]).is_err());
}
