//! `stream`: publish generated records at a steady rate

use crate::app::cli::StreamArgs;
use crate::app::commands::CommandEnv;
use crate::app::error::AppResult;
use crate::core::retry::{retry_async, RetryPolicy};
use crate::core::styles::StyleRole;
use crate::core::time::{encode_timestamp, TimeProvider};
use crate::queue::{QueueError, Record};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::time::Duration;
use tokio::io::AsyncBufRead;

/// Hex characters kept from the payload digest
const SUM_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Records the store accepted
    pub written: usize,
    /// Records rejected because the stored copy was the same or newer
    pub unchanged: usize,
    /// Stopped by shutdown before reaching the count
    pub interrupted: bool,
}

/// Deterministic payload sum for record `index` under `seed`
pub fn payload_sum(seed: u64, index: usize) -> String {
    let digest = Sha256::digest(format!("{}:{}", seed, index).as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..SUM_LENGTH].to_string()
}

/// Send records `0..count` (or until shutdown when unbounded)
///
/// Transient store failures are retried. Shutdown between or during sends
/// ends the stream without an error.
pub async fn run<R, W>(args: &StreamArgs, env: &mut CommandEnv<R, W>) -> AppResult<StreamSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let publisher = env.client()?.create_publisher();
    let seed = args
        .seed
        .unwrap_or_else(|| env.clock.now().timestamp().unsigned_abs());
    let delay = Duration::from_millis(args.delay);
    let mut summary = StreamSummary::default();

    log::info!(
        "Streaming {} records to '{}' (seed {})",
        args.count.map_or("unbounded".to_string(), |c| c.to_string()),
        env.config.table_name,
        seed
    );

    let mut index = 0usize;
    while args.count.map_or(true, |count| index < count) {
        let record = Record::new(index.to_string(), env.clock.now(), &args.provenance)
            .with_payload_sum(payload_sum(seed, index));
        let ctx = env.call_context();

        let written = match retry_async(
            "enqueue",
            RetryPolicy::default(),
            QueueError::is_transient,
            || publisher.enqueue(&record, &ctx),
        )
        .await
        {
            Ok(written) => written,
            Err(err) if err.is_cancellation() && env.token.is_cancelled() => {
                summary.interrupted = true;
                break;
            }
            Err(err) => return Err(err.into()),
        };

        index += 1;
        if written {
            summary.written += 1;
        } else {
            summary.unchanged += 1;
        }
        writeln!(
            env.output,
            "{}: {} {} {}",
            index,
            StyleRole::Key.paint(&record.id, env.color),
            encode_timestamp(&record.timestamp),
            record.payload_sum
        )?;

        if args.count == Some(index) {
            break;
        }
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = env.token.cancelled() => {}
            }
        }
        if env.token.is_cancelled() {
            summary.interrupted = true;
            break;
        }
    }

    if summary.interrupted {
        log::info!("Stream interrupted after {} records", index);
    }
    writeln!(
        env.output,
        "{} {} records ({} unchanged)",
        StyleRole::Acknowledged.paint("Sent", env.color),
        summary.written,
        summary.unchanged
    )?;
    Ok(summary)
}
