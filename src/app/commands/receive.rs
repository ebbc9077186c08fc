//! `receive`: read one destination's queue and acknowledge what was read

use crate::app::cli::display::{receipts_table, write_ack_report};
use crate::app::cli::prompt::confirm;
use crate::app::cli::ReceiveArgs;
use crate::app::commands::CommandEnv;
use crate::app::error::AppResult;
use crate::core::retry::{retry_async, RetryPolicy};
use crate::queue::{AckReport, QueueError, Receipt, Status};
use std::io::Write;
use tokio::io::AsyncBufRead;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveOutcome {
    pub receipts: Vec<Receipt>,
    /// Absent when nothing was received or acknowledgment was declined
    pub report: Option<AckReport>,
}

/// Dequeue up to `count` records, show them, then acknowledge on confirmation
pub async fn run<R, W>(args: &ReceiveArgs, env: &mut CommandEnv<R, W>) -> AppResult<ReceiveOutcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let client = env.client()?;
    let consumer = client.create_consumer(&args.destination)?;
    let status = Status::from(args.status.as_str());
    let ack_status = Status::from(args.ack_status.as_str());
    if ack_status.is_empty() {
        return Err(QueueError::validation("acknowledgment status must not be empty").into());
    }

    let ctx = env.call_context();
    let receipts = retry_async(
        "dequeue",
        RetryPolicy::default(),
        QueueError::is_transient,
        || consumer.dequeue(&status, args.count, &ctx),
    )
    .await?;

    if receipts.is_empty() {
        writeln!(
            env.output,
            "No {} records for destination '{}'",
            status, args.destination
        )?;
        return Ok(ReceiveOutcome::default());
    }

    receipts_table(&receipts).print(&mut env.output)?;

    let question = format!(
        "Would you like to register {} records as {}?",
        receipts.len(),
        ack_status
    );
    if !(args.yes || confirm(&question, &mut env.input, &mut env.output).await?) {
        log::info!("Left {} records as {}", receipts.len(), status);
        return Ok(ReceiveOutcome {
            receipts,
            report: None,
        });
    }

    match consumer
        .acknowledge(&receipts, &ack_status, &env.call_context())
        .await
    {
        Ok(report) => {
            write_ack_report(&mut env.output, &report, env.color)?;
            Ok(ReceiveOutcome {
                receipts,
                report: Some(report),
            })
        }
        Err(QueueError::AckInterrupted {
            partial,
            total,
            cause,
        }) => {
            write_ack_report(&mut env.output, &partial, env.color)?;
            Err(QueueError::AckInterrupted {
                partial,
                total,
                cause,
            }
            .into())
        }
        Err(err) => Err(err.into()),
    }
}
