//! Subcommand implementations
//!
//! Each command receives a [`CommandEnv`] holding the opened store, the
//! queue configuration and the terminal streams, so commands run the same
//! way against stdin/stdout and against in-memory buffers.

pub mod init;
pub mod receive;
pub mod stream;

use crate::app::cli::Command;
use crate::app::error::AppResult;
use crate::core::context::{CallContext, CancelToken};
use crate::core::time::{SystemTimeProvider, TimeProvider};
use crate::queue::QueueClient;
use crate::schema::QueueConfig;
use crate::store::KeyValueStore;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufRead;

pub struct CommandEnv<R, W> {
    pub store: Arc<dyn KeyValueStore>,
    pub config: QueueConfig,
    /// Cancelled on shutdown; shared by every call a command makes
    pub token: CancelToken,
    /// Deadline applied to each protocol operation separately
    pub timeout: Option<Duration>,
    pub color: bool,
    pub input: R,
    pub output: W,
    pub clock: Box<dyn TimeProvider>,
}

impl<R, W> CommandEnv<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(store: Arc<dyn KeyValueStore>, config: QueueConfig, input: R, output: W) -> Self {
        Self {
            store,
            config,
            token: CancelToken::new(),
            timeout: None,
            color: false,
            input,
            output,
            clock: Box::new(SystemTimeProvider),
        }
    }

    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// Fresh context: the shared token plus a new deadline
    pub fn call_context(&self) -> CallContext {
        let ctx = CallContext::with_token(self.token.clone());
        match self.timeout {
            Some(timeout) => ctx.timeout(timeout),
            None => ctx,
        }
    }

    pub fn client(&self) -> AppResult<QueueClient<dyn KeyValueStore>> {
        Ok(QueueClient::new(
            Arc::clone(&self.store),
            self.config.clone(),
        )?)
    }
}

/// Run the selected subcommand
pub async fn dispatch<R, W>(command: &Command, env: &mut CommandEnv<R, W>) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match command {
        Command::Init(args) => init::run(args, env).await,
        Command::Stream(args) => stream::run(args, env).await.map(|_| ()),
        Command::Receive(args) => receive::run(args, env).await.map(|_| ()),
    }
}
