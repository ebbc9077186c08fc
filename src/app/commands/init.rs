//! `init`: create the table and its destination indexes

use crate::app::cli::prompt::confirm;
use crate::app::cli::InitArgs;
use crate::app::commands::CommandEnv;
use crate::app::error::AppResult;
use crate::core::styles::StyleRole;
use crate::schema::{create_schema, delete_schema, schema_exists};
use std::io::Write;
use tokio::io::AsyncBufRead;

/// Create the table, replacing an existing one only when confirmed
pub async fn run<R, W>(args: &InitArgs, env: &mut CommandEnv<R, W>) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let table = env.config.table_name.clone();
    let store = env.store.as_ref();

    if schema_exists(store, &env.config, &env.call_context()).await? {
        let replace = args.yes
            || confirm(
                &format!("Table '{}' exists. Would you like to delete it?", table),
                &mut env.input,
                &mut env.output,
            )
            .await?;
        if !replace {
            log::info!("Keeping existing table '{}'", table);
            writeln!(env.output, "Kept existing table '{}'", table)?;
            return Ok(());
        }
        delete_schema(store, &env.config, &env.call_context()).await?;
    }

    create_schema(store, &env.config, &env.call_context()).await?;
    writeln!(
        env.output,
        "{} table '{}' with indexes: {}",
        StyleRole::Acknowledged.paint("Created", env.color),
        table,
        env.config
            .destinations
            .iter()
            .map(|d| d.status_index.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    Ok(())
}
