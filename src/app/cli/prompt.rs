//! Yes/no confirmation prompts

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Ask `question` and read one line of answer
///
/// Only `y` or `yes` (any case) confirm. End of input counts as no.
pub async fn confirm<R, W>(question: &str, input: &mut R, output: &mut W) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer).await? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
