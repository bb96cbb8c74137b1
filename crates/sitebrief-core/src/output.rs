use std::io::Write;

use futures::StreamExt;

use crate::error::AppError;
use crate::stream::ChatStream;

/// Write each fragment to `out` as it arrives, flushing after every chunk.
///
/// Returns the concatenated text. Stops at the first error; fragments
/// already written stay written.
pub async fn drain_to<W: Write>(mut stream: ChatStream, out: &mut W) -> Result<String, AppError> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        out.write_all(chunk.as_bytes())?;
        out.flush()?;
        text.push_str(&chunk);
    }
    Ok(text)
}
