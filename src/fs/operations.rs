use std::{io::SeekFrom, path::Path};

use anyhow::{Context, Result};
use tokio::{
    fs::{File, OpenOptions},
    io::{self, AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, error};

/// Opens an existing log file for reading. A missing file is reported and propagated as is, so
/// callers can still downcast to [std::io::Error].
pub async fn open_log(path: &Path) -> Result<File> {
    match File::open(path).await {
        Ok(file) => Ok(file),
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                error!("Log file not found: {}", path.display());
            }
            Err(e).with_context(|| format!("Failed to open log file {}", path.display()))
        }
    }
}

/// Moves backwards in a file to beginning of a previous line.
pub async fn seek_line_backwards(
    file: &mut (impl AsyncSeek + AsyncRead + Unpin),
    buffer: &mut [u8],
) -> Result<(), io::Error> {
    // We skip first new line that is right before the buffer, so that reading doesn't get stuck.
    // For example: need_to_read_this\nwe_are_here_now\n
    let mut need_to_skip = 1usize;
    loop {
        let leftover = file.stream_position().await?;
        if leftover == 0 {
            return Ok(());
        }
        let next_chunk = u64::min(leftover, buffer.len() as u64) as usize;
        file.seek(SeekFrom::Current(-(next_chunk as i64))).await?;

        file.read_exact(&mut buffer[..next_chunk]).await?;
        let iter = buffer[..next_chunk].iter().rev().enumerate();
        let iter = iter.skip(need_to_skip);
        for (index, value) in iter {
            if *value == b'\n' {
                file.seek(SeekFrom::Current(-(index as i64))).await?;
                return Ok(());
            }
        }

        need_to_skip = need_to_skip.saturating_sub(1);
        file.seek(SeekFrom::Current(-(next_chunk as i64))).await?;
    }
}

/// Returns the last line that has anything besides whitespace, without its line ending.
/// Reads the file from the end, so only the tail of the file is touched.
pub async fn last_non_empty_line(
    file: &mut (impl AsyncSeek + AsyncRead + Unpin),
    buffer: &mut [u8],
) -> Result<Option<String>, io::Error> {
    let mut end = file.seek(SeekFrom::End(0)).await?;
    while end > 0 {
        seek_line_backwards(file, buffer).await?;
        let start = file.stream_position().await?;

        let mut line = vec![0; (end - start) as usize];
        file.read_exact(&mut line).await?;
        let line = String::from_utf8_lossy(&line);
        if !line.trim().is_empty() {
            return Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()));
        }

        file.seek(SeekFrom::Start(start)).await?;
        end = start;
    }
    Ok(None)
}

/// Reads the whole file from the start and returns every line that isn't blank.
pub async fn read_non_empty_lines(
    file: &mut (impl AsyncSeek + AsyncRead + Unpin),
) -> Result<Vec<String>, io::Error> {
    file.seek(SeekFrom::Start(0)).await?;
    let mut content = String::new();
    file.read_to_string(&mut content).await?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Appends `text` to the end of an existing file. Existing content is never touched.
pub async fn append_to_file(path: &Path, text: &str) -> Result<()> {
    debug!("Appending {} bytes to {path:?}", text.len());
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
