use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::error::{ModtreeError, Result};
use crate::source::traits::EdgeSource;

/// Reads until EOF or until `timeout` elapses. On timeout only complete
/// lines are kept.
pub struct TimedReaderSource<R> {
    reader: R,
    timeout: Duration,
    label: &'static str,
}

pub type StdinSource = TimedReaderSource<tokio::io::Stdin>;

impl<R> TimedReaderSource<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R, timeout: Duration, label: &'static str) -> Self {
        Self {
            reader,
            timeout,
            label,
        }
    }
}

pub fn stdin_source(timeout: Duration) -> StdinSource {
    TimedReaderSource::new(tokio::io::stdin(), timeout, "stdin")
}

impl<R> EdgeSource for TimedReaderSource<R>
where
    R: AsyncRead + Unpin,
{
    fn describe(&self) -> String {
        format!("{} (timeout {}ms)", self.label, self.timeout.as_millis())
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ModtreeError::Io)?;
        let result = runtime.block_on(read_with_timeout(&mut self.reader, self.timeout));
        // A blocked stdin read cannot be cancelled; don't wait for it.
        runtime.shutdown_background();
        Ok(result?)
    }
}

pub async fn read_with_timeout<R>(reader: &mut R, timeout: Duration) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    match tokio::time::timeout(timeout, reader.read_to_end(&mut buf)).await {
        Ok(result) => {
            result?;
        }
        Err(_) => {
            // Only newline-terminated records survive a timeout.
            let complete = buf.iter().rposition(|&b| b == b'\n').map_or(0, |idx| idx + 1);
            debug!(
                bytes = buf.len(),
                dropped = buf.len() - complete,
                "input reader timed out"
            );
            buf.truncate(complete);
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;

    use crate::source::stdin::{read_with_timeout, TimedReaderSource};
    use crate::source::traits::EdgeSource;

    #[tokio::test]
    async fn reads_until_eof_before_timeout() {
        let mut reader: &[u8] = b"m/a m/b\nm/b m/c\n";
        let data = read_with_timeout(&mut reader, Duration::from_secs(5))
            .await
            .expect("read input");
        assert_eq!(data, b"m/a m/b\nm/b m/c\n");
    }

    #[tokio::test]
    async fn idle_reader_yields_nothing_after_timeout() {
        let (mut client, _server) = tokio::io::duplex(64);
        let data = read_with_timeout(&mut client, Duration::from_millis(50))
            .await
            .expect("read input");
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn keeps_partial_input_when_writer_stalls() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(b"m/a m/b\n").await.expect("write input");
        let data = read_with_timeout(&mut client, Duration::from_millis(100))
            .await
            .expect("read input");
        assert_eq!(data, b"m/a m/b\n");
    }

    #[tokio::test]
    async fn timeout_drops_unterminated_record() {
        let (mut client, mut server) = tokio::io::duplex(128);
        server
            .write_all(b"m/root github.com/spf13/cobra\ngithub.com/spf13/cobra github.com/spf1")
            .await
            .expect("write input");
        let data = read_with_timeout(&mut client, Duration::from_millis(100))
            .await
            .expect("read input");
        assert_eq!(data, b"m/root github.com/spf13/cobra\n");
    }

    #[tokio::test]
    async fn timeout_without_any_newline_yields_nothing() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(b"m/a m/").await.expect("write input");
        let data = read_with_timeout(&mut client, Duration::from_millis(50))
            .await
            .expect("read input");
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn eof_keeps_unterminated_final_record() {
        let mut reader: &[u8] = b"m/a m/b\nm/b m/c";
        let data = read_with_timeout(&mut reader, Duration::from_secs(5))
            .await
            .expect("read input");
        assert_eq!(data, b"m/a m/b\nm/b m/c");
    }

    #[test]
    fn source_drives_its_own_runtime() {
        let reader: &[u8] = b"m/a m/b\n";
        let mut source = TimedReaderSource::new(reader, Duration::from_secs(1), "test input");
        assert_eq!(source.read().expect("read source"), b"m/a m/b\n");
        assert_eq!(source.describe(), "test input (timeout 1000ms)");
    }
}
