// src/exec/drain.rs

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::Result;
use crate::exec::tail::LineTail;

/// Copy captured output line by line into `transcript`, keeping the last
/// lines in `tail`. Returns the number of lines read.
///
/// Invalid UTF-8 is replaced, line endings are kept, and a final line without
/// a trailing newline still counts as a line.
pub async fn drain_output<R, W>(mut reader: R, transcript: &mut W, tail: &mut LineTail) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(8 * 1024);
    let mut count = 0usize;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        transcript.write_all(line.as_bytes()).await?;
        tail.push(line.into_owned());
        count += 1;
    }

    transcript.flush().await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copies_everything_and_tails_the_end() {
        let input: String = (0..100).map(|i| format!("{i}\n")).collect();
        let mut transcript = Vec::new();
        let mut tail = LineTail::new(80);

        let n = drain_output(input.as_bytes(), &mut transcript, &mut tail)
            .await
            .unwrap();

        assert_eq!(n, 100);
        assert_eq!(transcript, input.as_bytes());
        assert_eq!(tail.len(), 80);
        assert_eq!(tail.iter().next(), Some("20\n"));
    }

    #[tokio::test]
    async fn unterminated_last_line_and_bad_utf8() {
        let input: &[u8] = b"ok\n\xffbad";
        let mut transcript = Vec::new();
        let mut tail = LineTail::new(80);

        let n = drain_output(input, &mut transcript, &mut tail).await.unwrap();

        assert_eq!(n, 2);
        assert_eq!(tail.joined(), "ok\n\u{FFFD}bad");
        assert_eq!(String::from_utf8(transcript).unwrap(), "ok\n\u{FFFD}bad");
    }
}
