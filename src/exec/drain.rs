// src/exec/drain.rs

//! Draining of a child's stdout/stderr pipe into a channel.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Read size for one chunk.
pub const CHUNK_SIZE: usize = 1024;

/// Which pipe a drainer is reading, for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamName {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamName::Stdout => f.write_str("stdout"),
            StreamName::Stderr => f.write_str("stderr"),
        }
    }
}

/// Drain `stream` until end-of-stream or a read error.
///
/// Each non-empty read is sent on `out` as one chunk before the next read is
/// issued. `done` fires exactly once, after the last chunk has been handed to
/// the channel. Returns the number of bytes delivered.
///
/// If the receiving side of `out` goes away the pipe is still read to the
/// end and the data discarded, so the child can never stall on a full pipe.
pub async fn drain<R>(
    name: StreamName,
    mut stream: R,
    out: mpsc::Sender<Vec<u8>>,
    done: oneshot::Sender<()>,
) -> u64
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut delivered: u64 = 0;
    let mut discarding = false;

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                debug!(stream = %name, error = %err, "read error; stopping drain");
                break;
            }
        };

        if discarding {
            trace!(stream = %name, bytes = n, "discarding output");
            continue;
        }

        if out.send(buf[..n].to_vec()).await.is_err() {
            debug!(stream = %name, "output consumer gone; discarding the rest");
            discarding = true;
            continue;
        }
        delivered += n as u64;
    }

    // The receiver may already be gone; that is not an error for us.
    let _ = done.send(());
    debug!(stream = %name, bytes = delivered, "drain finished");
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{AsyncWriteExt, ReadBuf};

    #[tokio::test]
    async fn chunks_arrive_in_read_order_then_done() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let (done_tx, done_rx) = oneshot::channel();

        let handle = tokio::spawn(drain(StreamName::Stdout, reader, tx, done_tx));

        writer.write_all(b"abc").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), b"abc");
        writer.write_all(b"def").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), b"def");
        drop(writer);

        done_rx.await.unwrap();
        assert_eq!(handle.await.unwrap(), 6);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn large_input_is_split_into_bounded_chunks() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let (tx, mut rx) = mpsc::channel(64);
        let (done_tx, done_rx) = oneshot::channel();

        let total = drain(StreamName::Stdout, &data[..], tx, done_tx).await;
        done_rx.await.unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = rx.recv().await {
            assert!(!chunk.is_empty() && chunk.len() <= CHUNK_SIZE);
            collected.extend(chunk);
        }
        assert_eq!(total, 5000);
        assert_eq!(collected, data);
    }

    #[tokio::test]
    async fn empty_stream_only_signals_done() {
        let (tx, mut rx) = mpsc::channel(1);
        let (done_tx, done_rx) = oneshot::channel();

        let total = drain(StreamName::Stderr, &b""[..], tx, done_tx).await;

        assert_eq!(total, 0);
        done_rx.await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    struct FailingReader {
        served: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.served {
                Poll::Ready(Err(io::Error::other("pipe broke")))
            } else {
                self.served = true;
                buf.put_slice(b"partial");
                Poll::Ready(Ok(()))
            }
        }
    }

    #[tokio::test]
    async fn read_error_ends_the_drain_after_delivered_data() {
        let (tx, mut rx) = mpsc::channel(4);
        let (done_tx, done_rx) = oneshot::channel();

        let total = drain(
            StreamName::Stderr,
            FailingReader { served: false },
            tx,
            done_tx,
        )
        .await;

        assert_eq!(total, 7);
        done_rx.await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), b"partial");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_consumer_does_not_stall_the_writer() {
        let (mut writer, reader) = tokio::io::duplex(16);
        let (tx, rx) = mpsc::channel(1);
        let (done_tx, done_rx) = oneshot::channel();
        drop(rx);

        let handle = tokio::spawn(drain(StreamName::Stderr, reader, tx, done_tx));

        // Far more than the duplex buffer; only completes if the drainer keeps reading.
        writer.write_all(&[b'x'; 4096]).await.unwrap();
        drop(writer);

        done_rx.await.unwrap();
        assert_eq!(handle.await.unwrap(), 0);
    }
}
