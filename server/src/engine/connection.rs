//! Byte-stream side of a single station connection

use bytes::Bytes;
use csms_shared::{codec::FrameDecoder, Frame};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Reads length-prefixed frames off a stream
pub struct FrameReader<R> {
    reader: R,
    decoder: FrameDecoder,
    read_buf: Vec<u8>,
    peer: String,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R, peer: impl Into<String>) -> Self {
        Self {
            reader,
            decoder: FrameDecoder::new(),
            read_buf: vec![0u8; 4096],
            peer: peer.into(),
        }
    }

    /// Read the next frame from this connection.
    /// Returns None if the connection is closed or the stream is corrupt.
    pub async fn recv(&mut self) -> Option<Frame> {
        loop {
            match self.decoder.decode_next() {
                Ok(Some(frame)) => return Some(frame),
                Ok(None) => {}
                Err(e) => {
                    warn!(peer = self.peer.as_str(), "decode error: {}", e);
                    return None;
                }
            }

            match self.reader.read(&mut self.read_buf).await {
                Ok(0) => return None,
                Ok(n) => self.decoder.extend(&self.read_buf[..n]),
                Err(e) => {
                    warn!(peer = self.peer.as_str(), "read error: {}", e);
                    return None;
                }
            }
        }
    }
}

/// Drain encoded frames into `writer` until every sender is gone or a write fails
pub async fn write_frames<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Bytes>, peer: String)
where
    W: AsyncWrite + Unpin,
{
    while let Some(bytes) = rx.recv().await {
        if let Err(e) = writer.write_all(&bytes).await {
            warn!(peer = peer.as_str(), "write error: {}", e);
            return;
        }
    }
    if let Err(e) = writer.shutdown().await {
        debug!(peer = peer.as_str(), "shutdown error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csms_shared::{codec, HeartbeatRequest, Request};

    #[tokio::test]
    async fn test_reads_frames_split_across_writes() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server, "test");

        let first = codec::encode(&Frame::call("CS001", "1", Request::Heartbeat(HeartbeatRequest {})))
            .expect("encode");
        let second = codec::encode(&Frame::call("CS001", "2", Request::Heartbeat(HeartbeatRequest {})))
            .expect("encode");

        let writer = tokio::spawn(async move {
            client.write_all(&first[..3]).await.expect("write");
            client.write_all(&first[3..]).await.expect("write");
            client.write_all(&second).await.expect("write");
        });

        assert_eq!(reader.recv().await.map(|f| f.message_id), Some("1".to_string()));
        assert_eq!(reader.recv().await.map(|f| f.message_id), Some("2".to_string()));
        writer.await.expect("join");
        assert!(reader.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_stream_ends_reader() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server, "test");

        client
            .write_all(&[0xff, 0xff, 0xff, 0xff, 0, 0])
            .await
            .expect("write");
        assert!(reader.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_writer_drains_queue() {
        let (client, server) = tokio::io::duplex(1024);
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(write_frames(server, rx, "test".into()));

        let frame = Frame::call("CS001", "7", Request::Heartbeat(HeartbeatRequest {}));
        tx.send(codec::encode(&frame).expect("encode")).expect("queue");
        drop(tx);
        task.await.expect("join");

        let mut reader = FrameReader::new(client, "test");
        assert_eq!(reader.recv().await, Some(frame));
        assert!(reader.recv().await.is_none());
    }
}
