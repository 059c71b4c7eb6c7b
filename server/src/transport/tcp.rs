//! Plain TCP transport

use crate::transport::traits::{BoxedStream, StreamUpgrader};
use anyhow::Result;
use async_trait::async_trait;
use tokio::net::TcpStream;

/// Hands accepted connections through untouched
pub struct PlainUpgrader;

#[async_trait]
impl StreamUpgrader for PlainUpgrader {
    async fn upgrade(&self, stream: TcpStream) -> Result<BoxedStream> {
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_plain_upgrade_passes_bytes_through() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.expect("connect");
            stream.write_all(b"ping").await.expect("write");
        });

        let (accepted, _) = listener.accept().await.expect("accept");
        let mut stream = PlainUpgrader.upgrade(accepted).await.expect("upgrade");
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await.expect("read");
        assert_eq!(&buf, b"ping");
        assert_eq!(PlainUpgrader.name(), "plain");

        client.await.expect("client");
    }
}
