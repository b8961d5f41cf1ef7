use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
};
use tracing::debug;

use crate::daemon::protocol::Message;

/// Talks to a running daemon using the same line protocol browser integrations use.
pub struct DaemonClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl DaemonClient {
    pub async fn connect(address: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(address)
            .await
            .with_context(|| format!("Daemon is not reachable on {address}. Try `tabtally init`"))?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    /// Sends a message and decodes the reply as `T`. Error replies become errors.
    pub async fn request<T: DeserializeOwned>(&mut self, message: &Message) -> Result<T> {
        let mut buffer = serde_json::to_vec(message)?;
        buffer.push(b'\n');
        self.writer.write_all(&buffer).await?;
        self.writer.flush().await?;

        let line = self
            .lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow!("Daemon closed the connection"))?;
        debug!("Received {line}");
        let value: Value = serde_json::from_str(&line)?;
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(anyhow!("Daemon refused {message:?}: {error}"));
        }
        Ok(serde_json::from_value(value)?)
    }
}
