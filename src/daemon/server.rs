use std::net::SocketAddr;

use anyhow::Result;
use futures::StreamExt;
use tokio::{
    io::AsyncWriteExt,
    net::{tcp::OwnedWriteHalf, TcpListener, TcpStream},
};
use tokio_util::{
    codec::{FramedRead, LinesCodec, LinesCodecError},
    sync::CancellationToken,
};
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::{
    engine::actor::EngineHandle,
    protocol::{Message, Response},
};

/// Requests are small json documents, anything longer is refused without buffering it.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Accepts local connections speaking newline delimited json. Every line is handed to the engine
/// and answered with exactly one line.
pub struct RequestServer {
    listener: TcpListener,
}

impl RequestServer {
    pub async fn bind(address: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(address).await?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self, engine: EngineHandle, shutdown: CancellationToken) -> Result<()> {
        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                accepted = self.listener.accept() => accepted?,
            };
            let engine = engine.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(
                async move {
                    if let Err(e) = serve_connection(stream, engine, shutdown).await {
                        warn!("Connection ended with an error {e:?}");
                    }
                }
                .instrument(info_span!("connection", %peer)),
            );
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    engine: EngineHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            line = lines.next() => line,
        };
        let line = match line {
            None => {
                debug!("Peer disconnected");
                return Ok(());
            }
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                warn!("Closing after a request longer than {MAX_LINE_LENGTH} bytes");
                write_response(&mut writer, &Response::error("request is too long")).await?;
                return Ok(());
            }
            Some(Err(LinesCodecError::Io(e))) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match Message::parse(&line) {
            Ok(message) => engine.send(message).await.unwrap_or_else(|e| {
                error!("Engine unavailable {e:?}");
                Response::error(e)
            }),
            Err(e) => {
                warn!("Received illegal message {line}: {e}");
                Response::error(e)
            }
        };

        write_response(&mut writer, &response).await?;
    }
}

async fn write_response(writer: &mut OwnedWriteHalf, response: &Response) -> Result<()> {
    let mut buffer = serde_json::to_vec(response)?;
    buffer.push(b'\n');
    writer.write_all(&buffer).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, time::Duration};

    use anyhow::Result;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpStream,
    };
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{
            engine::{actor::EngineActor, Engine},
            storage::{file_store::FileStore, state::StateStore},
        },
        utils::{clock::ManualClock, logging::TEST_LOGGING},
    };

    use super::{RequestServer, MAX_LINE_LENGTH};

    type Lines = tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>;

    async fn send_line(address: SocketAddr, line: &[u8]) -> Result<(Value, Lines)> {
        let (reader, mut writer) = TcpStream::connect(address).await?.into_split();
        writer.write_all(line).await?;
        writer.write_all(b"\n").await?;
        let mut lines = BufReader::new(reader).lines();
        let reply = lines
            .next_line()
            .await?
            .ok_or_else(|| anyhow::anyhow!("no reply"))?;
        Ok((serde_json::from_str(&reply)?, lines))
    }

    #[tokio::test]
    async fn test_replies_to_odd_requests() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let state = StateStore::new(Box::new(FileStore::new(dir.path().to_owned())?));
        let clock = ManualClock::at_local_noon(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        let engine = Engine::start(state, Box::new(clock), None).await?;
        let shutdown = CancellationToken::new();
        let (actor, handle) = EngineActor::new(engine, Duration::from_secs(60), shutdown.clone());
        let server = RequestServer::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let address = server.local_addr()?;
        let actor = tokio::spawn(actor.run());
        let server = tokio::spawn(server.run(handle, shutdown.clone()));

        let (reply, _) = send_line(address, b"{}").await?;
        assert_eq!(reply, json!({ "error": "unknown" }));
        let (reply, _) = send_line(address, br#"{"type":5}"#).await?;
        assert_eq!(reply, json!({ "error": "unknown" }));

        // Oversized requests get one error and the connection is closed.
        let long = vec![b'x'; MAX_LINE_LENGTH + 1];
        let (reply, mut lines) = send_line(address, &long).await?;
        assert_eq!(reply, json!({ "error": "request is too long" }));
        assert_eq!(lines.next_line().await.ok().flatten(), None);

        shutdown.cancel();
        actor.await?;
        server.await??;
        Ok(())
    }
}
