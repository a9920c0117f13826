use crate::common::IPC_GREETING;
use crate::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

pub struct IpcClient {
    socket_path: String,
}

impl IpcClient {
    pub fn with_path(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    async fn connect(&self) -> Result<UnixStream> {
        UnixStream::connect(&self.socket_path)
            .await
            .context("Failed to connect to daemon. Is it running?")
    }

    /// Sends one command and returns the daemon's reply without the greeting.
    pub async fn send(&self, command: &str) -> Result<String> {
        let mut stream = self.connect().await?;

        stream.write_all(command.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.shutdown().await?;

        let mut response = String::new();
        stream.read_to_string(&mut response).await?;

        Ok(strip_greeting(&response).trim().to_string())
    }

    /// Subscribes to session signals and hands each line to `on_line` until
    /// the daemon closes the connection.
    pub async fn watch<F>(&self, mut on_line: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let mut stream = self.connect().await?;
        stream.write_all(b"WATCH\n").await?;

        let mut lines = BufReader::new(stream).lines();
        while let Some(line) = lines.next_line().await? {
            if line == IPC_GREETING {
                continue;
            }
            on_line(&line);
        }
        Ok(())
    }

    pub async fn is_alive(&self) -> bool {
        UnixStream::connect(&self.socket_path).await.is_ok()
    }

    pub async fn ping(&self) -> Result<bool> {
        match self.send("PING").await {
            Ok(resp) => Ok(resp.contains("PONG")),
            Err(_) => Ok(false),
        }
    }
}

fn strip_greeting(response: &str) -> &str {
    response
        .strip_prefix(IPC_GREETING)
        .map(|rest| rest.trim_start_matches('\n'))
        .unwrap_or(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_removed() {
        assert_eq!(strip_greeting("OK GAMESPACE IPC\nPONG\n"), "PONG\n");
        assert_eq!(strip_greeting("PONG\n"), "PONG\n");
    }
}
