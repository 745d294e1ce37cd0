//! Scripted fake IRC server.
//!
//! Binds `127.0.0.1:0` and hands each accepted connection to the test as a
//! [`Peer`] that reads and writes raw protocol lines.

use slirc_client::ClientConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A listening fake server.
pub struct FakeServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl FakeServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        Self { listener, addr }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Client configuration pointing at this server, with pacing off.
    pub fn config(&self, nick: &str) -> ClientConfig {
        ClientConfig {
            port: Some(self.port()),
            queue_interval_ms: 0,
            ..ClientConfig::new("127.0.0.1", nick)
        }
    }

    pub async fn accept(&self) -> Peer {
        let (stream, _) = timeout(IO_TIMEOUT, self.listener.accept())
            .await
            .expect("timed out waiting for client to connect")
            .expect("accept failed");
        let (read_half, write_half) = stream.into_split();
        Peer {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }
}

/// The server side of one client connection.
pub struct Peer {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Peer {
    /// Send one line; the terminator is added here.
    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .expect("peer write failed");
    }

    /// Read one line with its terminator stripped. Panics on EOF or timeout.
    pub async fn recv_line(&mut self) -> String {
        self.try_recv_line(IO_TIMEOUT)
            .await
            .expect("expected a line from the client")
    }

    /// `None` on EOF or if nothing arrives in time.
    pub async fn try_recv_line(&mut self, wait: Duration) -> Option<String> {
        let mut line = String::new();
        match timeout(wait, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) | Err(_) => None,
            Ok(Ok(_)) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Ok(Err(e)) => panic!("peer read failed: {e}"),
        }
    }

    /// Read the client's registration burst, up to and including USER.
    pub async fn expect_registration(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let line = self.recv_line().await;
            let done = line.starts_with("USER ");
            lines.push(line);
            if done {
                return lines;
            }
        }
    }

    /// Send `RPL_WELCOME` for `nick`.
    pub async fn welcome(&mut self, nick: &str) {
        self.send(&format!(
            ":irc.test 001 {nick} :Welcome to the test network {nick}"
        ))
        .await;
    }

    /// Half-close: the client sees end of stream but can still write.
    pub async fn shutdown_write(&mut self) {
        self.writer.shutdown().await.expect("peer shutdown failed");
    }

    /// Everything the client writes until it closes the connection.
    pub async fn read_to_end(&mut self) -> String {
        let mut rest = String::new();
        timeout(IO_TIMEOUT, self.reader.read_to_string(&mut rest))
            .await
            .expect("client did not close the connection")
            .expect("peer read failed");
        rest
    }
}
