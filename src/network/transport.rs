//! TCP connect and stream boxing.

use super::tls;
use crate::config::ResolvedConfig;
use crate::error::ClientError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Any bidirectional byte stream the client can run over.
pub trait AsyncReadWrite: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> AsyncReadWrite for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Plain TCP or TLS, erased.
pub type BoxedStream = Box<dyn AsyncReadWrite>;

/// Open the connection described by `config`, wrapping it in TLS when the
/// secure-transport flag is set.
pub async fn connect(config: &ResolvedConfig) -> Result<BoxedStream, ClientError> {
    let addr = format!("{}:{}", config.host, config.port);
    debug!(addr = %addr, tls = config.tls, "Connecting");

    let tcp_stream = TcpStream::connect((config.host.as_str(), config.port))
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    if let Err(e) = tcp_stream.set_nodelay(true) {
        debug!(error = %e, "Failed to set TCP_NODELAY");
    }

    let stream: BoxedStream = if config.tls {
        Box::new(tls::upgrade(tcp_stream, &config.host, config.tls_verify).await?)
    } else {
        Box::new(tcp_stream)
    };

    info!(addr = %addr, tls = config.tls, "Connected");
    Ok(stream)
}
