//! Socket read loop feeding the connection event channel.

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// Set to false to silence this module.
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const READ_BUFFER_BYTES: usize = 4096;

/// Everything the socket can tell the connection manager, delivered over one
/// ordered channel so event-arrival order is preserved end-to-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Connected,
    Error(String),
    Closed,
    Data(Vec<u8>),
}

/// Connect to the core and stream raw chunks until the peer closes, an I/O
/// error occurs, or `cancel` fires. Always emits a final `Closed`.
///
/// No connect timeout is modeled: a failed attempt reports `Error` once and
/// is terminal for that attempt.
pub(crate) async fn socket_worker(
    endpoint: String,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<SocketEvent>,
) {
    let mut stream = tokio::select! {
        result = TcpStream::connect(&endpoint) => match result {
            Ok(stream) => stream,
            Err(err) => {
                let _ = events.send(SocketEvent::Error(err.to_string()));
                let _ = events.send(SocketEvent::Closed);
                return;
            }
        },
        _ = cancel.cancelled() => {
            let _ = events.send(SocketEvent::Closed);
            return;
        }
    };

    log_info!("connected to tracking core at {endpoint}");
    let _ = events.send(SocketEvent::Connected);

    let mut buffer = vec![0u8; READ_BUFFER_BYTES];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log_info!("socket read loop cancelled");
                break;
            }
            read = stream.read(&mut buffer) => match read {
                Ok(0) => {
                    log_info!("tracking core closed the connection");
                    break;
                }
                Ok(n) => {
                    let _ = events.send(SocketEvent::Data(buffer[..n].to_vec()));
                }
                Err(err) => {
                    log_warn!("socket read failed: {err}");
                    let _ = events.send(SocketEvent::Error(err.to_string()));
                    break;
                }
            }
        }
    }

    let _ = events.send(SocketEvent::Closed);
}
