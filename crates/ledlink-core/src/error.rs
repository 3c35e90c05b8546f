use std::io;
use thiserror::Error;

/// Failure to open the serial device and bring the link up.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("link is already connected")]
    AlreadyConnected,

    #[error("serial device {0} not found")]
    NotFound(String),

    #[error("access to {0} denied (device busy or insufficient permissions)")]
    AccessDenied(String),

    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The port opened but the receive side could not be started.
    #[error("link setup failed: {0}")]
    Setup(#[from] io::Error),
}

impl ConnectError {
    pub(crate) fn from_open(port: &str, err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => ConnectError::NotFound(port.to_string()),
            serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied) => {
                ConnectError::AccessDenied(port.to_string())
            }
            _ => ConnectError::Open {
                port: port.to_string(),
                source: err,
            },
        }
    }
}

/// Failure to write to the link.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("link is not connected")]
    NotConnected,

    #[error("serial write failed: {0}")]
    Io(#[from] io::Error),
}

/// A read failure on the receive thread. Carries only the platform's message
/// so it can travel through the event channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("serial read failed: {0}")]
pub struct ReceiveError(pub String);
