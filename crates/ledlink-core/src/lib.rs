//! Serial command link for the LED display board: port discovery, link
//! lifecycle, and inbound traffic delivery.

pub mod encoding;
pub mod error;
pub mod link_service;
pub mod ports;
pub mod transcript;
pub mod transport;

pub use encoding::TextEncoding;
pub use error::{ConnectError, ReceiveError, SendError};
pub use link_service::{LinkConfig, LinkEvent, LinkService, LinkState};
pub use ports::{list_ports, PortInfo, PortKind};
pub use transcript::{Direction, Entry, Transcript};
pub use transport::Connection;
