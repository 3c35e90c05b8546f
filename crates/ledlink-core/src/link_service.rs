use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::error::{ConnectError, ReceiveError, SendError};
use crate::transport::{self, Connection};

/// Serial line parameters. Defaults match the board's factory setup
/// (9600 8N1, no flow control); the read timeout bounds how long the
/// receive thread blocks between stop-flag checks.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub read_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            read_timeout: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Everything the link reports back to its consumer, in arrival order.
///
/// The receive thread is the only producer of `Data` and `ReceiveFailed`,
/// so chunk order on the channel is chunk order on the wire.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    Connected(String),
    Data(Vec<u8>),
    Disconnected,
    ReceiveFailed(ReceiveError),
}

/// Owns one serial connection: opens it, writes commands fire-and-forget,
/// and drains inbound bytes onto the event channel from a background
/// receive thread. The consumer polls `events()` from its own loop.
pub struct LinkService {
    cfg: LinkConfig,
    state: Arc<Mutex<LinkState>>,
    event_tx: Sender<LinkEvent>,
    event_rx: Receiver<LinkEvent>,
    active: Option<ActiveLink>,
}

struct ActiveLink {
    writer: Box<dyn Connection>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl LinkService {
    pub fn new(cfg: LinkConfig) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            cfg,
            state: Arc::new(Mutex::new(LinkState::Disconnected)),
            event_tx,
            event_rx,
            active: None,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.cfg
    }

    pub fn state(&self) -> LinkState {
        *self.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    /// The event channel. One receiver, created with the service; it
    /// survives disconnects, so the consumer subscribes once.
    pub fn events(&self) -> &Receiver<LinkEvent> {
        &self.event_rx
    }

    /// Open `port` with the service's line parameters and bring the link up.
    pub fn connect(&mut self, port: &str) -> Result<(), ConnectError> {
        if self.is_connected() {
            return Err(ConnectError::AlreadyConnected);
        }
        let conn = transport::open_port(port, &self.cfg)?;
        self.connect_with(conn, port)
    }

    /// Bring the link up over an already-open connection. `connect` funnels
    /// through here; tests and alternate transports call it directly.
    pub fn connect_with(
        &mut self,
        conn: Box<dyn Connection>,
        port: &str,
    ) -> Result<(), ConnectError> {
        if self.is_connected() {
            return Err(ConnectError::AlreadyConnected);
        }
        // Reap a link whose receive thread already died.
        self.teardown();

        let reader_conn = conn.split_reader()?;
        let stop = Arc::new(AtomicBool::new(false));

        *self.state.lock() = LinkState::Connected;
        let _ = self.event_tx.send(LinkEvent::Connected(port.to_string()));

        let spawned = thread::Builder::new().name("ledlink-rx".into()).spawn({
            let event_tx = self.event_tx.clone();
            let state = Arc::clone(&self.state);
            let stop = Arc::clone(&stop);
            move || receive_loop(reader_conn, event_tx, state, stop)
        });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                *self.state.lock() = LinkState::Disconnected;
                let _ = self.event_tx.send(LinkEvent::Disconnected);
                return Err(ConnectError::Setup(e));
            }
        };

        info!("link up on {port}");
        self.active = Some(ActiveLink {
            writer: conn,
            stop,
            reader: Some(handle),
        });
        Ok(())
    }

    /// Write `bytes` verbatim, fire-and-forget. A failed write drops the
    /// link: the device is assumed gone.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        if !self.is_connected() {
            return Err(SendError::NotConnected);
        }
        let link = self.active.as_mut().ok_or(SendError::NotConnected)?;
        match link.writer.write_bytes(bytes) {
            Ok(()) => {
                debug!("sent {} bytes", bytes.len());
                Ok(())
            }
            Err(e) => {
                warn!("send failed, dropping link: {e}");
                self.teardown();
                let _ = self.event_tx.send(LinkEvent::Disconnected);
                Err(SendError::Io(e))
            }
        }
    }

    /// Stop the receive thread, release the handles, and report the link
    /// down. No-op when nothing is connected.
    pub fn disconnect(&mut self) {
        if self.active.is_none() {
            return;
        }
        let was_up = self.is_connected();
        self.teardown();
        if was_up {
            let _ = self.event_tx.send(LinkEvent::Disconnected);
            info!("link closed");
        }
    }

    fn teardown(&mut self) {
        let Some(mut link) = self.active.take() else {
            return;
        };
        link.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = link.reader.take() {
            let _ = handle.join();
        }
        *self.state.lock() = LinkState::Disconnected;
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new(LinkConfig::default())
    }
}

impl Drop for LinkService {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn receive_loop(
    mut conn: Box<dyn Connection>,
    event_tx: Sender<LinkEvent>,
    state: Arc<Mutex<LinkState>>,
    stop: Arc<AtomicBool>,
) {
    let mut buf = [0u8; 4096];
    while !stop.load(Ordering::Relaxed) {
        match conn.read_chunk(&mut buf) {
            Ok(n) if n > 0 => {
                let _ = event_tx.send(LinkEvent::Data(buf[..n].to_vec()));
            }
            Ok(_) => {
                // Zero-length read means the device end is gone.
                fail_link(&event_tx, &state, &stop, "device closed the link");
                return;
            }
            Err(e) if recoverable(&e) => {}
            Err(e) => {
                fail_link(&event_tx, &state, &stop, &e.to_string());
                return;
            }
        }
    }
}

fn fail_link(
    event_tx: &Sender<LinkEvent>,
    state: &Mutex<LinkState>,
    stop: &AtomicBool,
    reason: &str,
) {
    // A teardown in progress already reports the outcome.
    if stop.load(Ordering::Relaxed) {
        return;
    }
    warn!("receive failed: {reason}");
    *state.lock() = LinkState::Disconnected;
    let _ = event_tx.send(LinkEvent::ReceiveFailed(ReceiveError(reason.to_string())));
}

fn recoverable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
