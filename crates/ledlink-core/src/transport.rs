use std::io;

use serialport::SerialPort;

use crate::error::ConnectError;
use crate::link_service::LinkConfig;

/// Byte-level duplex over one serial device.
///
/// `split_reader` hands out an independent handle for the receive thread;
/// both handles stay valid until dropped. `read_chunk` blocks for at most
/// the transport's read timeout and returns `Ok(0)` only when the device
/// end is gone.
pub trait Connection: Send {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn split_reader(&self) -> io::Result<Box<dyn Connection>>;
}

impl Connection for Box<dyn SerialPort> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, bytes)?;
        io::Write::flush(self)
    }

    fn split_reader(&self) -> io::Result<Box<dyn Connection>> {
        let clone = self.try_clone().map_err(io::Error::from)?;
        Ok(Box::new(clone))
    }
}

/// Open `name` with the line parameters in `cfg`.
pub(crate) fn open_port(name: &str, cfg: &LinkConfig) -> Result<Box<dyn Connection>, ConnectError> {
    let port = serialport::new(name, cfg.baud_rate)
        .data_bits(cfg.data_bits)
        .parity(cfg.parity)
        .stop_bits(cfg.stop_bits)
        .flow_control(cfg.flow_control)
        .timeout(cfg.read_timeout)
        .open()
        .map_err(|e| ConnectError::from_open(name, e))?;
    Ok(Box::new(port))
}
