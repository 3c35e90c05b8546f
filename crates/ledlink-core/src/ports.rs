use serialport::{SerialPortInfo, SerialPortType};

/// Transport class of an enumerated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Usb,
    Pci,
    Bluetooth,
    Unknown,
}

/// One serial device visible to the OS.
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub name: String,
    pub kind: PortKind,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (kind, vid, pid, serial_number, manufacturer, product) = match &info.port_type {
            SerialPortType::UsbPort(usb) => (
                PortKind::Usb,
                Some(usb.vid),
                Some(usb.pid),
                usb.serial_number.clone(),
                usb.manufacturer.clone(),
                usb.product.clone(),
            ),
            SerialPortType::PciPort => (PortKind::Pci, None, None, None, None, None),
            SerialPortType::BluetoothPort => (PortKind::Bluetooth, None, None, None, None, None),
            SerialPortType::Unknown => (PortKind::Unknown, None, None, None, None, None),
        };
        Self {
            name: info.port_name,
            kind,
            vid,
            pid,
            serial_number,
            manufacturer,
            product,
        }
    }
}

impl PortInfo {
    /// Picker text: the port name, plus the USB product string when known.
    pub fn label(&self) -> String {
        match &self.product {
            Some(product) => format!("{} ({})", self.name, product),
            None => self.name.clone(),
        }
    }
}

/// Ports currently visible to the OS. Empty when enumeration fails or
/// nothing is attached.
pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect()
}
