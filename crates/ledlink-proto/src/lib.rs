//! Command vocabulary for the LED display board's serial protocol.

use serde::{Deserialize, Serialize};

/// One of the board's three LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Led {
    Red,
    Green,
    Blue,
}

impl Led {
    fn letter(self) -> u8 {
        match self {
            Led::Red => b'R',
            Led::Green => b'G',
            Led::Blue => b'B',
        }
    }
}

/// A single outbound command.
///
/// `Display` wraps its text verbatim between `&s` and `;`. The board treats
/// the first `;` as the terminator, so text containing `;` is cut short on
/// the device side; the encoder does not escape it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Led { color: Led, on: bool },
    Reset,
    Identify,
    Display(String),
}

impl Command {
    /// The exact bytes written to the wire for this command.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Led { color, on } => {
                let letter = if *on {
                    color.letter()
                } else {
                    color.letter().to_ascii_lowercase()
                };
                vec![b'&', letter]
            }
            Command::Reset => vec![b'!'],
            Command::Identify => b"&i".to_vec(),
            Command::Display(text) => {
                let mut out = Vec::with_capacity(text.len() + 3);
                out.extend_from_slice(b"&s");
                out.extend_from_slice(text.as_bytes());
                out.push(b';');
                out
            }
        }
    }
}
