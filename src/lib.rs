#![doc = include_str!("../README.md")]

mod bits;
mod burst;
mod clock;
mod encode;
mod manchester;
mod parse;
mod pronto;
mod protocol;
mod send;
mod validate;

use std::collections::HashMap;

pub use parse::parse_remotes;
pub use protocol::{KaseikyoKind, NecKind, Protocol, Rc6Kind};
pub use send::{Codec, Transmitter, ADHOC_BUTTON, ADHOC_REMOTE};
pub use validate::validate;

/// A virtual remote control: one IR emitter and a set of named buttons.
///
/// Loaded once at startup and validated in place; validation attaches the
/// precomputed [`Obc`] and [`CmdBytes`] to every button.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote {
    pub model: String,
    pub emitter: Emitter,
    pub encoding: Encoding,
    pub buttons: HashMap<String, Button>,
}

/// The transmitter hardware this remote's codes leave through. Opaque to the
/// codec; handed back to the host transport on every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitter {
    pub device: String,
    pub service_idx: u8,
}

/// How every button of a remote is encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    /// Protocol name as configured; validation canonicalizes to uppercase.
    pub protocol: String,
    /// Device address, unused for GC100, RAW and PRONTO buttons.
    pub device: Option<i64>,
    /// Subdevice address; -1 means absent (NEC derives the complement of the
    /// device, SONY20 a zero extension byte).
    pub subdevice: Option<i64>,
    /// Whether configured numbers are in the conventional reading order.
    pub lsb_first: bool,
    /// Extra copies of the frame per send, coerced into 0..=5.
    pub repeats: i64,
    /// Classified protocol tag, populated by validation.
    pub proto: Option<Protocol>,
}

/// One button of a remote.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub fnc: Fnc,
    pub note: Option<String>,
    /// Carrier for RAW buttons, Hz.
    pub freq: Option<i64>,
    /// Logical device/subdevice/function, populated by validation.
    pub obc: Option<Obc>,
    /// Transmit-ready encoder input, populated by validation.
    pub cmd: Option<CmdBytes>,
}

/// A button's function code as it appears in the definitions file: a number
/// for the IRP protocols, a hex-word string for PRONTO, an integer list for
/// GC100 and RAW.
#[derive(Debug, Clone, PartialEq)]
pub enum Fnc {
    Number(i64),
    Text(String),
    List(Vec<i64>),
}

/// Original button code: the device/subdevice/function triple as printed on
/// remotes and in code databases, after endianness adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obc {
    pub device: i64,
    pub subdevice: i64,
    pub function: i64,
}

/// Per-protocol transmit-ready command values. Bits read from the most
/// significant end of the active width give the on-air order, so the encoders
/// never re-order bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdBytes {
    Nec {
        d: u8,
        s: u8,
        f: u8,
    },
    Kaseikyo {
        oem_m: u8,
        oem_n: u8,
        /// Extension byte of the 56-bit variants.
        x: u8,
        d: u8,
        s: u8,
        /// 12 bits wide for DENON-K, 8 otherwise.
        f: u16,
    },
    /// Denon/Sharp, Mitsubishi, JVC, RC5 and RCA carry a device and function
    /// only.
    DevFn {
        d: u8,
        f: u8,
    },
    Rc6 {
        d: u8,
        s: u8,
        f: u8,
    },
    Sony {
        d: u8,
        /// Extension byte, SONY20 only.
        e: u8,
        f: u8,
    },
    Gc100 {
        clock: u32,
        values: Vec<u16>,
    },
    Raw {
        freq: u32,
        values: Vec<u32>,
    },
    Pronto {
        code: String,
    },
}
