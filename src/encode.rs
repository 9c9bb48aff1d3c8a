use crate::bits;
use crate::burst::{EncodedFrame, Frame, PdmTiming};
use crate::clock::ClockState;
use crate::manchester::{Manchester, OneHalves};
use crate::protocol::{KaseikyoKind, NecKind, Protocol, Rc6Kind};
use crate::CmdBytes;

/// Encode one button press into a single burst frame. `mce_toggle` is the
/// codec's current toggle value; only the MCE encoder looks at it.
pub fn encode(protocol: Protocol, cmd: &CmdBytes, mce_toggle: bool) -> Result<EncodedFrame, String> {
    match (protocol, cmd) {
        (Protocol::Nec(kind), CmdBytes::Nec { d, s, f }) => Ok(nec(kind, *d, *s, *f)),
        (
            Protocol::Kaseikyo(kind),
            CmdBytes::Kaseikyo {
                oem_m,
                oem_n,
                x,
                d,
                s,
                f,
            },
        ) => Ok(kaseikyo(kind, [*oem_m, *oem_n, *x, *d, *s], *f)),
        (Protocol::Denon, CmdBytes::DevFn { d, f }) => Ok(denon(*d, *f, false)),
        (Protocol::Sharp, CmdBytes::DevFn { d, f }) => Ok(denon(*d, *f, true)),
        (Protocol::Mitsubishi, CmdBytes::DevFn { d, f }) => Ok(mitsubishi(*d, *f)),
        (Protocol::Jvc, CmdBytes::DevFn { d, f }) => Ok(jvc(*d, *f)),
        (Protocol::Rc5, CmdBytes::DevFn { d, f }) => Ok(rc5(*d, *f)),
        (Protocol::Rc6(kind), CmdBytes::Rc6 { d, s, f }) => Ok(rc6(kind, *d, *s, *f, mce_toggle)),
        (Protocol::Rca, CmdBytes::DevFn { d, f }) => Ok(rca(*d, *f)),
        (Protocol::Sony12, CmdBytes::Sony { d, f, .. }) => Ok(sony(*d, 5, None, *f)),
        (Protocol::Sony15, CmdBytes::Sony { d, f, .. }) => Ok(sony(*d, 8, None, *f)),
        (Protocol::Sony20, CmdBytes::Sony { d, e, f }) => Ok(sony(*d, 5, Some(*e), *f)),
        (Protocol::Gc100, CmdBytes::Gc100 { clock, values }) => Ok(gc100(*clock, values)),
        (Protocol::Raw, CmdBytes::Raw { freq, values }) => Ok(raw(*freq, values)),
        _ => Err(format!("command bytes do not fit protocol {protocol}")),
    }
}

const NEC_PDM: PdmTiming = PdmTiming {
    zero: (1, 1),
    one: (1, 3),
};

fn nec(kind: NecKind, d: u8, s: u8, f: u8) -> EncodedFrame {
    let mut clock = ClockState::new(38_000.0, 21);

    if kind == NecKind::Pioneer {
        // the header advertises 40 kHz; burst lengths stay on the 38 kHz grid
        clock.prescaler = ClockState::new(40_000.0, 21).prescaler;
    }

    let mut frame = Frame::new(clock);

    if kind == NecKind::Samsung {
        frame.burst(8, 8);
    } else {
        frame.burst(16, 8);
    }

    for byte in [d, s, f, 0xff - f] {
        frame.pdm(u32::from(byte), 8, NEC_PDM);
    }

    frame.mark(1);
    frame.extent(108.0);
    frame.finish(0)
}

fn kaseikyo(kind: KaseikyoKind, [oem_m, oem_n, x, d, s]: [u8; 5], f: u16) -> EncodedFrame {
    let info = kind.info();
    let mut frame = Frame::new(ClockState::new(info.carrier, info.unit));

    frame.burst(8, 4);
    frame.pdm(u32::from(oem_m), 8, NEC_PDM);
    frame.pdm(u32::from(oem_n), 8, NEC_PDM);

    if info.extension {
        frame.pdm(u32::from(x), 8, NEC_PDM);
    }

    if kind == KaseikyoKind::DenonK {
        // genre nibbles, 12-bit function split low 4 first, then a zero pad
        frame.pdm(u32::from(d), 4, NEC_PDM);
        frame.pdm(u32::from(s), 4, NEC_PDM);
        frame.pdm(u32::from(f), 12, NEC_PDM);
        frame.pdm(0, 4, NEC_PDM);

        if info.checksum {
            frame.pdm(u32::from(denon_k_checksum(d, s, f)), 8, NEC_PDM);
        }
    } else {
        frame.pdm(u32::from(d), 8, NEC_PDM);
        frame.pdm(u32::from(s), 8, NEC_PDM);
        frame.pdm(u32::from(f), 8, NEC_PDM);

        if info.checksum {
            let mut checksum = d ^ s ^ f as u8;

            if info.extension {
                checksum ^= x;
            }

            frame.pdm(u32::from(checksum), 8, NEC_PDM);
        }
    }

    frame.burst(1, info.trailer);
    frame.finish(0)
}

/// XOR of the three repacked logical bytes. The stored values are
/// transmit-ready, so fold them back before packing and reverse the result.
fn denon_k_checksum(d: u8, s: u8, f: u16) -> u8 {
    let d = bits::reverse(u32::from(d), 4);
    let s = bits::reverse(u32::from(s), 4);
    let f = bits::reverse(u32::from(f), 12);

    let checksum = (d | s << 4) ^ (f & 0xff) ^ (f >> 8);

    bits::reverse(checksum, 8) as u8
}

const DENON_PDM: PdmTiming = PdmTiming {
    zero: (1, 3),
    one: (1, 7),
};

fn denon(d: u8, f: u8, sharp: bool) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(38_000.0, 10));
    let ext = u32::from(sharp);

    frame.pdm(u32::from(d), 5, DENON_PDM);
    frame.pdm(u32::from(f), 8, DENON_PDM);
    frame.pdm(bits::reverse(ext, 2), 2, DENON_PDM);
    frame.burst(1, 165);

    frame.pdm(u32::from(d), 5, DENON_PDM);
    frame.pdm(u32::from(0xff - f), 8, DENON_PDM);
    frame.pdm(bits::reverse(ext ^ 3, 2), 2, DENON_PDM);
    frame.burst(1, 165);

    frame.finish(0)
}

fn mitsubishi(d: u8, f: u8) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(32_600.0, 10));

    frame.pdm(u32::from(d), 8, DENON_PDM);
    frame.pdm(u32::from(f), 8, DENON_PDM);
    frame.burst(1, 80);
    frame.finish(0)
}

fn jvc(d: u8, f: u8) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(38_000.0, 20));

    frame.burst(16, 8);
    frame.pdm(u32::from(d), 8, NEC_PDM);
    frame.pdm(u32::from(f), 8, NEC_PDM);
    frame.burst(1, 45);

    // repeat copies carry data and trailer only
    frame.finish(2)
}

fn rc5(d: u8, f: u8) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(36_000.0, 32));
    let mut man = Manchester::new();

    // two start ones and the toggle, always zero
    man.push_bits(0b110, 3, OneHalves::SpaceMark, 1);
    man.push_bits(u32::from(d), 5, OneHalves::SpaceMark, 1);
    man.push_bits(u32::from(f), 6, OneHalves::SpaceMark, 1);

    man.skip_leading_space();
    man.collapse(&mut frame);
    frame.extent(113.778);
    frame.finish(0)
}

fn rc6(kind: Rc6Kind, d: u8, s: u8, f: u8, toggle: bool) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(36_000.0, 16));
    let mut man = Manchester::new();

    frame.burst(6, 2);
    man.push_bits(1, 1, OneHalves::MarkSpace, 1);

    let mode = match kind {
        Rc6Kind::Mode0 => 0b000,
        Rc6Kind::Sky | Rc6Kind::Mce => 0b110,
    };

    man.push_bits(mode, 3, OneHalves::MarkSpace, 1);
    // header toggle, always zero, double width
    man.push_bits(0, 1, OneHalves::MarkSpace, 2);

    match kind {
        Rc6Kind::Mode0 => {
            man.push_bits(u32::from(d), 8, OneHalves::MarkSpace, 1);
            man.push_bits(u32::from(f), 8, OneHalves::MarkSpace, 1);
        }
        Rc6Kind::Sky => {
            man.push_bits(u32::from(d), 8, OneHalves::MarkSpace, 1);
            man.push_bits(u32::from(s), 4, OneHalves::MarkSpace, 1);
            man.push_bits(u32::from(f), 8, OneHalves::MarkSpace, 1);
        }
        Rc6Kind::Mce => {
            let d = u32::from(d & 0x7f) | (u32::from(toggle) << 7);

            man.push_bits(0x80, 8, OneHalves::MarkSpace, 1);
            man.push_bits(u32::from(s), 8, OneHalves::MarkSpace, 1);
            man.push_bits(d, 8, OneHalves::MarkSpace, 1);
            man.push_bits(u32::from(f), 8, OneHalves::MarkSpace, 1);
        }
    }

    man.collapse(&mut frame);
    frame.extent(106.667);
    frame.finish(0)
}

const RCA_PDM: PdmTiming = PdmTiming {
    zero: (1, 2),
    one: (1, 4),
};

fn rca(d: u8, f: u8) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(56_700.0, 28));

    frame.burst(8, 8);
    frame.pdm(u32::from(d), 4, RCA_PDM);
    frame.pdm(u32::from(f), 8, RCA_PDM);
    frame.pdm(u32::from(!d) & 0xf, 4, RCA_PDM);
    frame.pdm(u32::from(!f), 8, RCA_PDM);
    frame.burst(1, 16);
    frame.finish(0)
}

const SONY_PDM: PdmTiming = PdmTiming {
    zero: (1, 1),
    one: (2, 1),
};

fn sony(d: u8, d_bits: u32, e: Option<u8>, f: u8) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(40_000.0, 24));

    frame.burst(4, 1);
    frame.pdm(u32::from(f), 7, SONY_PDM);
    frame.pdm(u32::from(d), d_bits, SONY_PDM);

    if let Some(e) = e {
        frame.pdm(u32::from(e), 8, SONY_PDM);
    }

    // the last data space is folded into the lead-out
    frame.extent_absorbing(45.0);
    frame.finish(0)
}

fn gc100(clock: u32, values: &[u16]) -> EncodedFrame {
    let mut frame = Frame::new(ClockState::new(f64::from(clock), 1));

    // sendir counts are already carrier periods
    for value in values {
        frame.word(u32::from(*value));
    }

    frame.finish(0)
}

fn raw(freq: u32, values: &[u32]) -> EncodedFrame {
    let clock = ClockState::new(f64::from(freq), 1);
    let mut frame = Frame::new(clock);

    for us in values {
        frame.word(clock.cycles_for_us(*us));
    }

    frame.finish(0)
}
