use crate::parse::parse_number;
use crate::protocol::{KaseikyoKind, Protocol, Rc6Kind};
use crate::{bits, Button, CmdBytes, Fnc, Obc, Remote};

/// Validate a remote definition in place, attaching the precomputed command
/// values to every button. Fails fast on the first bad button; a remote that
/// fails validation must not be used for sending.
pub fn validate(name: &str, remote: &mut Remote) -> Result<(), String> {
    if remote.model.is_empty() {
        return Err(format!("remote '{name}': missing model"));
    }

    let protocol_name = remote.encoding.protocol.to_uppercase();
    let Some(protocol) = Protocol::from_name(&protocol_name) else {
        return Err(format!("remote '{name}': unknown protocol '{protocol_name}'"));
    };

    remote.encoding.protocol = protocol_name;
    remote.encoding.proto = Some(protocol);

    if !(0..=5).contains(&remote.encoding.repeats) {
        log::warn!(
            "remote '{name}': repeats {} out of range, using 0",
            remote.encoding.repeats
        );
        remote.encoding.repeats = 0;
    }

    let (device, subdevice) = if protocol.uses_device() {
        let Some(device) = remote.encoding.device else {
            return Err(format!("remote '{name}': missing device"));
        };
        let Some(subdevice) = remote.encoding.subdevice else {
            return Err(format!("remote '{name}': missing subdevice"));
        };

        if !(0..=255).contains(&device) {
            return Err(format!("remote '{name}': device {device} out of range 0..=255"));
        }

        if !(-1..=255).contains(&subdevice) {
            return Err(format!(
                "remote '{name}': subdevice {subdevice} out of range -1..=255"
            ));
        }

        (device, subdevice)
    } else {
        (0, -1)
    };

    if let Protocol::Kaseikyo(kind) = protocol {
        if kind.info().stub {
            log::warn!(
                "remote '{name}': protocol {} is untested, codes may not decode",
                kind.info().name
            );
        }
    }

    let lsb_first = remote.encoding.lsb_first;

    for (button_name, button) in remote.buttons.iter_mut() {
        validate_button(protocol, device, subdevice, lsb_first, button)
            .map_err(|e| format!("remote '{name}': button '{button_name}': {e}"))?;
    }

    Ok(())
}

/// Interpret a field per the endianness convention. Returns the logical value
/// and the transmit-ready value whose most significant bit goes on air first.
fn field(value: i64, width: u32, lsb_first: bool, msb_on_air: bool) -> (i64, u32) {
    let obc = if lsb_first {
        value as u32
    } else {
        bits::reverse(value as u32, width)
    };

    let tx = if msb_on_air {
        obc
    } else {
        bits::reverse(obc, width)
    };

    (i64::from(obc), tx)
}

fn in_range(what: &str, value: i64, max: i64) -> Result<i64, String> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{what} {value} out of range 0..={max}"))
    }
}

fn fnc_number(fnc: &Fnc) -> Result<i64, String> {
    match fnc {
        Fnc::Number(n) => Ok(*n),
        Fnc::Text(s) => parse_number(s),
        Fnc::List(_) => Err("function code must be a number".into()),
    }
}

fn fnc_list(fnc: &Fnc) -> Result<&[i64], String> {
    match fnc {
        Fnc::List(values) => Ok(values),
        _ => Err("function code must be an integer list".into()),
    }
}

fn validate_button(
    protocol: Protocol,
    device: i64,
    subdevice: i64,
    lsb_first: bool,
    button: &mut Button,
) -> Result<(), String> {
    match protocol {
        Protocol::Gc100 => return gc100_button(button),
        Protocol::Raw => return raw_button(button),
        Protocol::Pronto => return pronto_button(button),
        _ => (),
    }

    let function = fnc_number(&button.fnc)?;
    let msb = protocol.msb_on_air();

    let (obc, cmd) = match protocol {
        Protocol::Nec(_) => {
            let function = in_range("function", function, 0xff)?;
            let (obc_d, d) = field(device, 8, lsb_first, msb);
            let (obc_f, f) = field(function, 8, lsb_first, msb);
            let (obc_s, s) = if subdevice == -1 {
                // no subdevice: transmit the complement of the device
                (-1, 0xff - obc_d as u32)
            } else {
                field(subdevice, 8, lsb_first, msb)
            };

            (
                Obc {
                    device: obc_d,
                    subdevice: obc_s,
                    function: obc_f,
                },
                CmdBytes::Nec {
                    d: d as u8,
                    s: s as u8,
                    f: f as u8,
                },
            )
        }
        Protocol::Kaseikyo(kind) => {
            let info = kind.info();
            let (d_max, s_max, f_max, d_width, s_width, f_width) =
                if kind == KaseikyoKind::DenonK {
                    (0xf, 0xf, 0xfff, 4, 4, 12)
                } else {
                    (0xff, 0xff, 0xff, 8, 8, 8)
                };

            if subdevice == -1 {
                return Err(format!("protocol {} needs a subdevice", info.name));
            }

            let function = in_range("function", function, f_max)?;
            in_range("device", device, d_max)?;
            in_range("subdevice", subdevice, s_max)?;

            let (obc_d, d) = field(device, d_width, lsb_first, msb);
            let (obc_s, s) = field(subdevice, s_width, lsb_first, msb);
            let (obc_f, f) = field(function, f_width, lsb_first, msb);

            (
                Obc {
                    device: obc_d,
                    subdevice: obc_s,
                    function: obc_f,
                },
                CmdBytes::Kaseikyo {
                    oem_m: bits::reverse(u32::from(info.oem_m), 8) as u8,
                    oem_n: bits::reverse(u32::from(info.oem_n), 8) as u8,
                    x: 0,
                    d: d as u8,
                    s: s as u8,
                    f: f as u16,
                },
            )
        }
        Protocol::Denon | Protocol::Sharp => {
            dev_fn(device, 0x1f, 5, function, 0xff, 8, subdevice, lsb_first, msb)?
        }
        Protocol::Mitsubishi | Protocol::Jvc => {
            dev_fn(device, 0xff, 8, function, 0xff, 8, subdevice, lsb_first, msb)?
        }
        Protocol::Rc5 => dev_fn(device, 0x1f, 5, function, 0x3f, 6, subdevice, lsb_first, msb)?,
        Protocol::Rca => dev_fn(device, 0xf, 4, function, 0xff, 8, subdevice, lsb_first, msb)?,
        Protocol::Rc6(kind) => {
            let function = in_range("function", function, 0xff)?;
            in_range("device", device, 0xff)?;

            let (obc_d, d) = field(device, 8, lsb_first, msb);
            let (obc_f, f) = field(function, 8, lsb_first, msb);
            let (obc_s, s) = match kind {
                Rc6Kind::Mode0 => (subdevice, 0),
                Rc6Kind::Sky => {
                    if subdevice == -1 {
                        // no documented value; Sky boxes are seen with 0x0c
                        (0x0c, 0x0c)
                    } else {
                        in_range("subdevice", subdevice, 0xf)?;
                        field(subdevice, 4, lsb_first, msb)
                    }
                }
                Rc6Kind::Mce => {
                    if subdevice == -1 {
                        return Err("MCE needs a subdevice".into());
                    }

                    field(subdevice, 8, lsb_first, msb)
                }
            };

            (
                Obc {
                    device: obc_d,
                    subdevice: obc_s,
                    function: obc_f,
                },
                CmdBytes::Rc6 {
                    d: d as u8,
                    s: s as u8,
                    f: f as u8,
                },
            )
        }
        Protocol::Sony12 | Protocol::Sony15 | Protocol::Sony20 => {
            let d_max = if protocol == Protocol::Sony15 { 0xff } else { 0x1f };
            let d_width = if protocol == Protocol::Sony15 { 8 } else { 5 };
            let function = in_range("function", function, 0x7f)?;

            in_range("device", device, d_max)?;

            let (obc_d, d) = field(device, d_width, lsb_first, msb);
            let (obc_f, f) = field(function, 7, lsb_first, msb);
            let (obc_s, e) = if protocol == Protocol::Sony20 && subdevice != -1 {
                in_range("subdevice", subdevice, 0xff)?;
                field(subdevice, 8, lsb_first, msb)
            } else {
                // SONY20 without a subdevice sends a zero extension
                (subdevice, 0)
            };

            (
                Obc {
                    device: obc_d,
                    subdevice: obc_s,
                    function: obc_f,
                },
                CmdBytes::Sony {
                    d: d as u8,
                    e: e as u8,
                    f: f as u8,
                },
            )
        }
        Protocol::Gc100 | Protocol::Raw | Protocol::Pronto => unreachable!(),
    };

    button.obc = Some(obc);
    button.cmd = Some(cmd);

    Ok(())
}

/// The common device-plus-function shape.
#[allow(clippy::too_many_arguments)]
fn dev_fn(
    device: i64,
    d_max: i64,
    d_width: u32,
    function: i64,
    f_max: i64,
    f_width: u32,
    subdevice: i64,
    lsb_first: bool,
    msb: bool,
) -> Result<(Obc, CmdBytes), String> {
    let function = in_range("function", function, f_max)?;

    in_range("device", device, d_max)?;

    let (obc_d, d) = field(device, d_width, lsb_first, msb);
    let (obc_f, f) = field(function, f_width, lsb_first, msb);

    Ok((
        Obc {
            device: obc_d,
            subdevice,
            function: obc_f,
        },
        CmdBytes::DevFn {
            d: d as u8,
            f: f as u8,
        },
    ))
}

fn gc100_button(button: &mut Button) -> Result<(), String> {
    let values = fnc_list(&button.fnc)?;

    // clock, repeat and offset lead the burst values
    if values.len() < 5 {
        return Err(format!("GC100 code too short: {} values", values.len()));
    }

    let clock = values[0];

    if !(15_000..=500_000).contains(&clock) {
        return Err(format!("GC100 clock {clock} out of range"));
    }

    let mut words = Vec::with_capacity(values.len() - 3);

    for value in &values[3..] {
        if !(1..=0xffff).contains(value) {
            return Err(format!("GC100 burst length {value} out of range"));
        }

        words.push(*value as u16);
    }

    button.obc = None;
    button.cmd = Some(CmdBytes::Gc100 {
        clock: clock as u32,
        values: words,
    });

    Ok(())
}

fn raw_button(button: &mut Button) -> Result<(), String> {
    let values = fnc_list(&button.fnc)?;

    if values.is_empty() {
        return Err("raw code is empty".into());
    }

    let freq = match button.freq {
        Some(freq) if (15_000..=500_000).contains(&freq) => freq,
        Some(freq) => return Err(format!("carrier {freq} out of range")),
        None => {
            log::debug!("raw code without a carrier, assuming 38 kHz");
            38_000
        }
    };

    let mut durations = Vec::with_capacity(values.len());

    for value in values {
        // sign only marks mark/space in the definitions file
        let us = value.unsigned_abs();

        if us == 0 {
            return Err("nonsensical 0 length".into());
        }

        durations.push(us as u32);
    }

    button.obc = None;
    button.cmd = Some(CmdBytes::Raw {
        freq: freq as u32,
        values: durations,
    });

    Ok(())
}

fn pronto_button(button: &mut Button) -> Result<(), String> {
    let Fnc::Text(code) = &button.fnc else {
        return Err("pronto code must be a string".into());
    };

    let mut words = 0;

    for word in code.split_whitespace() {
        if word.len() != 4 || u16::from_str_radix(word, 16).is_err() {
            return Err(format!("'{word}' is not a 4-digit hex word"));
        }

        words += 1;
    }

    if words < 6 {
        return Err("pronto code should be at least 6 words long".to_string());
    }

    button.obc = None;
    button.cmd = Some(CmdBytes::Pronto { code: code.clone() });

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Emitter, Encoding};
    use std::collections::HashMap;

    fn remote(protocol: &str, device: i64, subdevice: i64, fnc: Fnc) -> Remote {
        let mut buttons = HashMap::new();

        buttons.insert(
            String::from("Power"),
            Button {
                fnc,
                note: None,
                freq: None,
                obc: None,
                cmd: None,
            },
        );

        Remote {
            model: String::from("test"),
            emitter: Emitter {
                device: String::from("164"),
                service_idx: 2,
            },
            encoding: Encoding {
                protocol: protocol.to_owned(),
                device: Some(device),
                subdevice: Some(subdevice),
                lsb_first: true,
                repeats: 0,
                proto: None,
            },
            buttons,
        }
    }

    fn cmd(remote: &Remote) -> &CmdBytes {
        remote.buttons["Power"].cmd.as_ref().unwrap()
    }

    #[test]
    fn nec_command_bytes() {
        let mut r = remote("nec2", 4, -1, Fnc::Number(8));

        validate("x", &mut r).unwrap();

        assert_eq!(r.encoding.protocol, "NEC2");
        assert_eq!(
            *cmd(&r),
            CmdBytes::Nec {
                d: 0x20,
                s: 0xfb,
                f: 0x10
            }
        );

        let obc = r.buttons["Power"].obc.unwrap();

        assert_eq!((obc.device, obc.subdevice, obc.function), (4, -1, 8));
    }

    #[test]
    fn hex_function_codes_parse() {
        let mut r = remote("NEC", 4, 0, Fnc::Text(String::from("0x08")));

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Nec {
                d: 0x20,
                s: 0,
                f: 0x10
            }
        );
    }

    #[test]
    fn endianness_flip_is_involutive() {
        let mut straight = remote("NEC", 4, 9, Fnc::Number(8));
        let mut reversed = remote("NEC", 0x20, 0x90, Fnc::Number(0x10));

        reversed.encoding.lsb_first = false;

        validate("x", &mut straight).unwrap();
        validate("x", &mut reversed).unwrap();

        assert_eq!(cmd(&straight), cmd(&reversed));

        let mut straight = remote("RC5", 5, -1, Fnc::Number(35));
        let mut reversed = remote("RC5", 0b10100, -1, Fnc::Number(0b110001));

        reversed.encoding.lsb_first = false;

        validate("x", &mut straight).unwrap();
        validate("x", &mut reversed).unwrap();

        assert_eq!(cmd(&straight), cmd(&reversed));
    }

    #[test]
    fn rc5_keeps_reading_order() {
        let mut r = remote("RC5", 5, -1, Fnc::Number(35));

        validate("x", &mut r).unwrap();

        assert_eq!(*cmd(&r), CmdBytes::DevFn { d: 5, f: 35 });
    }

    #[test]
    fn rc5_function_range() {
        let mut r = remote("RC5", 5, -1, Fnc::Number(64));

        assert!(validate("x", &mut r).unwrap_err().contains("out of range"));
    }

    #[test]
    fn kaseikyo_oem_bytes() {
        let mut r = remote("Panasonic", 8, 0, Fnc::Number(0x3d));

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Kaseikyo {
                oem_m: 0x40,
                oem_n: 0x04,
                x: 0,
                d: 0x10,
                s: 0,
                f: 0xbc
            }
        );
    }

    #[test]
    fn denon_k_field_widths() {
        let mut r = remote("DENON-K", 3, 1, Fnc::Number(0x800));

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Kaseikyo {
                oem_m: bits::reverse(0x54, 8) as u8,
                oem_n: bits::reverse(0x32, 8) as u8,
                x: 0,
                d: 0b1100,
                s: 0b1000,
                f: 0x001
            }
        );

        let mut r = remote("DENON-K", 16, 0, Fnc::Number(1));

        assert!(validate("x", &mut r).is_err());
    }

    #[test]
    fn sony20_defaults_extension() {
        let mut r = remote("SONY20", 1, -1, Fnc::Number(46));

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Sony {
                d: 0x10,
                e: 0,
                f: 0b0111010
            }
        );
    }

    #[test]
    fn repeats_are_coerced() {
        let mut r = remote("NEC", 4, -1, Fnc::Number(8));

        r.encoding.repeats = 17;
        validate("x", &mut r).unwrap();
        assert_eq!(r.encoding.repeats, 0);

        r.encoding.repeats = 5;
        validate("x", &mut r).unwrap();
        assert_eq!(r.encoding.repeats, 5);
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let mut r = remote("NECX", 4, -1, Fnc::Number(8));

        assert!(validate("x", &mut r)
            .unwrap_err()
            .contains("unknown protocol"));
    }

    #[test]
    fn device_out_of_range_is_rejected() {
        let mut r = remote("NEC", 256, -1, Fnc::Number(8));

        assert!(validate("x", &mut r).unwrap_err().contains("out of range"));
    }

    #[test]
    fn pronto_shape() {
        let code = "0000 006D 0000 0001 0150 00A8";
        let mut r = remote("PRONTO", 0, -1, Fnc::Text(code.to_owned()));

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Pronto {
                code: code.to_owned()
            }
        );

        let mut r = remote("PRONTO", 0, -1, Fnc::Text(String::from("0000 6D")));

        assert!(validate("x", &mut r).is_err());
    }

    #[test]
    fn gc100_skips_preamble() {
        let mut r = remote(
            "GC100",
            0,
            -1,
            Fnc::List(vec![38_000, 1, 1, 342, 171, 21, 64]),
        );

        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Gc100 {
                clock: 38_000,
                values: vec![342, 171, 21, 64]
            }
        );
    }

    #[test]
    fn raw_takes_magnitudes() {
        let mut r = remote("RAW", 0, -1, Fnc::List(vec![9000, -4500, 560, -560]));

        r.buttons.get_mut("Power").unwrap().freq = Some(38_000);
        validate("x", &mut r).unwrap();

        assert_eq!(
            *cmd(&r),
            CmdBytes::Raw {
                freq: 38_000,
                values: vec![9000, 4500, 560, 560]
            }
        );
    }
}
