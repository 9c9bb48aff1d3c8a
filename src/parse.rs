//! Deserialize the remote-definitions document.
//!
//! The document grew up in a loosely typed host, so numeric fields may arrive
//! as JSON numbers, decimal strings or 0x-prefixed hex strings; all three are
//! accepted here. Decompression of the file is the host loader's business,
//! this module only sees the JSON text.

use crate::{Button, Emitter, Encoding, Fnc, Remote};
use serde::Deserialize;
use std::collections::HashMap;

/// Parse a decimal or 0x-prefixed hex number.
pub(crate) fn parse_number(s: &str) -> Result<i64, String> {
    let s = s.trim();

    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };

    parsed.map_err(|_| format!("'{s}' is not a number"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(i64),
    Str(String),
}

impl NumOrStr {
    fn to_number(&self) -> Result<i64, String> {
        match self {
            NumOrStr::Num(n) => Ok(*n),
            NumOrStr::Str(s) => parse_number(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FncDef {
    Number(i64),
    Text(String),
    List(Vec<i64>),
}

#[derive(Deserialize)]
struct EmitterDef {
    #[serde(rename = "Device")]
    device: String,
    #[serde(rename = "ServiceIdx")]
    service_idx: NumOrStr,
}

#[derive(Deserialize)]
struct EncodingDef {
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "Device")]
    device: Option<NumOrStr>,
    #[serde(rename = "Subdevice")]
    subdevice: Option<NumOrStr>,
    #[serde(rename = "LSBfirst")]
    lsb_first: Option<bool>,
    #[serde(rename = "Repeats")]
    repeats: Option<NumOrStr>,
}

#[derive(Deserialize)]
struct ButtonDef {
    #[serde(rename = "Fnc")]
    fnc: FncDef,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Freq")]
    freq: Option<NumOrStr>,
}

#[derive(Deserialize)]
struct RemoteDef {
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "IRemitter")]
    emitter: EmitterDef,
    #[serde(rename = "Encoding")]
    encoding: EncodingDef,
    #[serde(rename = "Functions")]
    functions: HashMap<String, ButtonDef>,
}

impl RemoteDef {
    fn into_remote(self) -> Result<Remote, String> {
        let service_idx = self.emitter.service_idx.to_number()?;

        if !(0..=255).contains(&service_idx) {
            return Err(format!("service index {service_idx} out of range"));
        }

        let mut buttons = HashMap::with_capacity(self.functions.len());

        for (name, def) in self.functions {
            let freq = def.freq.map(|f| f.to_number()).transpose()?;

            buttons.insert(
                name,
                Button {
                    fnc: match def.fnc {
                        FncDef::Number(n) => Fnc::Number(n),
                        FncDef::Text(s) => Fnc::Text(s),
                        FncDef::List(values) => Fnc::List(values),
                    },
                    note: def.note,
                    freq,
                    obc: None,
                    cmd: None,
                },
            );
        }

        Ok(Remote {
            model: self.model,
            emitter: Emitter {
                device: self.emitter.device,
                service_idx: service_idx as u8,
            },
            encoding: Encoding {
                protocol: self.encoding.protocol,
                device: self.encoding.device.map(|d| d.to_number()).transpose()?,
                subdevice: self.encoding.subdevice.map(|s| s.to_number()).transpose()?,
                lsb_first: self.encoding.lsb_first.unwrap_or(true),
                repeats: self.encoding.repeats.map_or(Ok(0), |r| r.to_number())?,
                proto: None,
            },
            buttons,
        })
    }
}

/// Parse a remote-definitions document into the unvalidated remote table.
pub fn parse_remotes(json: &str) -> Result<HashMap<String, Remote>, String> {
    let defs: HashMap<String, RemoteDef> =
        serde_json::from_str(json).map_err(|e| format!("remote definitions: {e}"))?;

    defs.into_iter()
        .map(|(name, def)| {
            let remote = def
                .into_remote()
                .map_err(|e| format!("remote '{name}': {e}"))?;

            Ok((name, remote))
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_number_test() {
        assert_eq!(parse_number("8"), Ok(8));
        assert_eq!(parse_number("0x08"), Ok(8));
        assert_eq!(parse_number("0XFF"), Ok(255));
        assert_eq!(parse_number(" -1 "), Ok(-1));
        assert_eq!(parse_number("power"), Err("'power' is not a number".into()));
    }

    #[test]
    fn parse_remotes_test() {
        let json = r#"{
            "MyTV": {
                "Model": "Generic TV",
                "IRemitter": { "Device": "164", "ServiceIdx": "2" },
                "Encoding": {
                    "Protocol": "NEC2",
                    "Device": 4, "Subdevice": -1,
                    "LSBfirst": true, "Repeats": "0"
                },
                "Functions": {
                    "Power": { "Fnc": "0x08", "Note": "toggle" },
                    "Mute": { "Fnc": 9 }
                }
            }
        }"#;

        let remotes = parse_remotes(json).unwrap();
        let tv = &remotes["MyTV"];

        assert_eq!(tv.model, "Generic TV");
        assert_eq!(tv.emitter.device, "164");
        assert_eq!(tv.emitter.service_idx, 2);
        assert_eq!(tv.encoding.protocol, "NEC2");
        assert_eq!(tv.encoding.device, Some(4));
        assert_eq!(tv.encoding.subdevice, Some(-1));
        assert_eq!(tv.encoding.repeats, 0);
        assert!(tv.encoding.lsb_first);
        assert_eq!(tv.buttons["Power"].fnc, Fnc::Text(String::from("0x08")));
        assert_eq!(tv.buttons["Power"].note.as_deref(), Some("toggle"));
        assert_eq!(tv.buttons["Mute"].fnc, Fnc::Number(9));
    }

    #[test]
    fn raw_buttons_carry_a_carrier() {
        let json = r#"{
            "Fan": {
                "Model": "Ceiling fan",
                "IRemitter": { "Device": "10", "ServiceIdx": 1 },
                "Encoding": { "Protocol": "RAW" },
                "Functions": {
                    "Faster": { "Fnc": [9000, -4500, 560], "Freq": 38000 }
                }
            }
        }"#;

        let remotes = parse_remotes(json).unwrap();
        let fan = &remotes["Fan"];

        assert_eq!(fan.encoding.device, None);
        assert_eq!(fan.buttons["Faster"].freq, Some(38_000));
        assert_eq!(
            fan.buttons["Faster"].fnc,
            Fnc::List(vec![9000, -4500, 560])
        );
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(parse_remotes("[]").is_err());
        assert!(parse_remotes(r#"{"X": {"Model": 3}}"#).is_err());
    }
}
