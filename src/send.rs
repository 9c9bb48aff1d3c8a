use crate::parse::{parse_number, parse_remotes};
use crate::protocol::{Protocol, Rc6Kind};
use crate::{encode, pronto, validate, Button, CmdBytes, Emitter, Encoding, Fnc, Remote};
use std::collections::HashMap;

/// Reserved name the ad-hoc send path stores its ephemeral remote under.
pub const ADHOC_REMOTE: &str = "__adhoc";
/// The single button of the ephemeral remote.
pub const ADHOC_BUTTON: &str = "Send";

/// The host transport a Pronto code is handed to. Service index 1 is a
/// GC100-style unit, 2 a BroadLink-style unit.
pub trait Transmitter {
    fn transmit(&mut self, device: &str, service_idx: u8, pronto: &str) -> Result<(), String>;
}

/// The validated remote table plus the one piece of long-lived protocol
/// state, the MCE toggle.
#[derive(Debug)]
pub struct Codec {
    remotes: HashMap<String, Remote>,
    mce_toggle: bool,
}

impl Codec {
    /// Validate every remote and build the codec. Any invalid remote rejects
    /// the whole table.
    pub fn new(mut remotes: HashMap<String, Remote>) -> Result<Self, String> {
        for (name, remote) in remotes.iter_mut() {
            validate(name, remote)?;
        }

        Ok(Codec {
            remotes,
            mce_toggle: false,
        })
    }

    /// Parse and validate a remote-definitions document.
    pub fn from_json(json: &str) -> Result<Self, String> {
        Codec::new(parse_remotes(json)?)
    }

    pub fn remotes(&self) -> &HashMap<String, Remote> {
        &self.remotes
    }

    /// Encode one button press into a Pronto hex string. Unknown names are
    /// logged and answered with `None`.
    ///
    /// This advances the MCE toggle when the button routes through the MCE
    /// encoder, once per call regardless of the repeat count.
    pub fn encode(&mut self, remote_name: &str, button_name: &str) -> Option<String> {
        let Some(remote) = self.remotes.get(remote_name) else {
            log::warn!("unknown remote '{remote_name}'");
            return None;
        };
        let Some(button) = remote.buttons.get(button_name) else {
            log::warn!("remote '{remote_name}' has no button '{button_name}'");
            return None;
        };
        let (Some(protocol), Some(cmd)) = (remote.encoding.proto, button.cmd.as_ref()) else {
            log::error!("remote '{remote_name}' was never validated");
            return None;
        };

        if let CmdBytes::Pronto { code } = cmd {
            // stored codes go out verbatim, repeats do not apply
            return Some(code.clone());
        }

        let toggle = if protocol == Protocol::Rc6(Rc6Kind::Mce) {
            let toggle = self.mce_toggle;

            self.mce_toggle = !toggle;
            toggle
        } else {
            false
        };

        match encode::encode(protocol, cmd, toggle) {
            Ok(frame) => Some(pronto::assemble(&frame, remote.encoding.repeats)),
            Err(e) => {
                log::error!("remote '{remote_name}' button '{button_name}': {e}");
                None
            }
        }
    }

    /// Encode a button press and hand it to the transmitter owning the
    /// remote's emitter. Returns the code actually transmitted.
    pub fn send(
        &mut self,
        remote_name: &str,
        button_name: &str,
        transmitter: &mut dyn Transmitter,
    ) -> Option<String> {
        let Some(remote) = self.remotes.get(remote_name) else {
            log::warn!("unknown remote '{remote_name}'");
            return None;
        };
        let emitter = remote.emitter.clone();
        let code = self.encode(remote_name, button_name)?;

        match emitter.service_idx {
            1 | 2 => match transmitter.transmit(&emitter.device, emitter.service_idx, &code) {
                Ok(()) => Some(code),
                Err(e) => {
                    log::error!("transmitter {}: {e}", emitter.device);
                    None
                }
            },
            3 => {
                log::warn!("Kira transmitters are not supported, dropping code");
                None
            }
            4 => {
                log::warn!("Tasmota transmitters are not supported, dropping code");
                None
            }
            n => {
                log::warn!("unknown transmitter service index {n}, dropping code");
                None
            }
        }
    }

    /// Send a one-off code described by IRP-style parameters. All parameters
    /// arrive as strings; the code is wrapped in an ephemeral remote under
    /// [`ADHOC_REMOTE`] and routed through the normal send path.
    #[allow(clippy::too_many_arguments)]
    pub fn send_adhoc(
        &mut self,
        protocol: &str,
        device: &str,
        subdevice: &str,
        function: &str,
        repeats: &str,
        ir_device: &str,
        service_idx: &str,
        transmitter: &mut dyn Transmitter,
    ) -> Option<String> {
        match self.insert_adhoc(
            protocol,
            device,
            subdevice,
            function,
            repeats,
            ir_device,
            service_idx,
        ) {
            Ok(()) => self.send(ADHOC_REMOTE, ADHOC_BUTTON, transmitter),
            Err(e) => {
                log::error!("ad-hoc code rejected: {e}");
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_adhoc(
        &mut self,
        protocol: &str,
        device: &str,
        subdevice: &str,
        function: &str,
        repeats: &str,
        ir_device: &str,
        service_idx: &str,
    ) -> Result<(), String> {
        let service_idx = parse_number(service_idx)?;

        if !(0..=255).contains(&service_idx) {
            return Err(format!("service index {service_idx} out of range"));
        }

        let mut buttons = HashMap::new();

        buttons.insert(
            ADHOC_BUTTON.to_owned(),
            Button {
                fnc: Fnc::Number(parse_number(function)?),
                note: None,
                freq: None,
                obc: None,
                cmd: None,
            },
        );

        let mut remote = Remote {
            model: String::from("ad-hoc code"),
            emitter: Emitter {
                device: ir_device.to_owned(),
                service_idx: service_idx as u8,
            },
            encoding: Encoding {
                protocol: protocol.to_owned(),
                device: Some(parse_number(device)?),
                subdevice: Some(parse_number(subdevice)?),
                lsb_first: true,
                repeats: parse_number(repeats)?,
                proto: None,
            },
            buttons,
        };

        validate(ADHOC_REMOTE, &mut remote)?;
        self.remotes.insert(ADHOC_REMOTE.to_owned(), remote);

        Ok(())
    }
}
