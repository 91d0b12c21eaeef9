//! Commands that write to the device.

use crate::constants::*;
use crate::error::Result;
use crate::frame::Frame;
use crate::responses::{ActionButtonSetting, AlertSetting, MultipointSetting, VoicePromptSetting};
use crate::types::*;

/// Commands with a structured request payload.
#[derive(Debug, Clone)]
pub enum Command {
    /// Change voice prompt language and enabled flag.
    SetVoicePrompts(VoicePromptSetting),

    /// Rebind the action button.
    SetButtons(ActionButtonSetting),

    /// Change ringtone and haptic alerts.
    SetAlerts(AlertSetting),

    /// Change multipoint.
    SetMultipoint(MultipointSetting),

    /// Start or stop the locate-me tone.
    SetChirp {
        /// Start (true) or stop (false).
        chirping: bool,
    },

    /// Connect a paired source device.
    ConnectDevice {
        /// Device to connect.
        address: MacAddress,
    },

    /// Connect a source device while keeping another connected.
    ConnectDeviceAndKeep {
        /// Device to connect.
        address: MacAddress,
        /// Its product type.
        product_type: ProductType,
        /// Device that stays connected.
        keep: MacAddress,
    },

    /// Query connected devices.
    ListDevices,

    /// Query one paired device.
    DeviceInfo {
        /// Paired device.
        address: MacAddress,
    },
}

impl Command {
    /// Build the request frame.
    pub fn frame(&self) -> Result<Frame> {
        let (block, function, operator, payload) = match self {
            Command::SetVoicePrompts(setting) => (
                FunctionBlock::Settings,
                settings::VOICE_PROMPTS,
                Operator::SetGet,
                setting.encode_payload(),
            ),
            Command::SetButtons(setting) => (
                FunctionBlock::Settings,
                settings::BUTTONS,
                Operator::SetGet,
                setting.encode_payload()?,
            ),
            Command::SetAlerts(setting) => (
                FunctionBlock::Settings,
                settings::ALERTS,
                Operator::SetGet,
                setting.encode_payload(),
            ),
            Command::SetMultipoint(setting) => (
                FunctionBlock::Settings,
                settings::MULTIPOINT,
                Operator::SetGet,
                setting.encode_payload(),
            ),
            Command::SetChirp { chirping } => (
                FunctionBlock::Control,
                control::CHIRP,
                Operator::Start,
                vec![u8::from(*chirping)],
            ),
            Command::ConnectDevice { address } => (
                FunctionBlock::DeviceManagement,
                device_management::CONNECT_DEVICE,
                Operator::Start,
                connect_payload(0, &[address]),
            ),
            Command::ConnectDeviceAndKeep {
                address,
                product_type,
                keep,
            } => (
                FunctionBlock::DeviceManagement,
                device_management::CONNECT_DEVICE,
                Operator::Start,
                connect_payload(
                    (product_type.value() << 7) | CONNECT_FLAG_KEEP_DEVICE,
                    &[address, keep],
                ),
            ),
            Command::ListDevices => (
                FunctionBlock::DeviceManagement,
                device_management::LIST_DEVICES,
                Operator::Get,
                Vec::new(),
            ),
            Command::DeviceInfo { address } => (
                FunctionBlock::DeviceManagement,
                device_management::DEVICE_INFO,
                Operator::Get,
                address.as_bytes().to_vec(),
            ),
        };
        Frame::new(block, function, operator, payload)
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.frame()?.encode()
    }
}

fn connect_payload(flags: u8, addresses: &[&MacAddress]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(1 + addresses.len() * MAC_ADDRESS_LEN);
    payload.push(flags);
    for address in addresses {
        payload.extend_from_slice(address.as_bytes());
    }
    payload
}
