//! Typed STATUS payloads.
//!
//! Each payload type decodes from the raw bytes of one STATUS frame. Types
//! that can be written back also produce their SET_GET payload.

use serde::Serialize;

use crate::bitmask::decode_bitmask;
use crate::constants::*;
use crate::error::*;
use crate::types::*;

/// A decoded STATUS payload, as produced by the function registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FunctionValue {
    /// UTF-8 text.
    Text(String),
    /// A MAC address.
    MacAddress(MacAddress),
    /// Supported function blocks.
    FunctionBlocks(Vec<FunctionBlock>),
    /// Product id and variant.
    ProductIdVariant(ProductIdVariant),
    /// Bytes with no known structure.
    Raw(Vec<u8>),
    /// Voice prompt configuration.
    VoicePrompts(VoicePromptSetting),
    /// Auto-off timer in minutes.
    StandbyTimer(u8),
    /// Noise cancellation steps.
    Cnc(CncSetting),
    /// Noise reduction level.
    Anr(AnrSetting),
    /// Bass steps.
    BassControl(BassControl),
    /// Ringtone and haptic alerts.
    Alerts(AlertSetting),
    /// Action button.
    Buttons(ActionButtonSetting),
    /// Multipoint.
    Multipoint(MultipointSetting),
    /// Sidetone.
    Sidetone(SidetoneSetting),
    /// Head-motion volume control enabled.
    ImuVolumeControl(bool),
    /// Locate-me tone state.
    Chirp(ChirpStatus),
    /// Connected source devices.
    ConnectedDevices(ConnectedDevices),
    /// One paired device.
    PairedDevice(PairedDevice),
}

/// Decode a UTF-8 text payload.
pub fn decode_text(data: &[u8]) -> Result<String> {
    Ok(String::from_utf8(data.to_vec())?)
}

/// Decode a 6-byte MAC address payload.
pub fn decode_mac_address(data: &[u8]) -> Result<MacAddress> {
    BmapError::require_len(data, MAC_ADDRESS_LEN)?;
    MacAddress::from_slice(&data[..MAC_ADDRESS_LEN])
        .ok_or_else(|| BmapError::InvalidData("MAC address".to_string()))
}

// ============================================================================
// Product Info
// ============================================================================

/// Product id and variant reported by PRODUCT_ID_VARIANT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductIdVariant {
    /// Catalog product id.
    pub product_id: u16,
    /// Product variant (color, edition).
    pub variant: u8,
}

impl ProductIdVariant {
    /// Decode from a payload of at least three bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 3)?;
        Ok(ProductIdVariant {
            product_id: u16::from_be_bytes([data[0], data[1]]),
            variant: data[2],
        })
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Voice prompt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoicePromptSetting {
    /// Whether the host may change the setting.
    pub can_change: bool,
    /// Prompts are enabled.
    pub enabled: bool,
    /// Active language.
    pub language: VoicePromptLanguage,
    /// Languages the device ships.
    pub supported_languages: Vec<VoicePromptLanguage>,
}

impl VoicePromptSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        let b = data[0];
        Ok(VoicePromptSetting {
            can_change: b & VOICE_PROMPT_CAN_CHANGE != 0,
            enabled: b & VOICE_PROMPT_ENABLED != 0,
            language: VoicePromptLanguage::from(b & VOICE_PROMPT_LANGUAGE),
            supported_languages: decode_bitmask(&data[1..]),
        })
    }

    /// SET_GET payload: language and enabled flag.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut b = self.language.value() & VOICE_PROMPT_LANGUAGE;
        if self.enabled {
            b |= VOICE_PROMPT_ENABLED;
        }
        vec![b]
    }
}

/// Controllable noise cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CncSetting {
    /// Number of steps.
    pub steps: u8,
    /// Current step.
    pub current: u8,
}

impl CncSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 2)?;
        Ok(CncSetting {
            steps: data[0],
            current: data[1],
        })
    }
}

/// Active noise reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnrSetting {
    /// Current level.
    pub level: AnrLevel,
    /// Levels the device supports.
    pub supported: Vec<AnrLevel>,
}

impl AnrSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        Ok(AnrSetting {
            level: AnrLevel::from(data[0]),
            supported: decode_bitmask(&data[1..]),
        })
    }
}

/// Bass adjustment; steps are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BassControl {
    /// Lowest step.
    pub min: i8,
    /// Highest step.
    pub max: i8,
    /// Current step.
    pub current: i8,
}

impl BassControl {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 3)?;
        Ok(BassControl {
            min: data[0] as i8,
            max: data[1] as i8,
            current: data[2] as i8,
        })
    }
}

/// Ringtone and haptic alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertSetting {
    /// Ringtone on incoming calls.
    pub ringtone: bool,
    /// Vibration on incoming calls.
    pub haptics: bool,
}

impl AlertSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        Ok(AlertSetting {
            ringtone: data[0] & 0b01 != 0,
            haptics: data[0] & 0b10 != 0,
        })
    }

    /// SET_GET payload.
    pub fn encode_payload(&self) -> Vec<u8> {
        vec![u8::from(self.ringtone) | (u8::from(self.haptics) << 1)]
    }
}

/// Action button configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButtonSetting {
    /// Whether the device lets the host rebind the button.
    pub configurable: bool,
    /// Button id.
    pub button_id: u8,
    /// Event type (press, long press, ...).
    pub event_type: u8,
    /// Bound function.
    pub mode: ActionButtonMode,
    /// Functions the button can be bound to.
    pub supported_modes: Vec<ActionButtonMode>,
}

impl Default for ActionButtonSetting {
    fn default() -> Self {
        ActionButtonSetting {
            configurable: false,
            button_id: DEFAULT_BUTTON_ID,
            event_type: DEFAULT_BUTTON_EVENT_TYPE,
            mode: ActionButtonMode::NotConfigured,
            supported_modes: Vec::new(),
        }
    }
}

impl ActionButtonSetting {
    /// Decode from a STATUS payload.
    ///
    /// A one-byte payload means the button cannot be configured right now.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() == 1 {
            return Ok(ActionButtonSetting::default());
        }
        BmapError::require_len(data, 3)?;
        Ok(ActionButtonSetting {
            configurable: true,
            button_id: data[0],
            event_type: data[1],
            mode: ActionButtonMode::from(data[2]),
            supported_modes: decode_bitmask(&data[3..]),
        })
    }

    /// SET_GET payload binding `mode` to this button.
    pub fn encode_payload(&self) -> Result<Vec<u8>> {
        if !self.mode.is_known() {
            return Err(BmapError::InvalidEnumValue {
                kind: "action button mode",
                value: self.mode.value(),
            });
        }
        Ok(vec![self.button_id, self.event_type, self.mode.value()])
    }
}

/// Multipoint connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultipointSetting {
    /// Device supports multipoint.
    pub supported: bool,
    /// Multipoint is on.
    pub enabled: bool,
}

impl MultipointSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        Ok(MultipointSetting {
            supported: data[0] & 0b10 != 0,
            enabled: data[0] & 0b01 != 0,
        })
    }

    /// SET_GET payload.
    pub fn encode_payload(&self) -> Vec<u8> {
        vec![u8::from(self.enabled) | (u8::from(self.supported) << 1)]
    }
}

/// Sidetone (own voice in calls).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidetoneSetting {
    /// Setting survives power cycles.
    pub persist: bool,
    /// Current level.
    pub level: SidetoneLevel,
    /// Levels the device supports.
    pub supported: Vec<SidetoneLevel>,
}

impl SidetoneSetting {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 2)?;
        Ok(SidetoneSetting {
            persist: data[0] != 0,
            level: SidetoneLevel::from(data[1]),
            supported: decode_bitmask(&data[2..]),
        })
    }
}

/// Decode the head-motion volume control flag.
pub fn decode_imu_volume_control(data: &[u8]) -> bool {
    data.iter().any(|&b| b != 0)
}

// ============================================================================
// Control
// ============================================================================

/// Locate-me tone state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChirpStatus {
    /// A chirp is playing.
    pub in_progress: bool,
    /// Why the last chirp ended.
    pub stop_reason: ChirpStopReason,
}

impl ChirpStatus {
    /// Decode from a STATUS payload.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        Ok(ChirpStatus {
            in_progress: data[0] & 1 != 0,
            stop_reason: ChirpStopReason::from((data[0] >> 1) & 0b0111_1111),
        })
    }
}

// ============================================================================
// Device Management
// ============================================================================

/// Connected source devices, from LIST_DEVICES.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedDevices {
    /// First connection slot in use.
    pub device1_connected: bool,
    /// Second connection slot in use.
    pub device2_connected: bool,
    /// Addresses of paired devices, in device order.
    pub addresses: Vec<MacAddress>,
}

impl ConnectedDevices {
    /// Decode from a STATUS payload: a flags byte then 6-byte addresses.
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, 1)?;
        let body = &data[1..];
        if body.len() % MAC_ADDRESS_LEN != 0 {
            return Err(BmapError::InvalidData(format!(
                "device list of {} bytes is not a whole number of addresses",
                body.len()
            )));
        }
        let addresses = body
            .chunks_exact(MAC_ADDRESS_LEN)
            .filter_map(MacAddress::from_slice)
            .collect();
        Ok(ConnectedDevices {
            device1_connected: data[0] & 0b01 != 0,
            device2_connected: data[0] & 0b10 != 0,
            addresses,
        })
    }
}

/// Product identity of a paired device that speaks this protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedProduct {
    /// Headphones or speaker.
    pub product_type: ProductType,
    /// Catalog product id.
    pub product_id: u16,
    /// Product variant.
    pub variant: u8,
}

/// One paired device, from DEVICE_INFO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairedDevice {
    /// Device address.
    pub address: MacAddress,
    /// Currently connected.
    pub connected: bool,
    /// This is the device answering the query.
    pub local_device: bool,
    /// The device itself speaks this protocol.
    pub bmap_product: bool,
    /// Identity, present only for protocol-speaking products.
    pub product: Option<PairedProduct>,
    /// Device name.
    pub name: String,
}

impl PairedDevice {
    /// Decode from a STATUS payload.
    ///
    /// ```text
    /// [mac:6][flags:1][product_id:2 BE][variant:1][name...]   protocol products
    /// [mac:6][flags:1][reserved:2][name...]                   everything else
    /// ```
    pub fn decode(data: &[u8]) -> Result<Self> {
        BmapError::require_len(data, MAC_ADDRESS_LEN + 3)?;
        let address = decode_mac_address(data)?;
        let flags = data[6];
        let bmap_product = flags & DEVICE_FLAG_BMAP_PRODUCT != 0;

        let (product, name_start) = if bmap_product {
            BmapError::require_len(data, 10)?;
            let product = PairedProduct {
                product_type: ProductType::from_headphones_bit(flags & 0x80 != 0),
                product_id: u16::from_be_bytes([data[7], data[8]]),
                variant: data[9],
            };
            (Some(product), 10)
        } else {
            (None, 9)
        };

        Ok(PairedDevice {
            address,
            connected: flags & DEVICE_FLAG_CONNECTED != 0,
            local_device: flags & DEVICE_FLAG_LOCAL != 0,
            bmap_product,
            product,
            name: decode_text(&data[name_start..])?,
        })
    }
}
