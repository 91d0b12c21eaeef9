//! Protocol constants
//!
//! Frame layout and per-block function ids. Operator and function block
//! values are declared once, on [`Operator`](crate::Operator) and
//! [`FunctionBlock`](crate::FunctionBlock).
//! Function ids are only meaningful inside their function block, so each
//! block gets its own module instead of one flat list.

// ============================================================================
// Frame Layout
// ============================================================================

/// Header size: function block, function, operator, payload length.
pub const HEADER_LEN: usize = 4;
/// The length field is a single byte.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

// ============================================================================
// Functions
// ============================================================================

/// Function id present in every block: returns the block's version.
pub const FUNCTION_BLOCK_INFO: u8 = 0x00;

/// Functions of the product info block.
pub mod product_info {
    /// Protocol version string.
    pub const BMAP_VERSION: u8 = 0x01;
    /// Bitmask of supported function blocks; with START, a list of block versions.
    pub const ALL_FUNCTION_BLOCKS: u8 = 0x02;
    /// Product id and variant.
    pub const PRODUCT_ID_VARIANT: u8 = 0x03;
    /// All product info functions as a keyed list.
    pub const ALL_FUNCTIONS: u8 = 0x04;
    /// Firmware version string.
    pub const FIRMWARE_VERSION: u8 = 0x05;
    /// Device MAC address.
    pub const MAC_ADDRESS: u8 = 0x06;
    /// Serial number string.
    pub const SERIAL_NUMBER: u8 = 0x07;
    /// Hardware revision string.
    pub const HARDWARE_REVISION: u8 = 0x0a;
    /// Component devices.
    pub const COMPONENT_DEVICES: u8 = 0x0b;
}

/// Functions of the settings block.
pub mod settings {
    /// All settings as a keyed list.
    pub const ALL_SETTINGS: u8 = 0x01;
    /// Device name.
    pub const DEVICE_NAME: u8 = 0x02;
    /// Voice prompt configuration.
    pub const VOICE_PROMPTS: u8 = 0x03;
    /// Auto-off timer in minutes.
    pub const STANDBY_TIMER: u8 = 0x04;
    /// Controllable noise cancellation steps.
    pub const CNC: u8 = 0x05;
    /// Active noise reduction level.
    pub const ANR: u8 = 0x06;
    /// Bass step.
    pub const BASS_CONTROL: u8 = 0x07;
    /// Ringtone and haptic alerts.
    pub const ALERTS: u8 = 0x08;
    /// Action button configuration.
    pub const BUTTONS: u8 = 0x09;
    /// Multipoint connection.
    pub const MULTIPOINT: u8 = 0x0a;
    /// Sidetone level.
    pub const SIDETONE: u8 = 0x0b;
    /// Head-motion volume control.
    pub const IMU_VOLUME_CONTROL: u8 = 0x17;
}

/// Functions of the device management block.
pub mod device_management {
    /// Connect a source device.
    pub const CONNECT_DEVICE: u8 = 0x01;
    /// Disconnect a source device.
    pub const DISCONNECT_DEVICE: u8 = 0x02;
    /// Remove a device from the pairing list.
    pub const REMOVE_DEVICE: u8 = 0x03;
    /// Connected devices and their addresses.
    pub const LIST_DEVICES: u8 = 0x04;
    /// Information about one paired device.
    pub const DEVICE_INFO: u8 = 0x05;
    /// Extended information about one paired device.
    pub const DEVICE_INFO_EXT: u8 = 0x06;
    /// Clear the pairing list.
    pub const CLEAR_DEVICE_LIST: u8 = 0x07;
    /// Pairing mode.
    pub const PAIRING_MODE: u8 = 0x08;
    /// Local MAC address.
    pub const LOCAL_MAC_ADDRESS: u8 = 0x09;
    /// Prepare peer-to-peer mode.
    pub const P2P_PREPARE: u8 = 0x0a;
    /// Peer-to-peer mode.
    pub const P2P_MODE: u8 = 0x0b;
    /// Peer-to-peer routing.
    pub const P2P_ROUTING: u8 = 0x0c;
}

/// Functions of the control block.
pub mod control {
    /// All controls as a keyed list.
    pub const ALL_CONTROLS: u8 = 0x01;
    /// Locate-me tone.
    pub const CHIRP: u8 = 0x02;
}

// ============================================================================
// Payload Field Layouts
// ============================================================================

/// MAC address size in bytes.
pub const MAC_ADDRESS_LEN: usize = 6;

/// Voice prompt byte: the setting may be changed.
pub const VOICE_PROMPT_CAN_CHANGE: u8 = 0b1000_0000;
/// Voice prompt byte: prompts are enabled.
pub const VOICE_PROMPT_ENABLED: u8 = 0b0010_0000;
/// Voice prompt byte: language mask.
pub const VOICE_PROMPT_LANGUAGE: u8 = 0b0001_1111;

/// Button id reported when the button cannot be configured.
pub const DEFAULT_BUTTON_ID: u8 = 16;
/// Button event type reported when the button cannot be configured.
pub const DEFAULT_BUTTON_EVENT_TYPE: u8 = 4;

/// Device info flags: the device is connected.
pub const DEVICE_FLAG_CONNECTED: u8 = 0b0000_0001;
/// Device info flags: the device is the local device.
pub const DEVICE_FLAG_LOCAL: u8 = 0b0000_0010;
/// Device info flags: the device is a product speaking this protocol.
pub const DEVICE_FLAG_BMAP_PRODUCT: u8 = 0b0000_0100;

/// Connect-device flags: keep the named device connected.
pub const CONNECT_FLAG_KEEP_DEVICE: u8 = 0b0001_0000;

// ============================================================================
// Decoder Defaults
// ============================================================================

/// Default maximum number of elements in one list response.
pub const DEFAULT_MAX_LIST_LEN: usize = 256;
/// Default maximum nesting depth of list responses.
pub const DEFAULT_MAX_DEPTH: usize = 8;
/// Default maximum number of PROCESS frames skipped in one response.
pub const DEFAULT_MAX_PROCESS_FRAMES: usize = 64;
