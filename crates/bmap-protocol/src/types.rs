//! Common types used in the protocol.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::constants::*;
use crate::error::BmapError;

/// Declares a one-byte wire enumeration.
///
/// Every generated enum has an `Unknown(u8)` variant, so converting from a
/// byte never fails, and a `KNOWN` table listing the named members in
/// declaration order. The table is what the bitmask codec iterates.
#[macro_export]
macro_rules! wire_enum {
    {
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$var_meta:meta])*
                $variant:ident = $value:literal => $text:literal,
            )+
        }
    } => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        pub enum $name {
            $(
                $(#[$var_meta])*
                $variant,
            )+
            /// Value not known to this crate.
            Unknown(u8),
        }

        impl $name {
            /// Named members in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant,)+];

            /// The wire value.
            pub const fn value(self) -> u8 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(value) => value,
                }
            }

            /// Protocol name of the member.
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Unknown(_) => "UNKNOWN",
                }
            }

            /// Whether the value is one of the named members.
            pub const fn is_known(self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                match value {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.value()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $name::Unknown(value) => write!(f, "UNKNOWN(0x{:02X})", value),
                    known => f.write_str(known.name()),
                }
            }
        }

        impl $crate::bitmask::BitFlag for $name {
            fn members() -> &'static [Self] {
                Self::KNOWN
            }

            fn bit(self) -> u8 {
                self.value()
            }
        }
    };
}

wire_enum! {
    /// Operator (request) or status (response) code.
    ///
    /// One vocabulary serves both directions; [`Operator::is_request`] and
    /// [`Operator::is_response`] give the subset legal in each.
    pub enum Operator {
        /// Write without reply payload.
        Set = 0x00 => "SET",
        /// Read.
        Get = 0x01 => "GET",
        /// Write and read back.
        SetGet = 0x02 => "SET_GET",
        /// Terminal value.
        Status = 0x03 => "STATUS",
        /// Terminal error.
        Error = 0x04 => "ERROR",
        /// Start a procedure / open a list.
        Start = 0x05 => "START",
        /// Close a list.
        Final = 0x06 => "FINAL",
        /// Interim frame, skipped.
        Process = 0x07 => "PROCESS",
    }
}

impl Operator {
    /// Legal in a host → device frame.
    pub const fn is_request(self) -> bool {
        matches!(
            self,
            Operator::Set | Operator::Get | Operator::SetGet | Operator::Start
        )
    }

    /// Legal in a device → host frame.
    pub const fn is_response(self) -> bool {
        matches!(
            self,
            Operator::Status | Operator::Error | Operator::Start | Operator::Final | Operator::Process
        )
    }
}

wire_enum! {
    /// Function block (subsystem) id.
    pub enum FunctionBlock {
        /// Product identity and capabilities.
        ProductInfo = 0x00 => "PRODUCT_INFO",
        /// User-facing settings.
        Settings = 0x01 => "SETTINGS",
        /// Battery and runtime status.
        Status = 0x02 => "STATUS",
        /// Firmware update.
        FirmwareUpdate = 0x03 => "FIRMWARE_UPDATE",
        /// Paired/connected source devices.
        DeviceManagement = 0x04 => "DEVICE_MANAGEMENT",
        /// Audio routing and playback.
        AudioManagement = 0x05 => "AUDIO_MANAGEMENT",
        /// Call management (vendor private).
        CallManagement = 0x06 => "CALL_MANAGEMENT",
        /// Device control.
        Control = 0x07 => "CONTROL",
        /// Debug (vendor private).
        Debug = 0x08 => "DEBUG",
        /// Notifications.
        Notifications = 0x09 => "NOTIFICATIONS",
        /// Reserved.
        Reserved1 = 0x0a => "RESERVED_1",
        /// Reserved.
        Reserved2 = 0x0b => "RESERVED_2",
        /// Hearing assistance.
        HearingAssistance = 0x0c => "HEARING_ASSISTANCE",
        /// Data collection.
        DataCollection = 0x0d => "DATA_COLLECTION",
        /// Heart rate.
        HeartRate = 0x0e => "HEART_RATE",
        /// Voice personal assistant.
        VoicePersonalAssistant = 0x10 => "VOICE_PERSONAL_ASSISTANT",
        /// Augmented reality.
        AugmentedReality = 0x15 => "AUGMENTED_REALITY",
    }
}

impl FunctionBlock {
    /// Blocks the vendor marks as private or reserved.
    pub const fn is_private(self) -> bool {
        matches!(
            self,
            FunctionBlock::CallManagement
                | FunctionBlock::Debug
                | FunctionBlock::Reserved1
                | FunctionBlock::Reserved2
        )
    }
}

wire_enum! {
    /// Product category.
    pub enum ProductType {
        /// Headphones.
        Headphones = 1 => "HEADPHONES",
        /// Speaker.
        Speaker = 2 => "SPEAKER",
    }
}

impl ProductType {
    /// Single-bit encoding used by advertisements and device info:
    /// set means headphones, clear means speaker.
    pub const fn from_headphones_bit(set: bool) -> Self {
        if set {
            ProductType::Headphones
        } else {
            ProductType::Speaker
        }
    }
}

wire_enum! {
    /// Active noise reduction level.
    pub enum AnrLevel {
        /// Off.
        Off = 0x00 => "OFF",
        /// High.
        High = 0x01 => "HIGH",
        /// Wind.
        Wind = 0x02 => "WIND",
        /// Low.
        Low = 0x03 => "LOW",
    }
}

wire_enum! {
    /// Sidetone level.
    pub enum SidetoneLevel {
        /// Off.
        Off = 0 => "OFF",
        /// High.
        High = 1 => "HIGH",
        /// Medium.
        Medium = 2 => "MEDIUM",
        /// Low.
        Low = 3 => "LOW",
    }
}

wire_enum! {
    /// Voice prompt language.
    pub enum VoicePromptLanguage {
        /// English (U.K.)
        EnUk = 0x00 => "EN_UK",
        /// English (U.S.)
        EnUs = 0x01 => "EN_US",
        /// French
        Fr = 0x02 => "FR",
        /// Italian
        It = 0x03 => "IT",
        /// German
        De = 0x04 => "DE",
        /// Spanish (E.U.)
        EsEu = 0x05 => "ES_EU",
        /// Spanish (M.X.)
        EsMx = 0x06 => "ES_MX",
        /// Portuguese
        Pt = 0x07 => "PT",
        /// Mandarin
        Zh = 0x08 => "ZH",
        /// Korean
        Ko = 0x09 => "KO",
        /// Russian
        Ru = 0x0a => "RU",
        /// Polish
        Pl = 0x0b => "PL",
        /// Hebrew
        He = 0x0c => "HE",
        /// Turkish
        Tk = 0x0d => "TK",
        /// Dutch
        Nl = 0x0e => "NL",
        /// Japanese
        Ja = 0x0f => "JA",
        /// Cantonese
        Ca = 0x10 => "CA",
        /// Arabic
        Ar = 0x11 => "AR",
        /// Swedish
        Sv = 0x12 => "SV",
        /// Danish
        Da = 0x13 => "DA",
        /// Norwegian
        No = 0x14 => "NO",
        /// Finnish
        Sk = 0x15 => "SK",
    }
}

wire_enum! {
    /// Function bound to the action button.
    pub enum ActionButtonMode {
        /// Nothing bound.
        NotConfigured = 0 => "NOT_CONFIGURED",
        /// Voice assistant.
        VoicePersonalAssistant = 1 => "VOICE_PERSONAL_ASSISTANT",
        /// Cycle noise reduction.
        Anr = 2 => "ANR",
        /// Announce battery level.
        BatteryLevel = 3 => "BATTERY_LEVEL",
        /// Play / pause.
        PlayPause = 4 => "PLAY_PAUSE",
    }
}

wire_enum! {
    /// Why the last chirp stopped.
    pub enum ChirpStopReason {
        /// No chirp was ever started.
        NeverSawChirp = 0 => "NEVER_SAW_CHIRP",
        /// User pressed a button.
        UserPushedButton = 1 => "USER_PUSHED_BUTTON",
        /// Timed out.
        TimedOut = 2 => "TIMED_OUT",
        /// Stopped by the host.
        Stopped = 3 => "STOPPED",
        /// An earbud was removed.
        UserRemovedBud = 4 => "USER_REMOVED_BUD",
    }
}

/// A 6-byte Bluetooth device address.
///
/// Byte order is kept as sent on the wire; the text form is lowercase
/// colon-separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress(pub [u8; MAC_ADDRESS_LEN]);

impl MacAddress {
    /// Create a new address from bytes.
    pub const fn new(bytes: [u8; MAC_ADDRESS_LEN]) -> Self {
        MacAddress(bytes)
    }

    /// Create from a slice. Returns None if slice is wrong length.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; MAC_ADDRESS_LEN] = slice.try_into().ok()?;
        Some(MacAddress(bytes))
    }

    /// Address whose high three bytes are zero and low three bytes are `tail`.
    pub fn from_partial(tail: [u8; 3]) -> Self {
        MacAddress([0, 0, 0, tail[0], tail[1], tail[2]])
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; MAC_ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = BmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; MAC_ADDRESS_LEN];
        let mut parts = s.split(':');

        for byte in bytes.iter_mut() {
            let part = parts
                .next()
                .filter(|p| !p.is_empty() && p.len() <= 2)
                .ok_or_else(|| BmapError::InvalidMacAddress(s.to_string()))?;
            *byte = u8::from_str_radix(part, 16)
                .map_err(|_| BmapError::InvalidMacAddress(s.to_string()))?;
        }

        if parts.next().is_some() {
            return Err(BmapError::InvalidMacAddress(s.to_string()));
        }

        Ok(MacAddress(bytes))
    }
}

impl AsRef<[u8]> for MacAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
