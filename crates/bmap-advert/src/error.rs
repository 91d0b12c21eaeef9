//! Error types for bmap-advert.

use thiserror::Error;

/// Why an advertisement did not produce a discovered-device record.
///
/// None of these are fatal: the scan keeps going and the event is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvertError {
    /// The advertisement carries no manufacturer-specific data.
    #[error("no manufacturer-specific data")]
    NoManufacturerData,

    /// More than one manufacturer-specific entry; the vendor field is ambiguous.
    #[error("ambiguous manufacturer-specific data: {count} entries")]
    AmbiguousManufacturerData {
        /// Number of entries present.
        count: usize,
    },

    /// Neither a device name nor an advertised local name.
    #[error("advertisement has no usable name")]
    MissingName,

    /// The tag byte selects no known layout.
    #[error("unknown layout tag: 0x{0:02X}")]
    UnknownTag(u8),

    /// The tag byte is not one the selected layout accepts.
    #[error("{layout}: invalid tag 0x{tag:02X}")]
    InvalidTag {
        /// Layout name.
        layout: &'static str,
        /// Offending tag byte.
        tag: u8,
    },

    /// Shorter than the layout's fixed header.
    #[error("{layout}: too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Layout name.
        layout: &'static str,
        /// Minimum length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Length disagrees with the peer-address fields the header announces.
    #[error("{layout}: length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Layout name.
        layout: &'static str,
        /// Length computed from the header.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The layout is recognised but cannot be decoded yet.
    #[error("{0}: layout not supported")]
    UnsupportedLayout(&'static str),
}

impl AdvertError {
    /// Stable drop reason for logging and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AdvertError::NoManufacturerData => "no_manufacturer_data",
            AdvertError::AmbiguousManufacturerData { .. } => "ambiguous_manufacturer_data",
            AdvertError::MissingName => "missing_name",
            AdvertError::UnknownTag(_) => "unknown_tag",
            AdvertError::InvalidTag { .. } => "invalid_tag",
            AdvertError::TooShort { .. } => "too_short",
            AdvertError::LengthMismatch { .. } => "length_mismatch",
            AdvertError::UnsupportedLayout(_) => "unsupported_layout",
        }
    }
}

/// Result type for advertisement decoding.
pub type Result<T> = std::result::Result<T, AdvertError>;
