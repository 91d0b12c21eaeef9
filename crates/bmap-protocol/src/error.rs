//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when talking to a device over the command channel.
#[derive(Error, Debug)]
pub enum BmapError {
    // ===== Transport Errors =====
    /// I/O error from the underlying byte stream.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a frame field was complete.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the frame declared.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },

    // ===== Device Errors =====
    /// The device answered with an ERROR status.
    #[error("device error: code {code}")]
    DeviceError {
        /// Error code byte, as sent by the device.
        code: u8,
    },

    // ===== Protocol State Errors =====
    /// Status byte outside the operator vocabulary.
    #[error("illegal status byte: 0x{0:02X}")]
    IllegalStatus(u8),

    /// A FINAL frame arrived while no list was open.
    #[error("FINAL status outside of a list response")]
    UnexpectedFinal,

    /// A list response exceeded the configured element bound.
    #[error("list response too long: more than {max} elements")]
    ListTooLong {
        /// Configured maximum.
        max: usize,
    },

    /// List responses nested deeper than the configured bound.
    #[error("list responses nested deeper than {max}")]
    NestingTooDeep {
        /// Configured maximum.
        max: usize,
    },

    /// More PROCESS frames than the configured bound in one response.
    #[error("more than {max} PROCESS frames in one response")]
    TooManyProcessFrames {
        /// Configured maximum.
        max: usize,
    },

    /// A scalar was requested but the device sent a list, or the other way round.
    #[error("unexpected response shape: expected {expected}")]
    UnexpectedShape {
        /// What the caller asked for.
        expected: &'static str,
    },

    // ===== Registry Errors =====
    /// No decoder registered for this function.
    #[error("no decoder registered for function 0x{function:02X} in block {block}")]
    UnregisteredFunction {
        /// Function block name.
        block: String,
        /// Function id.
        function: u8,
    },

    // ===== Encoding / Payload Errors =====
    /// Payload does not fit in the one-byte length field.
    #[error("payload too long: maximum {max} bytes, got {actual}")]
    PayloadTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// Payload is shorter than its layout requires.
    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    PayloadTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Invalid data in a payload.
    #[error("invalid payload data: {0}")]
    InvalidData(String),

    /// UTF-8 decoding error.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An enumeration value outside the named members where one is required.
    #[error("invalid {kind} value: 0x{value:02X}")]
    InvalidEnumValue {
        /// Enumeration name.
        kind: &'static str,
        /// Offending value.
        value: u8,
    },

    /// MAC address text could not be parsed.
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// Configuration rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BmapError {
    /// Stream-level failure: short read or I/O error.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, BmapError::Io(_) | BmapError::ShortRead { .. })
    }

    /// The device rejected the request.
    pub fn is_device_error(&self) -> bool {
        matches!(self, BmapError::DeviceError { .. })
    }

    /// The frame sequence did not follow the protocol.
    pub fn is_protocol_state_error(&self) -> bool {
        matches!(
            self,
            BmapError::IllegalStatus(_)
                | BmapError::UnexpectedFinal
                | BmapError::ListTooLong { .. }
                | BmapError::NestingTooDeep { .. }
                | BmapError::TooManyProcessFrames { .. }
                | BmapError::UnexpectedShape { .. }
        )
    }

    /// The registry and the device's protocol version disagree.
    pub fn is_defect(&self) -> bool {
        matches!(self, BmapError::UnregisteredFunction { .. })
    }

    /// The error code carried by an ERROR response.
    pub fn device_error_code(&self) -> Option<u8> {
        match self {
            BmapError::DeviceError { code } => Some(*code),
            _ => None,
        }
    }

    /// Stable code for logging and metric labels.
    pub fn error_code(&self) -> &'static str {
        match self {
            BmapError::Io(_) => "IO_ERROR",
            BmapError::ShortRead { .. } => "SHORT_READ",
            BmapError::DeviceError { .. } => "DEVICE_ERROR",
            BmapError::IllegalStatus(_) => "ILLEGAL_STATUS",
            BmapError::UnexpectedFinal => "UNEXPECTED_FINAL",
            BmapError::ListTooLong { .. } => "LIST_TOO_LONG",
            BmapError::NestingTooDeep { .. } => "NESTING_TOO_DEEP",
            BmapError::TooManyProcessFrames { .. } => "TOO_MANY_PROCESS_FRAMES",
            BmapError::UnexpectedShape { .. } => "UNEXPECTED_SHAPE",
            BmapError::UnregisteredFunction { .. } => "UNREGISTERED_FUNCTION",
            BmapError::PayloadTooLong { .. } => "PAYLOAD_TOO_LONG",
            BmapError::PayloadTooShort { .. } => "PAYLOAD_TOO_SHORT",
            BmapError::InvalidData(_) => "INVALID_DATA",
            BmapError::InvalidUtf8(_) => "INVALID_UTF8",
            BmapError::InvalidEnumValue { .. } => "INVALID_ENUM_VALUE",
            BmapError::InvalidMacAddress(_) => "INVALID_MAC_ADDRESS",
            BmapError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }

    /// Payload length check shared by the payload decoders.
    pub(crate) fn require_len(data: &[u8], expected: usize) -> Result<()> {
        if data.len() < expected {
            return Err(BmapError::PayloadTooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

/// Result type alias for command channel operations.
pub type Result<T> = std::result::Result<T, BmapError>;
