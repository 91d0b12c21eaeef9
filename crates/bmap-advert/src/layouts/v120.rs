//! Protocol 1.2.0 layout.

use crate::error::{AdvertError, Result};
use crate::record::{AdvertLayout, LayoutFields};

/// Recognized by tag only; the field map is not known yet.
// TODO: decode fields once a 1.2.0 capture with a known product is available.
pub fn decode_v120(_data: &[u8]) -> Result<LayoutFields> {
    Err(AdvertError::UnsupportedLayout(AdvertLayout::V1_2_0.name()))
}
