//! Advertisement events as delivered by the host BLE stack.
//!
//! The short-name check needs the raw advertising-data sections, which each
//! host exposes differently. Each representation is an adapter implementing
//! [`AdvertisingSections`]; [`PlatformData`] says which one the event carries.

use std::collections::BTreeMap;

use bmap_protocol::MacAddress;

use crate::error::{AdvertError, Result};

/// AD type: shortened local name.
pub const AD_TYPE_SHORTENED_LOCAL_NAME: u8 = 0x08;
/// AD type: complete local name.
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;

/// Access to the AD structures of an advertisement.
pub trait AdvertisingSections {
    /// Whether a section of `ad_type` is present.
    fn has_section(&self, ad_type: u8) -> bool;

    /// Only a shortened name was advertised.
    fn is_shortened_name(&self) -> bool {
        self.has_section(AD_TYPE_SHORTENED_LOCAL_NAME)
            && !self.has_section(AD_TYPE_COMPLETE_LOCAL_NAME)
    }
}

/// Sections as a WinRT `BluetoothLEAdvertisement` reports them: an ordered
/// list of (type, data) pairs, repeats allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinRtSections {
    sections: Vec<(u8, Vec<u8>)>,
}

impl WinRtSections {
    /// Create from (type, data) pairs.
    pub fn new(sections: Vec<(u8, Vec<u8>)>) -> Self {
        WinRtSections { sections }
    }

    /// Sections of one type, in advertisement order.
    pub fn sections_by_type(&self, ad_type: u8) -> impl Iterator<Item = &[u8]> {
        self.sections
            .iter()
            .filter(move |(t, _)| *t == ad_type)
            .map(|(_, data)| data.as_slice())
    }
}

impl AdvertisingSections for WinRtSections {
    fn has_section(&self, ad_type: u8) -> bool {
        self.sections_by_type(ad_type).next().is_some()
    }
}

/// BlueZ `AdvertisingData` property: a map from AD type to data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueZAdvertisingData {
    data: BTreeMap<u8, Vec<u8>>,
}

impl BlueZAdvertisingData {
    /// Create from the property map.
    pub fn new(data: BTreeMap<u8, Vec<u8>>) -> Self {
        BlueZAdvertisingData { data }
    }
}

impl AdvertisingSections for BlueZAdvertisingData {
    fn has_section(&self, ad_type: u8) -> bool {
        self.data.contains_key(&ad_type)
    }
}

/// Host-specific advertisement data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformData {
    /// Windows.
    WinRt(WinRtSections),
    /// Linux.
    BlueZ(BlueZAdvertisingData),
    /// Any other host; names are assumed complete.
    #[default]
    Unknown,
}

impl PlatformData {
    /// The sections adapter, if this host exposes one.
    pub fn sections(&self) -> Option<&dyn AdvertisingSections> {
        match self {
            PlatformData::WinRt(sections) => Some(sections),
            PlatformData::BlueZ(data) => Some(data),
            PlatformData::Unknown => None,
        }
    }

    /// Only a shortened name was advertised. False when unknown.
    pub fn is_shortened_name(&self) -> bool {
        self.sections().is_some_and(|s| s.is_shortened_name())
    }
}

/// One received advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementEvent {
    /// Advertiser address.
    pub address: MacAddress,
    /// Name the BLE stack has for the device.
    pub device_name: Option<String>,
    /// Local name carried in the advertisement.
    pub local_name: Option<String>,
    /// Manufacturer-specific data keyed by company id.
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    /// Host-specific data.
    pub platform: PlatformData,
}

impl AdvertisementEvent {
    /// An event with no name, data or platform sections.
    pub fn new(address: MacAddress) -> Self {
        AdvertisementEvent {
            address,
            device_name: None,
            local_name: None,
            manufacturer_data: BTreeMap::new(),
            platform: PlatformData::Unknown,
        }
    }

    /// Set the stack-reported name.
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Set the advertised local name.
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    /// Add a manufacturer-specific entry.
    pub fn with_manufacturer_data(mut self, company_id: u16, data: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_data.insert(company_id, data.into());
        self
    }

    /// Set the platform data.
    pub fn with_platform(mut self, platform: PlatformData) -> Self {
        self.platform = platform;
        self
    }

    /// The single manufacturer-specific entry as one buffer: company id low
    /// byte, company id high byte, then the data.
    pub fn manufacturer_field(&self) -> Result<Vec<u8>> {
        let mut entries = self.manufacturer_data.iter();
        let (company_id, data) = match (entries.next(), self.manufacturer_data.len()) {
            (None, _) => return Err(AdvertError::NoManufacturerData),
            (Some(entry), 1) => entry,
            (Some(_), count) => return Err(AdvertError::AmbiguousManufacturerData { count }),
        };

        let mut field = Vec::with_capacity(2 + data.len());
        field.extend_from_slice(&company_id.to_le_bytes());
        field.extend_from_slice(data);
        Ok(field)
    }
}
