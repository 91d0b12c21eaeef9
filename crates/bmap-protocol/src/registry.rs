//! Function registry.
//!
//! Function ids are only unique within their function block, so the registry
//! is a two-level map: block, then function id, then the decoder for that
//! function's STATUS payload. It is built on first use and never changes.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::bitmask::decode_bitmask;
use crate::constants::{control, device_management, product_info, settings, FUNCTION_BLOCK_INFO};
use crate::error::{BmapError, Result};
use crate::responses::*;
use crate::types::FunctionBlock;

/// Decodes one STATUS payload.
pub type PayloadDecoder = fn(&[u8]) -> Result<FunctionValue>;

/// A registered function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionEntry {
    /// Protocol name of the function.
    pub name: &'static str,
    /// Payload decoder.
    pub decode: PayloadDecoder,
}

const PRODUCT_INFO_FUNCTIONS: &[(u8, FunctionEntry)] = &[
    (FUNCTION_BLOCK_INFO, entry("FUNCTION_BLOCK_INFO", text)),
    (product_info::BMAP_VERSION, entry("BMAP_VERSION", text)),
    (product_info::ALL_FUNCTION_BLOCKS, entry("ALL_FUNCTION_BLOCKS", function_blocks)),
    (product_info::PRODUCT_ID_VARIANT, entry("PRODUCT_ID_VARIANT", product_id_variant)),
    (product_info::FIRMWARE_VERSION, entry("FIRMWARE_VERSION", text)),
    (product_info::MAC_ADDRESS, entry("MAC_ADDRESS", mac_address)),
    (product_info::SERIAL_NUMBER, entry("SERIAL_NUMBER", text)),
    (product_info::HARDWARE_REVISION, entry("HARDWARE_REVISION", text)),
    (product_info::COMPONENT_DEVICES, entry("COMPONENT_DEVICES", text)),
];

const SETTINGS_FUNCTIONS: &[(u8, FunctionEntry)] = &[
    (FUNCTION_BLOCK_INFO, entry("FUNCTION_BLOCK_INFO", text)),
    (settings::DEVICE_NAME, entry("DEVICE_NAME", device_name)),
    (settings::VOICE_PROMPTS, entry("VOICE_PROMPTS", |d| {
        Ok(FunctionValue::VoicePrompts(VoicePromptSetting::decode(d)?))
    })),
    (settings::STANDBY_TIMER, entry("STANDBY_TIMER", standby_timer)),
    (settings::CNC, entry("CNC", |d| Ok(FunctionValue::Cnc(CncSetting::decode(d)?)))),
    (settings::ANR, entry("ANR", |d| Ok(FunctionValue::Anr(AnrSetting::decode(d)?)))),
    (settings::BASS_CONTROL, entry("BASS_CONTROL", |d| {
        Ok(FunctionValue::BassControl(BassControl::decode(d)?))
    })),
    (settings::ALERTS, entry("ALERTS", |d| Ok(FunctionValue::Alerts(AlertSetting::decode(d)?)))),
    (settings::BUTTONS, entry("BUTTONS", |d| {
        Ok(FunctionValue::Buttons(ActionButtonSetting::decode(d)?))
    })),
    (settings::MULTIPOINT, entry("MULTIPOINT", |d| {
        Ok(FunctionValue::Multipoint(MultipointSetting::decode(d)?))
    })),
    (settings::SIDETONE, entry("SIDETONE", |d| {
        Ok(FunctionValue::Sidetone(SidetoneSetting::decode(d)?))
    })),
    (settings::IMU_VOLUME_CONTROL, entry("IMU_VOLUME_CONTROL", |d| {
        Ok(FunctionValue::ImuVolumeControl(decode_imu_volume_control(d)))
    })),
];

const DEVICE_MANAGEMENT_FUNCTIONS: &[(u8, FunctionEntry)] = &[
    (FUNCTION_BLOCK_INFO, entry("FUNCTION_BLOCK_INFO", text)),
    (device_management::LIST_DEVICES, entry("LIST_DEVICES", |d| {
        Ok(FunctionValue::ConnectedDevices(ConnectedDevices::decode(d)?))
    })),
    (device_management::DEVICE_INFO, entry("DEVICE_INFO", |d| {
        Ok(FunctionValue::PairedDevice(PairedDevice::decode(d)?))
    })),
];

const CONTROL_FUNCTIONS: &[(u8, FunctionEntry)] = &[
    (FUNCTION_BLOCK_INFO, entry("FUNCTION_BLOCK_INFO", text)),
    (control::CHIRP, entry("CHIRP", |d| Ok(FunctionValue::Chirp(ChirpStatus::decode(d)?)))),
];

const fn entry(name: &'static str, decode: PayloadDecoder) -> FunctionEntry {
    FunctionEntry { name, decode }
}

fn text(data: &[u8]) -> Result<FunctionValue> {
    Ok(FunctionValue::Text(decode_text(data)?))
}

fn mac_address(data: &[u8]) -> Result<FunctionValue> {
    Ok(FunctionValue::MacAddress(decode_mac_address(data)?))
}

fn function_blocks(data: &[u8]) -> Result<FunctionValue> {
    Ok(FunctionValue::FunctionBlocks(decode_bitmask(data)))
}

fn product_id_variant(data: &[u8]) -> Result<FunctionValue> {
    if data.len() < 3 {
        return Ok(FunctionValue::Raw(data.to_vec()));
    }
    Ok(FunctionValue::ProductIdVariant(ProductIdVariant::decode(data)?))
}

// First byte is not part of the name.
fn device_name(data: &[u8]) -> Result<FunctionValue> {
    BmapError::require_len(data, 1)?;
    Ok(FunctionValue::Text(decode_text(&data[1..])?))
}

fn standby_timer(data: &[u8]) -> Result<FunctionValue> {
    BmapError::require_len(data, 1)?;
    Ok(FunctionValue::StandbyTimer(data[0]))
}

/// Read-only (block, function) → decoder mapping.
#[derive(Debug)]
pub struct FunctionRegistry {
    blocks: HashMap<FunctionBlock, HashMap<u8, FunctionEntry>>,
}

static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

impl FunctionRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static FunctionRegistry {
        REGISTRY.get_or_init(FunctionRegistry::build)
    }

    fn build() -> Self {
        let tables: [(FunctionBlock, &[(u8, FunctionEntry)]); 4] = [
            (FunctionBlock::ProductInfo, PRODUCT_INFO_FUNCTIONS),
            (FunctionBlock::Settings, SETTINGS_FUNCTIONS),
            (FunctionBlock::DeviceManagement, DEVICE_MANAGEMENT_FUNCTIONS),
            (FunctionBlock::Control, CONTROL_FUNCTIONS),
        ];
        let blocks = tables
            .into_iter()
            .map(|(block, functions)| (block, functions.iter().copied().collect()))
            .collect();
        FunctionRegistry { blocks }
    }

    /// Look up a function.
    pub fn get(&self, block: FunctionBlock, function: u8) -> Option<&FunctionEntry> {
        self.blocks.get(&block)?.get(&function)
    }

    /// Look up a function, treating a miss as a defect.
    pub fn lookup(&self, block: FunctionBlock, function: u8) -> Result<&FunctionEntry> {
        self.get(block, function)
            .ok_or_else(|| BmapError::UnregisteredFunction {
                block: block.to_string(),
                function,
            })
    }

    /// Decode a STATUS payload with the registered decoder.
    pub fn decode(&self, block: FunctionBlock, function: u8, payload: &[u8]) -> Result<FunctionValue> {
        let entry = self.lookup(block, function)?;
        (entry.decode)(payload)
    }

    /// Registered function ids for a block, ascending.
    pub fn functions(&self, block: FunctionBlock) -> Vec<u8> {
        let mut ids: Vec<u8> = self
            .blocks
            .get(&block)
            .map(|functions| functions.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnrLevel, MacAddress};

    #[test]
    fn test_same_id_differs_by_block() {
        let registry = FunctionRegistry::global();
        // 0x02 is ALL_FUNCTION_BLOCKS in product info, DEVICE_NAME in settings, CHIRP in control.
        assert_eq!(registry.lookup(FunctionBlock::ProductInfo, 0x02).unwrap().name, "ALL_FUNCTION_BLOCKS");
        assert_eq!(registry.lookup(FunctionBlock::Settings, 0x02).unwrap().name, "DEVICE_NAME");
        assert_eq!(registry.lookup(FunctionBlock::Control, 0x02).unwrap().name, "CHIRP");
    }

    #[test]
    fn test_miss_is_defect() {
        let err = FunctionRegistry::global()
            .decode(FunctionBlock::Settings, 0x30, &[])
            .unwrap_err();
        assert!(err.is_defect());
        assert!(err.to_string().contains("SETTINGS"));

        let err = FunctionRegistry::global()
            .decode(FunctionBlock::HeartRate, FUNCTION_BLOCK_INFO, &[])
            .unwrap_err();
        assert!(err.is_defect());
    }

    #[test]
    fn test_decoders() {
        let registry = FunctionRegistry::global();
        assert_eq!(
            registry.decode(FunctionBlock::ProductInfo, product_info::MAC_ADDRESS, &[1, 2, 3, 4, 5, 6]).unwrap(),
            FunctionValue::MacAddress(MacAddress::new([1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(
            registry.decode(FunctionBlock::Settings, settings::DEVICE_NAME, b"\x00Bose QC").unwrap(),
            FunctionValue::Text("Bose QC".to_string())
        );
        assert_eq!(
            registry.decode(FunctionBlock::Settings, settings::STANDBY_TIMER, &[20]).unwrap(),
            FunctionValue::StandbyTimer(20)
        );
        assert_eq!(
            registry.decode(FunctionBlock::ProductInfo, product_info::ALL_FUNCTION_BLOCKS, &[0x00, 0x83]).unwrap(),
            FunctionValue::FunctionBlocks(vec![
                FunctionBlock::ProductInfo,
                FunctionBlock::Settings,
                FunctionBlock::Control,
            ])
        );
        match registry.decode(FunctionBlock::Settings, settings::ANR, &[0x01, 0x03]).unwrap() {
            FunctionValue::Anr(anr) => assert_eq!(anr.level, AnrLevel::High),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_product_id_variant_short_is_raw() {
        let registry = FunctionRegistry::global();
        assert_eq!(
            registry.decode(FunctionBlock::ProductInfo, product_info::PRODUCT_ID_VARIANT, &[0x40]).unwrap(),
            FunctionValue::Raw(vec![0x40])
        );
        assert!(matches!(
            registry.decode(FunctionBlock::ProductInfo, product_info::PRODUCT_ID_VARIANT, &[0x40, 0x24, 0x01]).unwrap(),
            FunctionValue::ProductIdVariant(ProductIdVariant { product_id: 0x4024, variant: 1 })
        ));
    }

    #[test]
    fn test_functions_listing() {
        let ids = FunctionRegistry::global().functions(FunctionBlock::Control);
        assert_eq!(ids, vec![FUNCTION_BLOCK_INFO, control::CHIRP]);
        assert!(FunctionRegistry::global().functions(FunctionBlock::Debug).is_empty());
    }
}
