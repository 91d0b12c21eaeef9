//! Device name resolution.

use crate::error::{AdvertError, Result};
use crate::event::AdvertisementEvent;

/// Prefix some firmware puts on the low-energy name.
pub const LE_PREFIX: &str = "LE-";

/// Appended when the platform reports a shortened local name.
pub const ELLIPSIS: char = '…';

/// Pick the display name for an advertisement.
///
/// The platform device name wins over the advertised local name. A leading
/// `LE-` is removed, and a shortened name gets a trailing ellipsis.
pub fn resolve_name(event: &AdvertisementEvent) -> Result<String> {
    let raw = event
        .device_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| event.local_name.as_deref().filter(|name| !name.is_empty()))
        .ok_or(AdvertError::MissingName)?;

    let mut name = raw.strip_prefix(LE_PREFIX).unwrap_or(raw).to_string();
    if event.platform.is_shortened_name() {
        name.push(ELLIPSIS);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PlatformData, WinRtSections};
    use bmap_protocol::MacAddress;

    fn event() -> AdvertisementEvent {
        AdvertisementEvent::new(MacAddress::new([1, 2, 3, 4, 5, 6]))
    }

    #[test]
    fn test_prefers_device_name() {
        let event = event().with_device_name("Bose QC35").with_local_name("LE-Other");
        assert_eq!(resolve_name(&event).unwrap(), "Bose QC35");
    }

    #[test]
    fn test_strips_le_prefix() {
        let event = event().with_local_name("LE-Bose NC 700");
        assert_eq!(resolve_name(&event).unwrap(), "Bose NC 700");
        // Only a leading prefix.
        let event = self::event().with_local_name("Bose LE-700");
        assert_eq!(resolve_name(&event).unwrap(), "Bose LE-700");
    }

    #[test]
    fn test_missing() {
        assert_eq!(resolve_name(&event()), Err(AdvertError::MissingName));
        assert_eq!(resolve_name(&event().with_local_name("")), Err(AdvertError::MissingName));
    }

    #[test]
    fn test_shortened_gets_ellipsis() {
        let shortened = PlatformData::WinRt(WinRtSections::new(vec![(0x08, b"Bose".to_vec())]));
        let event = event().with_local_name("LE-Bose").with_platform(shortened);
        assert_eq!(resolve_name(&event).unwrap(), "Bose…");

        let complete = PlatformData::WinRt(WinRtSections::new(vec![
            (0x08, b"Bose".to_vec()),
            (0x09, b"Bose QC".to_vec()),
        ]));
        let event = self::event().with_local_name("Bose QC").with_platform(complete);
        assert_eq!(resolve_name(&event).unwrap(), "Bose QC");
    }
}
