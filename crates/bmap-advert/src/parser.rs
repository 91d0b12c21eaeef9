//! Advertisement dispatcher.
//!
//! A scan callback hands every advertisement to each registered vendor
//! parser in turn. Malformed or foreign advertisements are routine, so
//! [`AdvertParser::parse`] drops them with a debug log instead of failing;
//! [`BmapAdvertParser::try_parse`] keeps the reason for diagnostics.

use bmap_metrics::{metric_defs, MetricLabels};
use log::{debug, trace};

use crate::error::Result;
use crate::event::AdvertisementEvent;
use crate::layouts::decode_field;
use crate::name::resolve_name;
use crate::record::ScannedDevice;

/// A vendor-specific advertisement parser.
pub trait AdvertParser {
    /// Build a discovered-device record, or `None` if this parser does not
    /// recognize the advertisement.
    fn parse(&self, event: &AdvertisementEvent) -> Option<ScannedDevice>;
}

/// Run each parser in order and return the first record produced.
pub fn parse_with(parsers: &[&dyn AdvertParser], event: &AdvertisementEvent) -> Option<ScannedDevice> {
    parsers.iter().find_map(|parser| parser.parse(event))
}

/// Parser for BMAP manufacturer-specific data.
#[derive(Debug, Clone, Default)]
pub struct BmapAdvertParser {
    labels: MetricLabels,
}

impl BmapAdvertParser {
    /// Create a parser with unlabeled metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label this parser's metrics, usually with the scanning adapter.
    pub fn with_labels(mut self, labels: MetricLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Parse an advertisement, reporting why it was rejected.
    pub fn try_parse(&self, event: &AdvertisementEvent) -> Result<ScannedDevice> {
        let field = event.manufacturer_field()?;
        trace!("advert {} mfd {}", event.address, hex::encode(&field));

        let name = resolve_name(event)?;
        let (layout, fields) = decode_field(&field)?;

        Ok(ScannedDevice {
            name,
            address: event.address,
            layout,
            fields,
        })
    }
}

impl AdvertParser for BmapAdvertParser {
    fn parse(&self, event: &AdvertisementEvent) -> Option<ScannedDevice> {
        match self.try_parse(event) {
            Ok(device) => {
                debug!(
                    "advert {} \"{}\" layout={} version={}",
                    device.address,
                    device.name,
                    device.layout,
                    device.bmap_version()
                );
                let labels = self.labels.with(&[("layout", device.layout.name().to_string())]);
                metrics::counter!(metric_defs::ADVERTS_PARSED.name, &labels).increment(1);
                Some(device)
            }
            Err(err) => {
                debug!("advert {} dropped: {}", event.address, err);
                let labels = self.labels.with(&[("reason", err.reason().to_string())]);
                metrics::counter!(metric_defs::ADVERTS_DROPPED.name, &labels).increment(1);
                None
            }
        }
    }
}
