//! Metrics infrastructure for the BMAP crates.
//!
//! This crate declares every metric emitted by `bmap-protocol` and `bmap-advert`
//! as a structured [`Metric`] constant, so names, units and label keys live in
//! one place. It re-exports the `metrics` crate for convenience; without an
//! installed recorder every emission is a no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use bmap_metrics::{describe_metrics, metric_defs, MetricLabels};
//!
//! // Initialize metrics descriptions at startup
//! describe_metrics();
//!
//! // Labels for one connection
//! let labels = MetricLabels::new("60:ab:d2:b0:bd:47");
//!
//! metrics::counter!(metric_defs::FRAMES_TX.name, &labels.to_labels()).increment(1);
//! ```
//!
//! # Metric Type
//!
//! ```rust
//! use bmap_metrics::{Metric, MetricKind};
//! use metrics::Unit;
//!
//! const MY_COUNTER: Metric = Metric::counter("my.counter")
//!     .with_description("A counter metric")
//!     .with_unit(Unit::Count)
//!     .with_labels(&["device", "operator"]);
//!
//! assert_eq!(MY_COUNTER.kind, MetricKind::Counter);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_histogram, Unit};

/// The kind of metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// Use the const constructors to declare metrics at compile time.
///
/// ```rust
/// use bmap_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const FRAMES: Metric = Metric::counter("bmap.frames.tx")
///     .with_description("Frames written")
///     .with_unit(Unit::Count)
///     .with_labels(&["device", "function_block"]);
///
/// assert_eq!(FRAMES.name, "bmap.frames.tx");
/// assert_eq!(FRAMES.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "bmap.frames.tx").
    pub name: &'static str,
    /// Counter or histogram.
    pub kind: MetricKind,
    /// Human-readable description of the metric.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys for this metric.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Counter,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Histogram,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys for the metric.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the metrics recorder.
    ///
    /// This should be called once at startup for each metric.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }
}

/// All metric definitions for the BMAP crates.
pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Command Channel Metrics
    // ========================================================================

    /// Command frames written to the transport.
    ///
    /// Labels: device, function_block, operator
    pub const FRAMES_TX: Metric = Metric::counter("bmap.frames.tx")
        .with_description("Command frames written to the transport")
        .with_unit(Unit::Count)
        .with_labels(&["device", "function_block", "operator"]);

    /// Response frames read from the transport, including PROCESS and list brackets.
    ///
    /// Labels: device, function_block, operator
    pub const FRAMES_RX: Metric = Metric::counter("bmap.frames.rx")
        .with_description("Response frames read from the transport")
        .with_unit(Unit::Count)
        .with_labels(&["device", "function_block", "operator"]);

    /// Payload size of received frames in bytes.
    ///
    /// Labels: device
    pub const FRAME_PAYLOAD_SIZE: Metric = Metric::histogram("bmap.frames.payload_bytes")
        .with_description("Payload size of received frames in bytes")
        .with_unit(Unit::Bytes)
        .with_labels(&["device"]);

    /// ERROR responses reported by the device.
    ///
    /// Labels: device, error_code
    pub const DEVICE_ERRORS: Metric = Metric::counter("bmap.responses.device_errors")
        .with_description("ERROR responses reported by the device")
        .with_unit(Unit::Count)
        .with_labels(&["device", "error_code"]);

    /// Responses rejected because the frame sequence was not understood.
    ///
    /// Labels: device, kind
    pub const PROTOCOL_ERRORS: Metric = Metric::counter("bmap.responses.protocol_errors")
        .with_description("Responses rejected because the frame sequence was not understood")
        .with_unit(Unit::Count)
        .with_labels(&["device", "kind"]);

    /// Number of elements collected into a list response.
    ///
    /// Labels: device
    pub const LIST_LENGTH: Metric = Metric::histogram("bmap.responses.list_len")
        .with_description("Number of elements collected into a list response")
        .with_unit(Unit::Count)
        .with_labels(&["device"]);

    // ========================================================================
    // Advertisement Metrics
    // ========================================================================

    /// Advertisements decoded into a discovered-device record.
    ///
    /// Labels: layout
    pub const ADVERTS_PARSED: Metric = Metric::counter("bmap.adverts.parsed")
        .with_description("Advertisements decoded into a discovered-device record")
        .with_unit(Unit::Count)
        .with_labels(&["layout"]);

    /// Advertisements ignored by the parser.
    ///
    /// Labels: reason
    pub const ADVERTS_DROPPED: Metric = Metric::counter("bmap.adverts.dropped")
        .with_description("Advertisements ignored by the parser")
        .with_unit(Unit::Count)
        .with_labels(&["reason"]);

    /// Returns a slice of all defined metrics.
    pub const ALL: &[&Metric] = &[
        &FRAMES_TX,
        &FRAMES_RX,
        &FRAME_PAYLOAD_SIZE,
        &DEVICE_ERRORS,
        &PROTOCOL_ERRORS,
        &LIST_LENGTH,
        &ADVERTS_PARSED,
        &ADVERTS_DROPPED,
    ];
}

/// Metric labels identifying one device connection.
///
/// ```rust
/// use bmap_metrics::MetricLabels;
///
/// let labels = MetricLabels::new("60:ab:d2:b0:bd:47")
///     .with_groups(vec!["headphones".to_string()]);
///
/// assert_eq!(labels.to_labels().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricLabels {
    /// Device identifier, usually its MAC address.
    pub device: String,
    /// Custom grouping tags
    pub groups: Vec<String>,
}

impl MetricLabels {
    /// Creates labels for the given device.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            groups: Vec::new(),
        }
    }

    /// Adds custom grouping tags to the labels.
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Converts the labels to the metrics crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        let mut labels = vec![("device", self.device.clone())];

        if !self.groups.is_empty() {
            labels.push(("groups", self.groups.join(",")));
        }

        labels
    }

    /// Returns labels with additional key-value pairs.
    ///
    /// ```rust
    /// use bmap_metrics::MetricLabels;
    ///
    /// let labels = MetricLabels::new("60:ab:d2:b0:bd:47");
    /// let extended = labels.with(&[("operator", "GET".to_string())]);
    ///
    /// assert!(extended.iter().any(|(k, v)| *k == "operator" && v == "GET"));
    /// ```
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Describes all BMAP metrics.
///
/// Call once at startup, after installing a recorder, so exporters can show
/// descriptions and units.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
