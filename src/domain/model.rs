use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One normalized row of vaccine coverage data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaccineRecord {
    pub country: String,
    pub vaccines_administered: VaccineCount,
}

/// Cumulative dose count for a country, or the `N/A` sentinel when the
/// upstream timeline was absent, empty, or non-numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaccineCount {
    Known(u64),
    NotAvailable,
}

impl Serialize for VaccineCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(count) => serializer.serialize_u64(*count),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

impl fmt::Display for VaccineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(count) => write!(f, "{}", count),
            Self::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Wire shape of one element of the disease.sh coverage response.
///
/// Both fields are best-effort: a record missing either key still produces
/// a `VaccineRecord` rather than failing the whole fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageEntry {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timeline: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<CoverageEntry> for VaccineRecord {
    fn from(entry: CoverageEntry) -> Self {
        // First timeline value in upstream order; relies on serde_json's
        // preserve_order feature, otherwise keys get re-sorted.
        let vaccines_administered = entry
            .timeline
            .as_ref()
            .and_then(|timeline| timeline.values().next())
            .and_then(|value| value.as_u64())
            .map(VaccineCount::Known)
            .unwrap_or(VaccineCount::NotAvailable);

        Self {
            country: entry.country.unwrap_or_default(),
            vaccines_administered,
        }
    }
}

/// A record that survived numeric coercion and is eligible for the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCountry {
    pub country: String,
    pub vaccines_administered: u64,
}

/// Hand-off between the transform and load phases.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<VaccineRecord>,
    pub csv_output: Vec<u8>,
    pub ranked: Vec<RankedCountry>,
}
