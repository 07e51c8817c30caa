//! Metrics Document
//!
//! Typed schema of the JSON metrics document consumed by the dashboard.
//! JSON keys keep the producer's names; Rust fields are renamed.
//!
//! The document is replaced wholesale on every load, so there is no merge
//! or partial update logic here: parse, validate, hand over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default document path, relative to the dashboard page
pub const DEFAULT_DOCUMENT: &str = "dados_oraculares.json";

/// Errors raised while turning text into a [`MetricsDocument`]
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Not JSON, or JSON missing/mistyping an expected field
    #[error("Malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parallel series arrays disagree on length
    #[error("Series length mismatch: datas={dates}, cliques={clicks}, impressoes={impressions}, ctr_pct={ctr}")]
    SeriesLength {
        dates: usize,
        clicks: usize,
        impressions: usize,
        ctr: usize,
    },
}

/// Full metrics document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    pub meta: Meta,
    pub kpis: Kpis,
    pub series: Series,
    #[serde(rename = "dispositivos")]
    pub devices: Devices,
    #[serde(rename = "paises")]
    pub countries: Vec<Country>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Free-form source description, absent in hand-written documents
    #[serde(rename = "fonte", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "ultima_atualizacao")]
    pub last_update: String,
    #[serde(rename = "periodo")]
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fim")]
    pub end: String,
}

/// Headline counters, percentages and period-over-period deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    #[serde(rename = "impressoes_30d")]
    pub impressions: u64,
    #[serde(rename = "cliques_30d")]
    pub clicks: u64,
    #[serde(rename = "ctr_medio_pct")]
    pub ctr_pct: f64,
    #[serde(rename = "posicao_media")]
    pub avg_position: f64,
    #[serde(rename = "delta_impressoes_pct")]
    pub delta_impressions_pct: f64,
    #[serde(rename = "delta_cliques_pct")]
    pub delta_clicks_pct: f64,
    #[serde(rename = "delta_ctr_pp")]
    pub delta_ctr_pp: f64,
    #[serde(rename = "delta_posicao_pp")]
    pub delta_position_pp: f64,
}

/// Parallel daily series; index `i` of every vector is one time bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(rename = "datas")]
    pub dates: Vec<String>,
    #[serde(rename = "cliques")]
    pub clicks: Vec<u64>,
    #[serde(rename = "impressoes")]
    pub impressions: Vec<u64>,
    /// Days without a CTR reading are `null`
    pub ctr_pct: Vec<Option<f64>>,
}

/// One aligned time bucket of [`Series`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket<'a> {
    pub date: &'a str,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr_pct: Option<f64>,
}

impl Series {
    /// Number of buckets (length of the date axis)
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterate index-aligned buckets
    pub fn buckets(&self) -> impl Iterator<Item = Bucket<'_>> + '_ {
        self.dates
            .iter()
            .zip(&self.clicks)
            .zip(&self.impressions)
            .zip(&self.ctr_pct)
            .map(|(((date, &clicks), &impressions), &ctr_pct)| Bucket {
                date: date.as_str(),
                clicks,
                impressions,
                ctr_pct,
            })
    }

    fn check_aligned(&self) -> Result<(), DocumentError> {
        let n = self.dates.len();
        if self.clicks.len() != n || self.impressions.len() != n || self.ctr_pct.len() != n {
            return Err(DocumentError::SeriesLength {
                dates: n,
                clicks: self.clicks.len(),
                impressions: self.impressions.len(),
                ctr: self.ctr_pct.len(),
            });
        }
        Ok(())
    }
}

/// Device split, usually percentages of impressions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Devices {
    pub desktop: f64,
    pub mobile: f64,
    pub tablet: f64,
}

impl Devices {
    pub const LABELS: [&'static str; 3] = ["desktop", "mobile", "tablet"];

    pub fn values(&self) -> [f64; 3] {
        [self.desktop, self.mobile, self.tablet]
    }
}

/// Per-country row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "pais")]
    pub name: String,
    #[serde(rename = "impressoes")]
    pub impressions: u64,
    #[serde(rename = "cliques")]
    pub clicks: u64,
    pub ctr_pct: f64,
}

impl MetricsDocument {
    /// Parse and validate a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let doc: MetricsDocument = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), DocumentError> {
        self.series.check_aligned()
    }

    /// Serialize back to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Well-formed document with three countries and three buckets
    pub const SAMPLE: &str = r#"{
        "meta": {
            "fonte": "Search Console (CSV convertido)",
            "ultima_atualizacao": "2024-05-02 10:15:00",
            "periodo": { "inicio": "2024-04-01", "fim": "2024-04-30" }
        },
        "kpis": {
            "impressoes_30d": 12345,
            "cliques_30d": 678,
            "ctr_medio_pct": 5.5,
            "posicao_media": 3.1,
            "delta_impressoes_pct": 12.4,
            "delta_cliques_pct": -3.6,
            "delta_ctr_pp": 0.25,
            "delta_posicao_pp": -0.4
        },
        "series": {
            "datas": ["2024-04-01", "2024-04-02", "2024-04-03"],
            "cliques": [20, 25, 18],
            "impressoes": [400, 410, 390],
            "ctr_pct": [5.0, null, 4.6]
        },
        "dispositivos": { "desktop": 62, "mobile": 35, "tablet": 3 },
        "paises": [
            { "pais": "BR", "impressoes": 10000, "cliques": 600, "ctr_pct": 6.0 },
            { "pais": "PT", "impressoes": 2000, "cliques": 70, "ctr_pct": 3.5 },
            { "pais": "US", "impressoes": 345, "cliques": 8, "ctr_pct": 2.3 }
        ]
    }"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::SAMPLE;
    use super::*;

    #[test]
    fn test_parse_sample() {
        let doc = MetricsDocument::from_json(SAMPLE).unwrap();

        assert_eq!(doc.kpis.impressions, 12345);
        assert_eq!(doc.meta.period.end, "2024-04-30");
        assert_eq!(doc.series.len(), 3);
        assert_eq!(doc.countries.len(), 3);
        assert_eq!(doc.countries[1].name, "PT");
        assert_eq!(doc.devices.values(), [62.0, 35.0, 3.0]);
    }

    #[test]
    fn test_null_ctr_bucket() {
        let doc = MetricsDocument::from_json(SAMPLE).unwrap();
        let buckets: Vec<_> = doc.series.buckets().collect();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[1].date, "2024-04-02");
        assert_eq!(buckets[1].ctr_pct, None);
        assert_eq!(buckets[2].impressions, 390);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let text = SAMPLE.replace("\"cliques_30d\": 678,", "");
        let err = MetricsDocument::from_json(&text).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
        assert!(err.to_string().contains("cliques_30d"));
    }

    #[test]
    fn test_not_json() {
        let err = MetricsDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn test_series_length_mismatch() {
        let text = SAMPLE.replace("\"cliques\": [20, 25, 18]", "\"cliques\": [20, 25]");
        match MetricsDocument::from_json(&text) {
            Err(DocumentError::SeriesLength { dates, clicks, .. }) => {
                assert_eq!(dates, 3);
                assert_eq!(clicks, 2);
            }
            other => panic!("expected SeriesLength, got {:?}", other),
        }
    }

    #[test]
    fn test_source_is_optional() {
        let text = SAMPLE.replace("\"fonte\": \"Search Console (CSV convertido)\",", "");
        let doc = MetricsDocument::from_json(&text).unwrap();
        assert!(doc.meta.source.is_none());
    }

    #[test]
    fn test_pretty_output_keeps_wire_names() {
        let doc = MetricsDocument::from_json(SAMPLE).unwrap();
        let out = doc.to_json_pretty().unwrap();
        assert!(out.contains("\"impressoes_30d\": 12345"));
        assert!(out.contains("\"paises\""));
        assert_eq!(MetricsDocument::from_json(&out).unwrap(), doc);
    }
}
