//! Time-series wire format shared with the simulation backend.
//!
//! The backend ships fixed-capacity arrays where [`GRAPH_SENTINEL`] marks the logical end. That
//! marker is stripped once, while deserializing into [`GraphSeries`]; nothing past this module
//! ever sees it.

use serde::{Deserialize, Serialize};

/// End-of-data marker in backend arrays.
pub const GRAPH_SENTINEL: f64 = -1.0;

/// Sample granularity of a series or a filter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One sample per in-game day.
    #[default]
    Day,
    /// One sample per in-game month.
    Month,
}

impl Granularity {
    /// Lowercase token (`day` / `month`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }

    /// Capitalized prefix used for axis labels.
    pub const fn label_prefix(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Month => "Month",
        }
    }

    fn from_type_id(type_id: u8) -> Self {
        if type_id == 0 {
            Self::Day
        } else {
            Self::Month
        }
    }

    const fn type_id(self) -> u8 {
        match self {
            Self::Day => 0,
            Self::Month => 1,
        }
    }
}

/// Display period selectable in the app graph views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphFilter {
    /// Last 7 days.
    #[default]
    OneWeek,
    /// Last 30 days.
    OneMonth,
    /// Last 90 days.
    ThreeMonths,
    /// Last 180 days.
    SixMonths,
    /// Last 12 months.
    OneYear,
    /// Last 36 months.
    ThreeYears,
}

impl GraphFilter {
    /// All filters, shortest period first.
    pub const ALL: [GraphFilter; 6] = [
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::ThreeYears,
    ];

    /// Maximum number of samples shown for this period.
    pub const fn window_len(self) -> usize {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 12,
            Self::ThreeYears => 36,
        }
    }

    /// Sample granularity of the bucket this period reads.
    pub const fn granularity(self) -> Granularity {
        match self {
            Self::OneWeek | Self::OneMonth | Self::ThreeMonths | Self::SixMonths => {
                Granularity::Day
            }
            Self::OneYear | Self::ThreeYears => Granularity::Month,
        }
    }
}

/// Backend series layout: one sentinel-terminated array per period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGraphData {
    /// `0` for daily series, `1` for monthly.
    pub type_id: u8,
    /// Week bucket.
    pub one_week: Vec<f64>,
    /// Month bucket.
    pub one_month: Vec<f64>,
    /// Three-month bucket.
    pub three_months: Vec<f64>,
    /// Six-month bucket.
    pub six_months: Vec<f64>,
    /// One-year bucket.
    pub one_year: Vec<f64>,
    /// Three-year bucket.
    pub three_years: Vec<f64>,
}

/// Decoded series: every bucket holds exactly its logical samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawGraphData", into = "RawGraphData")]
pub struct GraphSeries {
    granularity: Granularity,
    one_week: Vec<f64>,
    one_month: Vec<f64>,
    three_months: Vec<f64>,
    six_months: Vec<f64>,
    one_year: Vec<f64>,
    three_years: Vec<f64>,
}

impl GraphSeries {
    /// Builds a series from already-decoded buckets.
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    /// Replaces the bucket read by `filter`.
    pub fn with_bucket(mut self, filter: GraphFilter, samples: Vec<f64>) -> Self {
        *self.bucket_mut(filter) = samples;
        self
    }

    /// Series granularity as reported by the backend.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Logical samples of the bucket read by `filter`.
    pub fn bucket(&self, filter: GraphFilter) -> &[f64] {
        match filter {
            GraphFilter::OneWeek => &self.one_week,
            GraphFilter::OneMonth => &self.one_month,
            GraphFilter::ThreeMonths => &self.three_months,
            GraphFilter::SixMonths => &self.six_months,
            GraphFilter::OneYear => &self.one_year,
            GraphFilter::ThreeYears => &self.three_years,
        }
    }

    fn bucket_mut(&mut self, filter: GraphFilter) -> &mut Vec<f64> {
        match filter {
            GraphFilter::OneWeek => &mut self.one_week,
            GraphFilter::OneMonth => &mut self.one_month,
            GraphFilter::ThreeMonths => &mut self.three_months,
            GraphFilter::SixMonths => &mut self.six_months,
            GraphFilter::OneYear => &mut self.one_year,
            GraphFilter::ThreeYears => &mut self.three_years,
        }
    }
}

fn until_sentinel(mut samples: Vec<f64>) -> Vec<f64> {
    if let Some(end) = samples.iter().position(|value| *value == GRAPH_SENTINEL) {
        samples.truncate(end);
    }
    samples
}

impl From<RawGraphData> for GraphSeries {
    fn from(raw: RawGraphData) -> Self {
        Self {
            granularity: Granularity::from_type_id(raw.type_id),
            one_week: until_sentinel(raw.one_week),
            one_month: until_sentinel(raw.one_month),
            three_months: until_sentinel(raw.three_months),
            six_months: until_sentinel(raw.six_months),
            one_year: until_sentinel(raw.one_year),
            three_years: until_sentinel(raw.three_years),
        }
    }
}

impl From<GraphSeries> for RawGraphData {
    fn from(series: GraphSeries) -> Self {
        Self {
            type_id: series.granularity.type_id(),
            one_week: series.one_week,
            one_month: series.one_month,
            three_months: series.three_months,
            six_months: series.six_months,
            one_year: series.one_year,
            three_years: series.three_years,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn sentinel_is_stripped_while_deserializing() {
        let series: GraphSeries = serde_json::from_value(json!({
            "type_id": 1,
            "one_week": [10.0, 20.0, -1.0, 40.0],
            "one_year": [5.0, -1.0, -1.0],
            "three_years": [1.0, 2.0, 3.0],
        }))
        .expect("series");

        assert_eq!(series.granularity(), Granularity::Month);
        assert_eq!(series.bucket(GraphFilter::OneWeek), &[10.0, 20.0]);
        assert_eq!(series.bucket(GraphFilter::OneYear), &[5.0]);
        assert_eq!(series.bucket(GraphFilter::ThreeYears), &[1.0, 2.0, 3.0]);
        assert!(series.bucket(GraphFilter::SixMonths).is_empty());
    }

    #[test]
    fn filters_map_to_windows_and_granularity() {
        let windows: Vec<(usize, Granularity)> = GraphFilter::ALL
            .iter()
            .map(|filter| (filter.window_len(), filter.granularity()))
            .collect();
        assert_eq!(
            windows,
            vec![
                (7, Granularity::Day),
                (30, Granularity::Day),
                (90, Granularity::Day),
                (180, Granularity::Day),
                (12, Granularity::Month),
                (36, Granularity::Month),
            ]
        );
        assert_eq!(
            serde_json::to_value(GraphFilter::ThreeMonths).expect("filter"),
            json!("three_months")
        );
    }
}
