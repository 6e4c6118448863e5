//! Period windowing over decoded graph series for the app chart views.

use desktop_app_contract::{Granularity, GraphFilter, GraphSeries};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Samples visible for one period.
pub struct FilteredSeries {
    /// Samples, oldest first.
    pub samples: Vec<f64>,
    /// Unit of one sample.
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Chart-ready series with optional forecast and x-axis labels.
pub struct ProjectedGraphData {
    /// Observed samples.
    pub actual: Vec<f64>,
    /// Forecast samples, when a prediction series was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted: Option<Vec<f64>>,
    /// One label per observed sample.
    pub labels: Vec<String>,
}

/// Selects the bucket `filter` reads and cuts it to the period's window length.
pub fn filter_data(series: &GraphSeries, filter: GraphFilter) -> FilteredSeries {
    let bucket = series.bucket(filter);
    let end = bucket.len().min(filter.window_len());
    FilteredSeries {
        samples: bucket[..end].to_vec(),
        granularity: filter.granularity(),
    }
}

/// Filters `actual` (and `predicted`) for `filter` and labels the x-axis from `actual` alone.
pub fn projected_graph_data(
    filter: GraphFilter,
    actual: &GraphSeries,
    predicted: Option<&GraphSeries>,
) -> ProjectedGraphData {
    let actual = filter_data(actual, filter);
    let labels = axis_labels(actual.granularity, actual.samples.len());
    ProjectedGraphData {
        actual: actual.samples,
        predicted: predicted.map(|series| filter_data(series, filter).samples),
        labels,
    }
}

/// `"Day 1"`, `"Day 2"`, ... (or `"Month N"`) for `count` samples.
pub fn axis_labels(granularity: Granularity, count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| format!("{} {n}", granularity.label_prefix()))
        .collect()
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::RawGraphData;
    use pretty_assertions::assert_eq;

    use super::*;

    fn series(raw: RawGraphData) -> GraphSeries {
        GraphSeries::from(raw)
    }

    #[test]
    fn week_stops_at_sentinel() {
        let series = series(RawGraphData {
            one_week: vec![10.0, 20.0, -1.0, 40.0, 50.0, 60.0, 70.0],
            ..RawGraphData::default()
        });
        let filtered = filter_data(&series, GraphFilter::OneWeek);
        assert_eq!(filtered.samples, vec![10.0, 20.0]);
        assert_eq!(filtered.granularity, Granularity::Day);
    }

    #[test]
    fn missing_sentinel_uses_window_length() {
        let series = series(RawGraphData {
            type_id: 1,
            one_year: (1..=20).map(f64::from).collect(),
            ..RawGraphData::default()
        });
        let filtered = filter_data(&series, GraphFilter::OneYear);
        assert_eq!(filtered.samples.len(), 12);
        assert_eq!(filtered.samples.last().copied(), Some(12.0));
        assert_eq!(filtered.granularity, Granularity::Month);
    }

    #[test]
    fn each_filter_reads_only_its_own_bucket() {
        let series = GraphSeries::new(Granularity::Day)
            .with_bucket(GraphFilter::OneWeek, vec![1.0])
            .with_bucket(GraphFilter::ThreeYears, vec![3.0, 3.0]);
        assert_eq!(filter_data(&series, GraphFilter::OneWeek).samples, vec![1.0]);
        assert!(filter_data(&series, GraphFilter::OneMonth).samples.is_empty());
        assert_eq!(
            filter_data(&series, GraphFilter::ThreeYears).samples,
            vec![3.0, 3.0]
        );
    }

    #[test]
    fn labels_follow_actual_length() {
        let actual = GraphSeries::new(Granularity::Day)
            .with_bucket(GraphFilter::OneMonth, vec![5.0, 6.0, 7.0]);
        let predicted = GraphSeries::new(Granularity::Day)
            .with_bucket(GraphFilter::OneMonth, vec![5.0, 6.0, 7.0, 8.0, 9.0]);

        let projected = projected_graph_data(GraphFilter::OneMonth, &actual, Some(&predicted));
        assert_eq!(projected.labels, vec!["Day 1", "Day 2", "Day 3"]);
        assert_eq!(projected.predicted.map(|p| p.len()), Some(5));

        let bare = projected_graph_data(GraphFilter::ThreeYears, &actual, None);
        assert!(bare.labels.is_empty());
        assert_eq!(bare.predicted, None);
    }

    #[test]
    fn monthly_labels() {
        assert_eq!(
            axis_labels(Granularity::Month, 2),
            vec!["Month 1".to_string(), "Month 2".to_string()]
        );
    }
}
