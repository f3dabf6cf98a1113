mod chart;
mod engine;
mod series;
mod types;

pub use chart::{AreaSeries, BandField, BandSeries, ChartView, LineSeries, PointField};
pub use engine::{compute_metrics, operating_result_at, rapid_analysis, volume_slider_max};
pub use series::{SERIES_STEPS, generate_series};
pub use types::{ChartKind, DataPoint, Inputs, Metrics, RapidAnalysis, UnitType, Zone};
