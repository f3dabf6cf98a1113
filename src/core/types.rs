use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Contribution,
    Conventional,
    VolumeResults,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Physical,
    Monetary,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    Profit,
    BreakEven,
    Loss,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inputs {
    pub fixed_cost: f64,
    pub price_per_unit: f64,
    pub variable_cost_per_unit: f64,
    pub target_volume: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub break_even_q: f64,
    pub break_even_v: f64,
    pub safety_margin_q: f64,
    pub safety_margin_v: f64,
    pub safety_margin_percent: f64,
    pub contribution_margin_unit: f64,
    pub contribution_margin_ratio: f64,
}

impl Metrics {
    pub fn has_break_even(&self) -> bool {
        self.contribution_margin_unit > 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub q: u64,
    pub v: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub fixed_cost: f64,
    pub variable_cost: f64,
    pub negative_variable_cost: f64,
    pub total_contribution_margin: f64,
    pub operating_result: f64,
    pub loss_range: [f64; 2],
    pub profit_range: [f64; 2],
    pub ro_profit: f64,
    pub ro_loss: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RapidAnalysis {
    pub percent_diff: f64,
    pub zone: Zone,
}
