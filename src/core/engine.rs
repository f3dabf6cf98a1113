use super::types::{Inputs, Metrics, RapidAnalysis, Zone};

/// Deviations inside this band read as break-even, but only once a positive
/// deviation has already been classified as profit.
const BREAK_EVEN_TOLERANCE: f64 = 0.001;

const MIN_VOLUME_SLIDER_MAX: f64 = 2_000.0;

pub fn compute_metrics(inputs: &Inputs) -> Metrics {
    let mc = inputs.price_per_unit - inputs.variable_cost_per_unit;
    let rc = if inputs.price_per_unit != 0.0 {
        mc / inputs.price_per_unit
    } else {
        0.0
    };

    let break_even_q = if mc > 0.0 {
        inputs.fixed_cost / mc
    } else {
        0.0
    };
    let break_even_v = break_even_q * inputs.price_per_unit;

    let safety_margin_q = inputs.target_volume - break_even_q;
    let safety_margin_v = safety_margin_q * inputs.price_per_unit;
    let safety_margin_percent = if inputs.target_volume > 0.0 {
        (safety_margin_q / inputs.target_volume) * 100.0
    } else if safety_margin_q < 0.0 {
        -100.0
    } else {
        0.0
    };

    Metrics {
        break_even_q,
        break_even_v,
        safety_margin_q,
        safety_margin_v,
        safety_margin_percent,
        contribution_margin_unit: mc,
        contribution_margin_ratio: rc,
    }
}

pub fn operating_result_at(inputs: &Inputs, metrics: &Metrics) -> f64 {
    inputs.target_volume * metrics.contribution_margin_unit - inputs.fixed_cost
}

pub fn rapid_analysis(inputs: &Inputs, metrics: &Metrics) -> Option<RapidAnalysis> {
    if metrics.break_even_q == 0.0 {
        return None;
    }

    let percent_diff = (inputs.target_volume - metrics.break_even_q) / metrics.break_even_q;
    let zone = if percent_diff > 0.0 {
        Zone::Profit
    } else if percent_diff.abs() < BREAK_EVEN_TOLERANCE {
        Zone::BreakEven
    } else {
        Zone::Loss
    };

    Some(RapidAnalysis { percent_diff, zone })
}

pub fn volume_slider_max(metrics: &Metrics) -> f64 {
    (metrics.break_even_q * 2.0).max(MIN_VOLUME_SLIDER_MAX)
}
