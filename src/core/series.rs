use super::types::{DataPoint, Inputs, Metrics};

pub const SERIES_STEPS: u32 = 50;

const MIN_SERIES_CEILING: f64 = 100.0;

/// Each quantity is rounded on its own, so integer spacing can wobble by one
/// unit between neighbouring samples.
pub fn generate_series(metrics: &Metrics, inputs: &Inputs) -> Vec<DataPoint> {
    if !metrics.has_break_even() {
        return Vec::new();
    }

    let max_q = sampling_ceiling(metrics, inputs);
    let step = max_q / SERIES_STEPS as f64;

    (0..=SERIES_STEPS)
        .map(|i| {
            let q = (i as f64 * step).round() as u64;
            data_point(q, metrics, inputs)
        })
        .collect()
}

fn sampling_ceiling(metrics: &Metrics, inputs: &Inputs) -> f64 {
    (metrics.break_even_q * 2.0)
        .max(inputs.target_volume * 1.5)
        .max(MIN_SERIES_CEILING)
}

fn data_point(q: u64, metrics: &Metrics, inputs: &Inputs) -> DataPoint {
    let quantity = q as f64;
    let v = quantity * inputs.price_per_unit;
    let variable_cost = quantity * inputs.variable_cost_per_unit;
    let total_cost = inputs.fixed_cost + variable_cost;
    let total_revenue = v;
    let operating_result = total_revenue - total_cost;

    let loss_range = if total_cost > total_revenue {
        [total_revenue, total_cost]
    } else {
        [total_revenue, total_revenue]
    };
    let profit_range = if total_revenue > total_cost {
        [total_cost, total_revenue]
    } else {
        [total_cost, total_cost]
    };

    DataPoint {
        q,
        v,
        total_revenue,
        total_cost,
        fixed_cost: inputs.fixed_cost,
        variable_cost,
        negative_variable_cost: -variable_cost,
        total_contribution_margin: quantity * metrics.contribution_margin_unit,
        operating_result,
        loss_range,
        profit_range,
        ro_profit: operating_result.max(0.0),
        ro_loss: operating_result.min(0.0),
    }
}
