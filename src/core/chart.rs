use serde::Serialize;

use super::types::{ChartKind, DataPoint, Inputs, Metrics, UnitType};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PointField {
    TotalRevenue,
    TotalCost,
    FixedCost,
    VariableCost,
    NegativeVariableCost,
    TotalContributionMargin,
    OperatingResult,
    RoProfit,
    RoLoss,
}

impl PointField {
    pub fn label(self) -> &'static str {
        match self {
            PointField::TotalRevenue => "Ingresos Totales (IT)",
            PointField::TotalCost => "Costos Totales (CT)",
            PointField::FixedCost => "Costos Fijos (CF)",
            PointField::VariableCost | PointField::NegativeVariableCost => "Costos Variables (Cv)",
            PointField::TotalContributionMargin => "Margen Contrib. (MC)",
            PointField::OperatingResult => "Resultado Operativo (Ro)",
            PointField::RoProfit => "Ganancia (Ro > 0)",
            PointField::RoLoss => "Pérdida (Ro < 0)",
        }
    }

    pub fn value(self, point: &DataPoint) -> f64 {
        match self {
            PointField::TotalRevenue => point.total_revenue,
            PointField::TotalCost => point.total_cost,
            PointField::FixedCost => point.fixed_cost,
            PointField::VariableCost => point.variable_cost,
            PointField::NegativeVariableCost => point.negative_variable_cost,
            PointField::TotalContributionMargin => point.total_contribution_margin,
            PointField::OperatingResult => point.operating_result,
            PointField::RoProfit => point.ro_profit,
            PointField::RoLoss => point.ro_loss,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BandField {
    LossRange,
    ProfitRange,
}

impl BandField {
    pub fn value(self, point: &DataPoint) -> [f64; 2] {
        match self {
            BandField::LossRange => point.loss_range,
            BandField::ProfitRange => point.profit_range,
        }
    }
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Contribution => "Gráfico Volumen - Costos (Triangular)",
            ChartKind::Conventional => "Gráfico Convencional (Ingresos vs Costos)",
            ChartKind::VolumeResults => "Gráfico Volumen - Resultados (Ro)",
        }
    }

    pub fn lines(self) -> &'static [PointField] {
        match self {
            ChartKind::Contribution => &[
                PointField::FixedCost,
                PointField::TotalContributionMargin,
                PointField::NegativeVariableCost,
            ],
            ChartKind::Conventional => &[
                PointField::TotalRevenue,
                PointField::TotalCost,
                PointField::VariableCost,
                PointField::FixedCost,
            ],
            ChartKind::VolumeResults => &[PointField::OperatingResult],
        }
    }

    // filled down to the zero axis
    pub fn areas(self) -> &'static [PointField] {
        match self {
            ChartKind::Contribution => &[
                PointField::TotalContributionMargin,
                PointField::NegativeVariableCost,
            ],
            ChartKind::Conventional => &[],
            ChartKind::VolumeResults => &[PointField::RoLoss, PointField::RoProfit],
        }
    }

    pub fn bands(self) -> &'static [BandField] {
        match self {
            ChartKind::Conventional => &[BandField::LossRange, BandField::ProfitRange],
            ChartKind::Contribution | ChartKind::VolumeResults => &[],
        }
    }
}

impl UnitType {
    pub fn x_axis_label(self) -> &'static str {
        match self {
            UnitType::Physical => "Unidades (Q)",
            UnitType::Monetary => "Volumen de Ventas ($)",
        }
    }

    pub fn x_value(self, point: &DataPoint) -> f64 {
        match self {
            UnitType::Physical => point.q as f64,
            UnitType::Monetary => point.v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub field: PointField,
    pub label: &'static str,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    pub field: PointField,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandSeries {
    pub field: BandField,
    pub values: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub kind: ChartKind,
    pub unit: UnitType,
    pub title: &'static str,
    pub x_axis_label: &'static str,
    pub x: Vec<f64>,
    pub break_even_x: f64,
    pub current_x: f64,
    pub lines: Vec<LineSeries>,
    pub areas: Vec<AreaSeries>,
    pub bands: Vec<BandSeries>,
}

impl ChartView {
    pub fn build(
        kind: ChartKind,
        unit: UnitType,
        series: &[DataPoint],
        metrics: &Metrics,
        inputs: &Inputs,
    ) -> Self {
        let (break_even_x, current_x) = match unit {
            UnitType::Physical => (metrics.break_even_q, inputs.target_volume),
            UnitType::Monetary => (
                metrics.break_even_v,
                inputs.target_volume * inputs.price_per_unit,
            ),
        };

        let column =
            |field: PointField| -> Vec<f64> { series.iter().map(|p| field.value(p)).collect() };

        Self {
            kind,
            unit,
            title: kind.title(),
            x_axis_label: unit.x_axis_label(),
            x: series.iter().map(|p| unit.x_value(p)).collect(),
            break_even_x,
            current_x,
            lines: kind
                .lines()
                .iter()
                .map(|&field| LineSeries {
                    field,
                    label: field.label(),
                    values: column(field),
                })
                .collect(),
            areas: kind
                .areas()
                .iter()
                .map(|&field| AreaSeries {
                    field,
                    values: column(field),
                })
                .collect(),
            bands: kind
                .bands()
                .iter()
                .map(|&field| BandSeries {
                    field,
                    values: series.iter().map(|p| field.value(p)).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute_metrics;
    use crate::core::series::generate_series;

    fn sample_inputs() -> Inputs {
        Inputs {
            fixed_cost: 80_000.0,
            price_per_unit: 250.0,
            variable_cost_per_unit: 90.0,
            target_volume: 620.0,
        }
    }

    fn view(kind: ChartKind, unit: UnitType) -> ChartView {
        let inputs = sample_inputs();
        let metrics = compute_metrics(&inputs);
        let series = generate_series(&metrics, &inputs);
        ChartView::build(kind, unit, &series, &metrics, &inputs)
    }

    #[test]
    fn contribution_view_plots_margin_against_fixed_cost() {
        let view = view(ChartKind::Contribution, UnitType::Physical);

        let fields: Vec<PointField> = view.lines.iter().map(|l| l.field).collect();
        assert_eq!(
            fields,
            vec![
                PointField::FixedCost,
                PointField::TotalContributionMargin,
                PointField::NegativeVariableCost
            ]
        );
        assert_eq!(view.areas.len(), 2);
        assert!(view.bands.is_empty());
        assert_eq!(view.x_axis_label, "Unidades (Q)");
        assert_eq!(view.x[50], 1_000.0);
        assert_eq!(view.break_even_x, 500.0);
        assert_eq!(view.current_x, 620.0);
        assert!(view.lines[2].values.iter().all(|v| *v <= 0.0));
    }

    #[test]
    fn conventional_view_carries_bands() {
        let view = view(ChartKind::Conventional, UnitType::Monetary);

        assert_eq!(view.title, "Gráfico Convencional (Ingresos vs Costos)");
        assert_eq!(view.lines.len(), 4);
        assert!(view.areas.is_empty());
        assert_eq!(view.bands[0].field, BandField::LossRange);
        assert_eq!(view.bands[0].values[0], [0.0, 80_000.0]);
        assert_eq!(view.bands[1].values[50], [170_000.0, 250_000.0]);
        assert_eq!(view.x[50], 250_000.0);
        assert_eq!(view.break_even_x, 125_000.0);
        assert_eq!(view.current_x, 155_000.0);
    }

    #[test]
    fn volume_results_view_splits_operating_result() {
        let view = view(ChartKind::VolumeResults, UnitType::Physical);

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].label, "Resultado Operativo (Ro)");
        let loss = &view.areas[0];
        let profit = &view.areas[1];
        assert_eq!(loss.field, PointField::RoLoss);
        assert_eq!(loss.values[0], -80_000.0);
        assert_eq!(profit.values[0], 0.0);
        assert_eq!(profit.values[50], 80_000.0);
    }

    #[test]
    fn every_series_matches_sample_count() {
        for kind in [
            ChartKind::Contribution,
            ChartKind::Conventional,
            ChartKind::VolumeResults,
        ] {
            let view = view(kind, UnitType::Physical);
            let n = view.x.len();
            assert_eq!(n, 51);
            assert!(view.lines.iter().all(|s| s.values.len() == n));
            assert!(view.areas.iter().all(|s| s.values.len() == n));
            assert!(view.bands.iter().all(|s| s.values.len() == n));
        }
    }

    #[test]
    fn empty_series_produces_empty_columns() {
        let mut inputs = sample_inputs();
        inputs.price_per_unit = 90.0;
        let metrics = compute_metrics(&inputs);
        let series = generate_series(&metrics, &inputs);
        let view = ChartView::build(
            ChartKind::Conventional,
            UnitType::Physical,
            &series,
            &metrics,
            &inputs,
        );

        assert!(view.x.is_empty());
        assert!(view.lines.iter().all(|s| s.values.is_empty()));
        assert_eq!(view.break_even_x, 0.0);
    }
}
