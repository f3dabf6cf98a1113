pub mod format;

use std::fmt::Write as _;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{Json, Query, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    ChartKind, ChartView, DataPoint, Inputs, Metrics, RapidAnalysis, UnitType, Zone,
    compute_metrics, generate_series, operating_result_at, rapid_analysis, volume_slider_max,
};
use crate::error::{CliError, InputError};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliChartKind {
    Contribution,
    Conventional,
    VolumeResults,
}

impl From<CliChartKind> for ChartKind {
    fn from(value: CliChartKind) -> Self {
        match value {
            CliChartKind::Contribution => ChartKind::Contribution,
            CliChartKind::Conventional => ChartKind::Conventional,
            CliChartKind::VolumeResults => ChartKind::VolumeResults,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliUnitType {
    Physical,
    Monetary,
}

impl From<CliUnitType> for UnitType {
    fn from(value: CliUnitType) -> Self {
        match value {
            CliUnitType::Physical => UnitType::Physical,
            CliUnitType::Monetary => UnitType::Monetary,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiChartKind {
    #[serde(alias = "triangular", alias = "CONTRIBUTION")]
    Contribution,
    #[serde(alias = "CONVENTIONAL")]
    Conventional,
    #[serde(
        alias = "volumeResults",
        alias = "volume_results",
        alias = "VOLUME_RESULTS"
    )]
    VolumeResults,
}

impl From<ApiChartKind> for CliChartKind {
    fn from(value: ApiChartKind) -> Self {
        match value {
            ApiChartKind::Contribution => CliChartKind::Contribution,
            ApiChartKind::Conventional => CliChartKind::Conventional,
            ApiChartKind::VolumeResults => CliChartKind::VolumeResults,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiUnitType {
    #[serde(alias = "PHYSICAL", alias = "units")]
    Physical,
    #[serde(alias = "MONETARY", alias = "money")]
    Monetary,
}

impl From<ApiUnitType> for CliUnitType {
    fn from(value: ApiUnitType) -> Self {
        match value {
            ApiUnitType::Physical => CliUnitType::Physical,
            ApiUnitType::Monetary => CliUnitType::Monetary,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzePayload {
    fixed_cost: Option<f64>,
    price_per_unit: Option<f64>,
    variable_cost_per_unit: Option<f64>,
    target_volume: Option<f64>,
    chart: Option<ApiChartKind>,
    unit: Option<ApiUnitType>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nivela",
    about = "Break-even (cost-volume-profit) calculator",
    after_help = "Run `nivela serve [port]` to start the HTTP API instead."
)]
struct Cli {
    #[arg(long, default_value_t = 80_000.0, help = "Total fixed cost for the period (CF)")]
    fixed_cost: f64,
    #[arg(long, default_value_t = 250.0, help = "Sales price per unit (p)")]
    price_per_unit: f64,
    #[arg(long, default_value_t = 90.0, help = "Variable cost per unit (cv)")]
    variable_cost_per_unit: f64,
    #[arg(
        long,
        default_value_t = 620.0,
        help = "Estimated quantity sold, the reference for safety margin (Q)"
    )]
    target_volume: f64,
    #[arg(long, value_enum, default_value_t = CliChartKind::Contribution)]
    chart: CliChartKind,
    #[arg(
        long,
        value_enum,
        default_value_t = CliUnitType::Physical,
        help = "Plot against units sold or sales revenue"
    )]
    unit: CliUnitType,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(long, default_value = "warn", help = "Log level (error, warn, info, debug)")]
    log_level: String,
}

#[derive(Copy, Clone, Debug)]
struct AnalysisRequest {
    inputs: Inputs,
    chart: ChartKind,
    unit: UnitType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisReport {
    inputs: Inputs,
    metrics: Metrics,
    operating_result: f64,
    profitable: bool,
    rapid_analysis: Option<RapidAnalysis>,
    volume_slider_max: f64,
    series: Vec<DataPoint>,
    chart: ChartView,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<Inputs, InputError> {
    for (field, value) in [
        ("--fixed-cost", cli.fixed_cost),
        ("--price-per-unit", cli.price_per_unit),
        ("--variable-cost-per-unit", cli.variable_cost_per_unit),
        ("--target-volume", cli.target_volume),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(InputError::InvalidInput {
                field,
                reason: format!("must be a finite number >= 0 (got {value})"),
            });
        }
    }

    Ok(Inputs {
        fixed_cost: cli.fixed_cost,
        price_per_unit: cli.price_per_unit,
        variable_cost_per_unit: cli.variable_cost_per_unit,
        target_volume: cli.target_volume,
    })
}

fn build_request(cli: &Cli) -> Result<AnalysisRequest, InputError> {
    Ok(AnalysisRequest {
        inputs: build_inputs(cli)?,
        chart: cli.chart.into(),
        unit: cli.unit.into(),
    })
}

fn build_report(request: &AnalysisRequest) -> AnalysisReport {
    let inputs = request.inputs;
    let metrics = compute_metrics(&inputs);
    let series = generate_series(&metrics, &inputs);
    let chart = ChartView::build(request.chart, request.unit, &series, &metrics, &inputs);
    let operating_result = operating_result_at(&inputs, &metrics);

    AnalysisReport {
        inputs,
        metrics,
        operating_result,
        profitable: operating_result >= 0.0,
        rapid_analysis: rapid_analysis(&inputs, &metrics),
        volume_slider_max: volume_slider_max(&metrics),
        series,
        chart,
    }
}

pub fn run_cli<I, T>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    crate::init_logging(&cli.log_level);

    let request = build_request(&cli)?;
    tracing::debug!(
        fixed_cost = request.inputs.fixed_cost,
        price_per_unit = request.inputs.price_per_unit,
        variable_cost_per_unit = request.inputs.variable_cost_per_unit,
        target_volume = request.inputs.target_volume,
        "Running analysis"
    );

    let report = build_report(&request);
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&report)?),
    }
    Ok(())
}

fn render_text(report: &AnalysisReport) -> Result<String, std::fmt::Error> {
    let m = &report.metrics;
    let mut out = String::new();

    writeln!(out, "Análisis Marginal")?;
    writeln!(
        out,
        "  {:<28}{}",
        "mc unitario (p - cv):",
        format::currency(m.contribution_margin_unit)
    )?;
    writeln!(
        out,
        "  {:<28}{}",
        "Razón Contrib. (rc):",
        format::percent(m.contribution_margin_ratio)
    )?;
    writeln!(out)?;

    let (safety_value, safety_unit) = match report.chart.unit {
        UnitType::Physical => (format::number(m.safety_margin_q), "Unidades"),
        UnitType::Monetary => (format::currency(m.safety_margin_v), "Monetario"),
    };
    let result_label = if report.profitable { "Ganancia" } else { "Pérdida" };
    for (title, value, note) in [
        (
            "Punto Nivelación (Qn):",
            format::number(m.break_even_q),
            "Unidades a vender",
        ),
        (
            "Punto Nivelación (Vn):",
            format::currency(m.break_even_v),
            "Ingresos necesarios",
        ),
        ("Margen Seguridad (MS):", safety_value, safety_unit),
        (
            "Resultado Operativo (Ro):",
            format::currency(report.operating_result),
            result_label,
        ),
    ] {
        writeln!(out, "{title:<30}{value:>16}  {note}")?;
    }
    writeln!(
        out,
        "{:<30}{:>16}",
        "Margen Seguridad (%):",
        format::percent(m.safety_margin_percent / 100.0)
    )?;

    if let Some(analysis) = report.rapid_analysis {
        writeln!(out)?;
        writeln!(out, "Análisis Rápido")?;
        let line = match analysis.zone {
            Zone::Profit => format!(
                "  Zona de ganancias: las ventas superan el punto de equilibrio en un {}.",
                format::simple_percent(analysis.percent_diff)
            ),
            Zone::BreakEven => {
                "  Punto de equilibrio: los ingresos cubren exactamente los costos.".to_string()
            }
            Zone::Loss => format!(
                "  Zona de pérdidas: las ventas están por debajo del punto de equilibrio en un {}.",
                format::simple_percent(analysis.percent_diff.abs())
            ),
        };
        writeln!(out, "{line}")?;
    }

    let chart = &report.chart;
    writeln!(out)?;
    writeln!(out, "{}", chart.title)?;
    if chart.x.is_empty() {
        writeln!(
            out,
            "  Sin curva: el margen de contribución unitario no es positivo."
        )?;
        return Ok(out);
    }

    let x_header = match chart.unit {
        UnitType::Physical => "Q",
        UnitType::Monetary => "V",
    };
    write!(out, "{x_header:>14}")?;
    for line in &chart.lines {
        write!(out, "{:>16}", short_label(line.label))?;
    }
    writeln!(out)?;
    for (idx, x) in chart.x.iter().enumerate() {
        let x = match chart.unit {
            UnitType::Physical => format::number(*x),
            UnitType::Monetary => format::currency(*x),
        };
        write!(out, "{x:>14}")?;
        for line in &chart.lines {
            write!(out, "{:>16}", format::currency(line.values[idx]))?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

/// Keeps the abbreviation in parentheses, e.g. `Costos Fijos (CF)` -> `CF`.
fn short_label(label: &str) -> &str {
    label
        .rsplit_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .unwrap_or(label)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Nivela HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/analyze");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/analyze",
            get(analyze_get_handler).post(analyze_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    with_cache_control("ok")
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn analyze_get_handler(query: Result<Query<AnalyzePayload>, QueryRejection>) -> Response {
    let request = match query {
        Ok(Query(payload)) => analysis_request_from_payload(payload),
        Err(rejection) => Err(InputError::InvalidPayload(rejection.body_text())),
    };
    analyze_handler_impl(request)
}

async fn analyze_post_handler(body: String) -> Response {
    analyze_handler_impl(analysis_request_from_json(&body))
}

fn analyze_handler_impl(request: Result<AnalysisRequest, InputError>) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected analysis request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    tracing::debug!(
        fixed_cost = request.inputs.fixed_cost,
        price_per_unit = request.inputs.price_per_unit,
        variable_cost_per_unit = request.inputs.variable_cost_per_unit,
        target_volume = request.inputs.target_volume,
        chart = ?request.chart,
        unit = ?request.unit,
        "Running analysis"
    );
    json_response(StatusCode::OK, build_report(&request))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn analysis_request_from_json(json: &str) -> Result<AnalysisRequest, InputError> {
    let payload = if json.trim().is_empty() {
        AnalyzePayload::default()
    } else {
        serde_json::from_str::<AnalyzePayload>(json)
            .map_err(|e| InputError::InvalidPayload(e.to_string()))?
    };
    analysis_request_from_payload(payload)
}

fn analysis_request_from_payload(payload: AnalyzePayload) -> Result<AnalysisRequest, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.fixed_cost {
        cli.fixed_cost = v;
    }
    if let Some(v) = payload.price_per_unit {
        cli.price_per_unit = v;
    }
    if let Some(v) = payload.variable_cost_per_unit {
        cli.variable_cost_per_unit = v;
    }
    if let Some(v) = payload.target_volume {
        cli.target_volume = v;
    }
    if let Some(v) = payload.chart {
        cli.chart = v.into();
    }
    if let Some(v) = payload.unit {
        cli.unit = v.into();
    }

    build_request(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        fixed_cost: 80_000.0,
        price_per_unit: 250.0,
        variable_cost_per_unit: 90.0,
        target_volume: 620.0,
        chart: CliChartKind::Contribution,
        unit: CliUnitType::Physical,
        format: OutputFormat::Json,
        log_level: "info".to_string(),
    }
}
