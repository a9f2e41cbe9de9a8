//! Subcommand implementations.

use std::path::Path;

use misland_analysis_models::{AnalysisPayload, AnalysisRecord};
use misland_chart::summary::{StatQuery, SummaryContext, percentage_of, stat_value_for};
use misland_indicator_models::{
    AnalysisEndpoint, ChangeKey, Indicator, IndicatorKind, RasterColor,
};
use misland_raster::Classifier;
use misland_request::selection::SelectionContext;
use misland_request::years::CatalogKind;
use misland_request::{ApiConfig, HttpTransport, Orchestrator, SubmitRequest};

type BoxError = Box<dyn std::error::Error>;

fn read_json(path: &Path) -> Result<serde_json::Value, BoxError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn read_payload(path: &Path) -> Result<AnalysisPayload, BoxError> {
    Ok(AnalysisPayload::from_value(&read_json(path)?)?)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the chart series for a saved response.
pub fn normalize(
    input: &Path,
    legend: Option<&Path>,
    indicator: Option<&str>,
) -> Result<(), BoxError> {
    let payload = read_payload(input)?;
    let indicator = match legend {
        Some(path) => serde_json::from_value::<Indicator>(read_json(path)?)?,
        None => Indicator::new(IndicatorKind::from(indicator.unwrap_or_default())),
    };

    let chart = misland_chart::normalize(&payload, &indicator)?;
    print_json(&chart)
}

/// Prints a value's share of the saved response's total.
pub fn summary(
    input: &Path,
    indicator: Option<&str>,
    value: Option<f64>,
    label: Option<&str>,
    change_type: Option<&str>,
) -> Result<(), BoxError> {
    let payload = read_payload(input)?;
    let indicator = indicator.map(IndicatorKind::from);
    let ctx = SummaryContext::new(Some(&payload), indicator.as_ref());

    let change_type = change_type.map(|raw| raw.parse::<ChangeKey>()).transpose()?;
    let value = match value {
        Some(value) => value,
        None => {
            let query = StatQuery {
                label,
                change_type: change_type.as_ref(),
                results: None,
            };
            stat_value_for(&query, &ctx).ok_or("No matching statistics row")?
        }
    };

    println!("{}", percentage_of(value, None, &ctx));
    Ok(())
}

/// Prints the color of each pixel value, `-` for undrawn pixels.
pub fn classify(
    indicator: &str,
    colors: Option<&Path>,
    no_data: Option<f64>,
    pixels: Vec<f64>,
) -> Result<(), BoxError> {
    let raster_colors = match colors {
        Some(path) => serde_json::from_value::<Vec<RasterColor>>(read_json(path)?)?,
        None => Vec::new(),
    };
    let classifier = Classifier::new(IndicatorKind::from(indicator), raster_colors, no_data)?;

    for pixel in pixels {
        match classifier.color_for(pixel) {
            Some(color) => println!("{pixel}\t{color}"),
            None => println!("{pixel}\t-"),
        }
    }
    Ok(())
}

fn orchestrator_from_env() -> Result<Orchestrator, BoxError> {
    let config = ApiConfig::from_env()?;
    log::debug!("Using backend {}", config.url(""));
    Ok(Orchestrator::new(Box::new(HttpTransport::new(config))))
}

/// Runs an analysis and prints its result and chart.
pub async fn submit(
    endpoint: AnalysisEndpoint,
    payload: &str,
    admin: Option<&Path>,
    custom: Option<&Path>,
    indicator: Option<&str>,
) -> Result<(), BoxError> {
    let orchestrator = orchestrator_from_env()?;

    let selection = match (admin, custom) {
        (Some(path), _) => match read_json(path)? {
            serde_json::Value::Object(boundary) => SelectionContext::admin(boundary),
            _ => return Err(format!("{} is not a JSON object", path.display()).into()),
        },
        (None, Some(path)) => SelectionContext::custom(read_json(path)?),
        (None, None) => SelectionContext::default(),
    };
    orchestrator.set_selection(selection);

    let mut request = SubmitRequest::new(endpoint, serde_json::from_str(payload)?).caller("cli");
    if let Some(indicator) = indicator {
        request = request.indicator(Some(IndicatorKind::from(indicator)));
    }

    let Some(record) = orchestrator.submit_analysis(request).await else {
        return Err("Analysis did not return a result".into());
    };
    print_record(endpoint, &record)
}

fn print_record(endpoint: AnalysisEndpoint, record: &AnalysisRecord) -> Result<(), BoxError> {
    print_json(&record.to_value())?;

    if let Some(payload) = &record.payload {
        let kind = record
            .indicator
            .clone()
            .unwrap_or_else(|| endpoint.default_indicator());
        let indicator = Indicator::new(kind);
        match misland_chart::normalize(payload, &indicator) {
            Ok(chart) => print_json(&chart)?,
            Err(e) => log::warn!("Result has no chart: {e}"),
        }
    }
    Ok(())
}

/// Prints the published years for a computation type, newest first.
pub async fn years(computation_type: &str, precomputed: bool) -> Result<(), BoxError> {
    let orchestrator = orchestrator_from_env()?;
    let kind = if precomputed {
        CatalogKind::Precomputation
    } else {
        CatalogKind::Computation
    };

    let years = orchestrator
        .computation_years(kind, computation_type)
        .await
        .ok_or_else(|| format!("No {kind} years published for '{computation_type}'"))?;

    for year in years {
        println!("{year}");
    }
    Ok(())
}
