use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{Configuration, SimulationUpdate};
use crate::error::GenerationError;
use crate::models::soiling::{
    CleaningScheduleResponse, SoilingModelResponse, StringIvCurveResponse, StringStatus,
    StringTileResponse,
};
use crate::services::iv_curve;
use crate::shared_state::AppState;

fn generation_error_response(e: GenerationError) -> axum::response::Response {
    let status = match e {
        GenerationError::ConfigurationMissing => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::InvalidNumericField { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Last day (inclusive) of the returned prefix
    pub up_to: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DayParam {
    /// Simulated day; defaults to the last day of the series
    pub day: Option<u32>,
}

/// GET /api/soiling/model
/// Full soiling model snapshot
///
/// Returns the complete generated model: parameters, per-string baselines,
/// unit status, array performance and the daily series. Regenerated only when
/// the simulation configuration changes.
#[utoipa::path(
    get,
    path = "/api/soiling/model",
    responses(
        (status = 200, description = "Current soiling model snapshot", body = SoilingModelResponse),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_model(State(state): State<AppState>) -> impl IntoResponse {
    match state.model() {
        Ok(data) => Json(SoilingModelResponse {
            generated_at: chrono::Utc::now(),
            data: (*data).clone(),
        })
        .into_response(),
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/days/{day}
/// One day of the simulated series
#[utoipa::path(
    get,
    path = "/api/soiling/days/{day}",
    params(("day" = u32, Path, description = "1-indexed simulated day")),
    responses(
        (status = 200, description = "Daily record", body = crate::models::soiling::DailyData),
        (status = 404, description = "Day out of range"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_day(Path(day): Path<u32>, State(state): State<AppState>) -> impl IntoResponse {
    match state.model() {
        Ok(data) => match data.data_for_day(day) {
            Some(d) => Json(d.clone()).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("No data for day {}", day) })),
            )
                .into_response(),
        },
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/days/{day}/strings
/// Per-string performance tiles for one day
///
/// Offline strings report performance 0 with an explicit offline status and
/// the configured offline color; online strings report
/// `baseline * (1 - soiling% / 100)` and the hue of their performance band.
#[utoipa::path(
    get,
    path = "/api/soiling/days/{day}/strings",
    params(("day" = u32, Path, description = "1-indexed simulated day")),
    responses(
        (status = 200, description = "Per-day string tiles", body = Vec<StringTileResponse>),
        (status = 500, description = "Generation failed"),
        (status = 503, description = "No configuration loaded")
    )
)]
pub async fn get_day_strings(
    Path(day): Path<u32>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let Some(config) = state.config() else {
        return generation_error_response(GenerationError::ConfigurationMissing);
    };
    match state.model() {
        Ok(data) => {
            let tiles: Vec<StringTileResponse> = data
                .string_performance_for_day(day)
                .into_iter()
                .map(|s| {
                    let (color_hue, offline_color) = match s.status {
                        StringStatus::Online => (Some(config.performance_hue(s.performance)), None),
                        StringStatus::Offline => (None, Some(config.offline_color().to_string())),
                    };
                    StringTileResponse {
                        id: s.id,
                        name: s.name,
                        performance: s.performance,
                        status: s.status,
                        color_hue,
                        offline_color,
                    }
                })
                .collect();
            Json(tiles).into_response()
        }
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/days/{day}/status
/// Cleaning unit status for one day
#[utoipa::path(
    get,
    path = "/api/soiling/days/{day}/status",
    params(("day" = u32, Path, description = "1-indexed simulated day")),
    responses(
        (status = 200, description = "Per-day unit status", body = crate::models::soiling::CleaningUnitStatus),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_day_status(
    Path(day): Path<u32>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.model() {
        Ok(data) => Json(data.cleaning_unit_status_for_day(day)).into_response(),
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/days/{day}/array
/// Array-level performance for one day
#[utoipa::path(
    get,
    path = "/api/soiling/days/{day}/array",
    params(("day" = u32, Path, description = "1-indexed simulated day")),
    responses(
        (status = 200, description = "Per-day array performance", body = crate::models::soiling::ArrayPerformance),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_day_array(
    Path(day): Path<u32>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.model() {
        Ok(data) => Json(data.array_performance_for_day(day)).into_response(),
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/history?up_to=N
/// Prefix of the daily series up to a day (inclusive)
#[utoipa::path(
    get,
    path = "/api/soiling/history",
    params(HistoryParams),
    responses(
        (status = 200, description = "Daily records 1..=up_to", body = Vec<crate::models::soiling::DailyData>),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_history(
    Query(params): Query<HistoryParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.model() {
        Ok(data) => Json(data.daily_data_up_to(params.up_to).to_vec()).into_response(),
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/soiling/parameters/{name}
/// One display parameter by name
#[utoipa::path(
    get,
    path = "/api/soiling/parameters/{name}",
    params(("name" = String, Path, description = "Parameter name, e.g. Cleaning Interval")),
    responses(
        (status = 200, description = "Parameter", body = crate::models::soiling::SoilingModelParameter),
        (status = 404, description = "Unknown parameter"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_parameter(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match state.model() {
        Ok(data) => match data.parameter_by_name(&name) {
            Some(p) => Json(p.clone()).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("Unknown parameter {}", name) })),
            )
                .into_response(),
        },
        Err(e) => generation_error_response(e),
    }
}

/// GET /api/strings/{id}/iv-curve?day=N
/// IV/PV curve for one string
///
/// The curve is generated from the string's effective performance on the
/// requested day (default: last day of the series).
#[utoipa::path(
    get,
    path = "/api/strings/{id}/iv-curve",
    params(
        ("id" = String, Path, description = "String identifier, e.g. string-3"),
        DayParam
    ),
    responses(
        (status = 200, description = "Clean and soiled IV/PV sweeps", body = StringIvCurveResponse),
        (status = 404, description = "String not found"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn get_string_iv_curve(
    Path(id): Path<String>,
    Query(params): Query<DayParam>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let data = match state.model() {
        Ok(data) => data,
        Err(e) => return generation_error_response(e),
    };
    let day = params.day.unwrap_or_else(|| data.max_day());

    let Some(string) = data
        .string_performance_for_day(day)
        .into_iter()
        .find(|s| s.id == id)
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("String {} not found", id) })),
        )
            .into_response();
    };

    let iv_config = state.config().map(|c| c.iv_curve).unwrap_or_default();
    let curve = iv_curve::generate_iv_curve(string.performance, Some(&iv_config));

    Json(StringIvCurveResponse {
        string_id: string.id,
        day,
        performance: string.performance,
        nominal_power_kw: iv_config.nominal_string_power_kw,
        curve,
    })
    .into_response()
}

/// GET /api/config
/// Current configuration tree
///
/// Everything the dashboard needs to render: thresholds, colors, display
/// settings and the active simulation parameters.
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Active configuration", body = Configuration),
        (status = 503, description = "No configuration loaded")
    )
)]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.config() {
        Some(config) => Json(config).into_response(),
        None => generation_error_response(GenerationError::ConfigurationMissing),
    }
}

/// GET /api/config/cleaning-days
/// Scheduled cleaning days
#[utoipa::path(
    get,
    path = "/api/config/cleaning-days",
    responses(
        (status = 200, description = "Cleaning schedule", body = CleaningScheduleResponse),
        (status = 503, description = "No configuration loaded")
    )
)]
pub async fn get_cleaning_days(State(state): State<AppState>) -> impl IntoResponse {
    let Some(config) = state.config() else {
        return generation_error_response(GenerationError::ConfigurationMissing);
    };
    Json(CleaningScheduleResponse {
        interval_days: config.cleaning.interval_days,
        total_days: config.simulation.total_days,
        cleaning_days: config.cleaning_days(),
    })
    .into_response()
}

/// PUT /api/config/simulation
/// Replace the simulation, cleaning and soiling sections
///
/// The submitted values go through the same sanitize pass as config.json.
/// Reads after this call regenerate the model if the simulation hash moved.
#[utoipa::path(
    put,
    path = "/api/config/simulation",
    request_body = SimulationUpdate,
    responses(
        (status = 200, description = "Sanitized configuration now in effect", body = Configuration)
    )
)]
pub async fn put_simulation_config(
    State(state): State<AppState>,
    Json(update): Json<SimulationUpdate>,
) -> impl IntoResponse {
    let config = state.update_simulation(update);
    Json(config).into_response()
}
