use axum::{routing::get, routing::put, Router};
use crate::controllers::soiling_controller::{
    // Model & daily series
    get_model, get_day, get_day_strings, get_day_status, get_day_array, get_history,
    get_parameter,
    // IV curves
    get_string_iv_curve,
    // Configuration
    get_config, get_cleaning_days, put_simulation_config,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router. All handlers share the one `AppState`,
/// which owns the live configuration and the memoized model snapshot.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/soiling/model",              get(get_model))
        .route("/soiling/days/{day}",         get(get_day))
        .route("/soiling/days/{day}/strings", get(get_day_strings))
        .route("/soiling/days/{day}/status",  get(get_day_status))
        .route("/soiling/days/{day}/array",   get(get_day_array))
        .route("/soiling/history",            get(get_history))
        .route("/soiling/parameters/{name}",  get(get_parameter))
        .route("/strings/{id}/iv-curve",      get(get_string_iv_curve))
        .route("/config",                     get(get_config))
        .route("/config/cleaning-days",       get(get_cleaning_days))
        .route("/config/simulation",          put(put_simulation_config))
        .with_state(state)
}
