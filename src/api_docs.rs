use utoipa::OpenApi;
use crate::controllers::soiling_controller;
use crate::models::soiling;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        soiling_controller::get_model,
        soiling_controller::get_day,
        soiling_controller::get_day_strings,
        soiling_controller::get_day_status,
        soiling_controller::get_day_array,
        soiling_controller::get_history,
        soiling_controller::get_parameter,
        soiling_controller::get_string_iv_curve,
        soiling_controller::get_config,
        soiling_controller::get_cleaning_days,
        soiling_controller::put_simulation_config
    ),
    components(
        schemas(
            soiling::SoilingModelResponse,
            soiling::SoilingModelData,
            soiling::SoilingModelParameter,
            soiling::StringPerformance,
            soiling::StringStatus,
            soiling::CleaningUnitStatus,
            soiling::ArrayPerformance,
            soiling::DailyData,
            soiling::StringDailyData,
            soiling::IvCurvePoint,
            soiling::IvCurveSummary,
            soiling::IvCurveData,
            soiling::StringIvCurveResponse,
            soiling::StringTileResponse,
            soiling::CleaningScheduleResponse,
            config::Configuration,
            config::SimulationUpdate
        )
    ),
    tags(
        (name = "soilwatch-sim", description = "Soiling Simulation API")
    )
)]
pub struct ApiDoc;
