use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Core soiling model ──────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct SoilingModelResponse {
    pub generated_at: DateTime<Utc>,
    pub data: SoilingModelData,
}

/// Full generated snapshot for one configuration. Built once per
/// configuration hash and treated as immutable by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SoilingModelData {
    /// Display-only derived scalars (nominal rate, interval, average loss)
    pub parameters: Vec<SoilingModelParameter>,
    /// Baseline per-string data, index order `string-1..string-N`
    pub strings: Vec<StringPerformance>,
    /// Unit status derived from the latest simulated day
    pub cleaning_unit_status: CleaningUnitStatus,
    /// Array-level performance derived from the latest simulated day
    pub array_performance: ArrayPerformance,
    /// One entry per day, day ascending, `1..=total_days`
    pub daily_data: Vec<DailyData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SoilingModelParameter {
    pub name: String,
    pub current_value: f64,
    pub units: String,
}

/// Explicit online/offline state. Serialized as `"online"` / `"offline"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StringStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StringPerformance {
    /// Stable identifier, `string-{n}`
    pub id: String,
    pub name: String,
    /// Baseline efficiency (%), drawn once per string at generation time.
    /// Per-day effective values come from the query layer.
    pub performance: f64,
    pub status: StringStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CleaningUnitStatus {
    pub online: u32,
    pub offline: u32,
    pub total: u32,
    /// Units scheduled for cleaning (0 or 1 on the current schedule)
    pub cleaning: u32,
    /// Random fault count drawn once from the tail of the sequence (0-2)
    pub faults: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArrayPerformance {
    /// Soiling reference of the latest day (%)
    pub dirty: f64,
    pub cleaning_gain: f64,
    /// `100 - avg_array_soiling_ratio` of the latest day
    pub residual_loss: f64,
}

// ─── Per-day records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StringDailyData {
    pub string_id: String,
    /// Accumulated soiling, clamped to `[0, max_soiling_loss]` (%)
    pub soiling_percentage: f64,
    pub is_offline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyData {
    /// 1-indexed, contiguous
    pub day: u32,
    /// Average soiling across online strings (0 if none online) (%)
    pub daily_soiling: f64,
    /// Synthetic reference baseline, 95-97 (%)
    pub soiling_reference: f64,
    pub avg_array_soiling_ratio: f64,
    pub soiling_loss: f64,
    /// Non-zero only on cleaning days, 1-3 (%)
    pub cleaning_gain: f64,
    pub days_since_clean: u32,
    pub cleaning_scheduled: bool,
    pub online_units: u32,
    pub total_units: u32,
    pub offline: u32,
    pub string_data: Vec<StringDailyData>,
}

// ─── IV / PV curves ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IvCurvePoint {
    /// Voltage (V), rounded to one decimal
    pub voltage: f64,
    /// Current (A), rounded to one decimal
    pub current: f64,
    /// Power (kW), rounded to one decimal
    pub power: f64,
}

/// Scalar summary of one IV sweep: open-circuit voltage, short-circuit
/// current, the maximum power point and the fill factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IvCurveSummary {
    pub voc: f64,
    pub isc: f64,
    pub vmp: f64,
    pub imp: f64,
    pub pmax: f64,
    pub fill_factor: f64,
}

/// Clean and soiled IV/PV sweeps for one string. Pure value, recomputed on
/// every request, no persistent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IvCurveData {
    pub clean: Vec<IvCurvePoint>,
    pub soiled: Vec<IvCurvePoint>,
    pub clean_summary: IvCurveSummary,
    pub soiled_summary: IvCurveSummary,
}

// ─── REST API response types ─────────────────────────────────────────────────

/// One dashboard tile: effective per-day performance plus the color the
/// configured performance bands assign to it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StringTileResponse {
    pub id: String,
    pub name: String,
    pub performance: f64,
    pub status: StringStatus,
    /// HSL hue for online strings; absent when offline
    pub color_hue: Option<u16>,
    /// Flat color for offline strings; absent when online
    pub offline_color: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StringIvCurveResponse {
    pub string_id: String,
    pub day: u32,
    /// Effective performance (%) the curve was generated for
    pub performance: f64,
    /// Nominal power rating of the string (kW)
    pub nominal_power_kw: f64,
    pub curve: IvCurveData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleaningScheduleResponse {
    pub interval_days: u32,
    pub total_days: u32,
    pub cleaning_days: Vec<u32>,
}
