use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Documented defaults, applied both when a leaf is absent from config.json
// and when sanitize() rejects a loaded value.
fn default_port() -> u16 { 8080 }
fn default_total_days() -> u32 { 60 }
fn default_total_strings() -> u32 { 20 }
fn default_base_performance_min() -> f64 { 64.3 }
fn default_base_performance_max() -> f64 { 99.1 }
fn default_offline_probability() -> f64 { 0.05 }
fn default_interval_days() -> u32 { 14 }
fn default_nominal_rate_per_day() -> f64 { 0.15 }
fn default_daily_accumulation_min() -> f64 { 0.25 }
fn default_daily_accumulation_max() -> f64 { 0.6 }
fn default_post_cleaning_min() -> f64 { 0.2 }
fn default_post_cleaning_max() -> f64 { 0.5 }
fn default_max_soiling_loss() -> f64 { 8.0 }
fn default_voc_clean() -> f64 { 800.0 }
fn default_isc_clean() -> f64 { 450.0 }
fn default_nominal_string_power_kw() -> f64 { 300.0 }
fn default_decimal_places() -> u8 { 1 }
fn default_selected_day() -> u32 { 30 }

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default, ToSchema)]
#[serde(default)]
pub struct Configuration {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub cleaning: CleaningConfig,
    pub soiling: SoilingConfig,
    pub iv_curve: IvCurveConfig,
    pub performance: PerformanceConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct SimulationConfig {
    pub total_days: u32,
    pub total_strings: u32,
    pub base_performance_min: f64,
    pub base_performance_max: f64,
    pub offline_probability: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct CleaningConfig {
    pub interval_days: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct SoilingConfig {
    pub nominal_rate_per_day: f64,
    pub daily_accumulation_min: f64,
    pub daily_accumulation_max: f64,
    pub post_cleaning_min: f64,
    pub post_cleaning_max: f64,
    pub max_soiling_loss: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct IvCurveConfig {
    /// Open-circuit voltage under clean conditions (V)
    pub voc_clean: f64,
    /// Short-circuit current under clean conditions (A)
    pub isc_clean: f64,
    /// Nominal power rating of one string (kW)
    pub nominal_string_power_kw: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default, ToSchema)]
#[serde(default)]
pub struct PerformanceConfig {
    pub thresholds: PerformanceThresholds,
    pub colors: PerformanceColors,
}

/// Lower performance bound (%) of each display band.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub excellent: f64,
    pub good: f64,
    pub moderate: f64,
    pub poor: f64,
    pub critical: f64,
}

/// HSL hues the dashboard paints each band with, plus the flat offline color.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct PerformanceColors {
    pub excellent_hue: u16,
    pub good_hue: u16,
    pub moderate_hue: u16,
    pub poor_hue: u16,
    pub critical_hue: u16,
    pub offline_color: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct DisplayConfig {
    pub decimal_places: u8,
    pub default_selected_day: u32,
}

/// Runtime-updatable subset: exactly the sections that feed the generator.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SimulationUpdate {
    pub simulation: SimulationConfig,
    pub cleaning: CleaningConfig,
    pub soiling: SoilingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_days: default_total_days(),
            total_strings: default_total_strings(),
            base_performance_min: default_base_performance_min(),
            base_performance_max: default_base_performance_max(),
            offline_probability: default_offline_probability(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self { interval_days: default_interval_days() }
    }
}

impl Default for SoilingConfig {
    fn default() -> Self {
        Self {
            nominal_rate_per_day: default_nominal_rate_per_day(),
            daily_accumulation_min: default_daily_accumulation_min(),
            daily_accumulation_max: default_daily_accumulation_max(),
            post_cleaning_min: default_post_cleaning_min(),
            post_cleaning_max: default_post_cleaning_max(),
            max_soiling_loss: default_max_soiling_loss(),
        }
    }
}

impl Default for IvCurveConfig {
    fn default() -> Self {
        Self {
            voc_clean: default_voc_clean(),
            isc_clean: default_isc_clean(),
            nominal_string_power_kw: default_nominal_string_power_kw(),
        }
    }
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            excellent: 95.0,
            good: 85.0,
            moderate: 75.0,
            poor: 65.0,
            critical: 50.0,
        }
    }
}

impl Default for PerformanceColors {
    fn default() -> Self {
        Self {
            excellent_hue: 120,
            good_hue: 90,
            moderate_hue: 60,
            poor_hue: 30,
            critical_hue: 0,
            offline_color: "#9E9E9E".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            default_selected_day: default_selected_day(),
        }
    }
}

/// Replace a non-finite or negative leaf with its documented default.
fn sane(value: f64, default: f64, name: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!("[CONFIG] Invalid value {} for {}, using default {}", value, name, default);
        default
    }
}

/// Swap an inverted min/max pair back into order.
fn ordered(min: f64, max: f64, name: &str) -> (f64, f64) {
    if min <= max {
        (min, max)
    } else {
        tracing::warn!("[CONFIG] {} min {} > max {}, swapping", name, min, max);
        (max, min)
    }
}

impl Configuration {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Configuration = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// The single default-substitution pass. Every numeric leaf the
    /// generator reads is validated here, once, at load time; generation
    /// logic never falls back inline.
    pub fn sanitized(mut self) -> Self {
        let sim_defaults = SimulationConfig::default();
        let soil_defaults = SoilingConfig::default();
        let iv_defaults = IvCurveConfig::default();

        if self.simulation.total_days == 0 {
            tracing::warn!("[CONFIG] simulation.total_days is 0, using default {}", sim_defaults.total_days);
            self.simulation.total_days = sim_defaults.total_days;
        }
        if self.simulation.total_strings == 0 {
            tracing::warn!("[CONFIG] simulation.total_strings is 0, using default {}", sim_defaults.total_strings);
            self.simulation.total_strings = sim_defaults.total_strings;
        }
        if self.cleaning.interval_days == 0 {
            tracing::warn!("[CONFIG] cleaning.interval_days is 0, using default {}", default_interval_days());
            self.cleaning.interval_days = default_interval_days();
        }

        self.simulation.base_performance_min = sane(
            self.simulation.base_performance_min,
            sim_defaults.base_performance_min,
            "simulation.base_performance_min",
        );
        self.simulation.base_performance_max = sane(
            self.simulation.base_performance_max,
            sim_defaults.base_performance_max,
            "simulation.base_performance_max",
        );
        (self.simulation.base_performance_min, self.simulation.base_performance_max) = ordered(
            self.simulation.base_performance_min,
            self.simulation.base_performance_max,
            "simulation.base_performance",
        );
        self.simulation.offline_probability = sane(
            self.simulation.offline_probability,
            sim_defaults.offline_probability,
            "simulation.offline_probability",
        );

        self.soiling.nominal_rate_per_day = sane(
            self.soiling.nominal_rate_per_day,
            soil_defaults.nominal_rate_per_day,
            "soiling.nominal_rate_per_day",
        );
        self.soiling.daily_accumulation_min = sane(
            self.soiling.daily_accumulation_min,
            soil_defaults.daily_accumulation_min,
            "soiling.daily_accumulation_min",
        );
        self.soiling.daily_accumulation_max = sane(
            self.soiling.daily_accumulation_max,
            soil_defaults.daily_accumulation_max,
            "soiling.daily_accumulation_max",
        );
        (self.soiling.daily_accumulation_min, self.soiling.daily_accumulation_max) = ordered(
            self.soiling.daily_accumulation_min,
            self.soiling.daily_accumulation_max,
            "soiling.daily_accumulation",
        );
        self.soiling.post_cleaning_min = sane(
            self.soiling.post_cleaning_min,
            soil_defaults.post_cleaning_min,
            "soiling.post_cleaning_min",
        );
        self.soiling.post_cleaning_max = sane(
            self.soiling.post_cleaning_max,
            soil_defaults.post_cleaning_max,
            "soiling.post_cleaning_max",
        );
        (self.soiling.post_cleaning_min, self.soiling.post_cleaning_max) = ordered(
            self.soiling.post_cleaning_min,
            self.soiling.post_cleaning_max,
            "soiling.post_cleaning",
        );
        self.soiling.max_soiling_loss = sane(
            self.soiling.max_soiling_loss,
            soil_defaults.max_soiling_loss,
            "soiling.max_soiling_loss",
        );

        self.iv_curve.voc_clean = sane(self.iv_curve.voc_clean, iv_defaults.voc_clean, "iv_curve.voc_clean");
        self.iv_curve.isc_clean = sane(self.iv_curve.isc_clean, iv_defaults.isc_clean, "iv_curve.isc_clean");
        self.iv_curve.nominal_string_power_kw = sane(
            self.iv_curve.nominal_string_power_kw,
            iv_defaults.nominal_string_power_kw,
            "iv_curve.nominal_string_power_kw",
        );

        self
    }

    /// Stable hash string over exactly the leaves that affect generation.
    /// Display, performance and server settings are deliberately excluded so
    /// touching them never triggers a regeneration.
    pub fn simulation_hash(&self) -> String {
        serde_json::json!({
            "totalDays": self.simulation.total_days,
            "totalStrings": self.simulation.total_strings,
            "cleaningInterval": self.cleaning.interval_days,
            "dailyAccumulationMin": self.soiling.daily_accumulation_min,
            "dailyAccumulationMax": self.soiling.daily_accumulation_max,
            "postCleaningMin": self.soiling.post_cleaning_min,
            "postCleaningMax": self.soiling.post_cleaning_max,
            "maxSoilingLoss": self.soiling.max_soiling_loss,
            "offlineProbability": self.simulation.offline_probability,
            "basePerformanceMin": self.simulation.base_performance_min,
            "basePerformanceMax": self.simulation.base_performance_max,
        })
        .to_string()
    }

    /// Scheduled cleaning days: day 1, then every `interval_days` after it.
    pub fn cleaning_days(&self) -> Vec<u32> {
        let interval = self.cleaning.interval_days;
        let total = self.simulation.total_days;
        let mut days = vec![1];
        let mut next = 1 + interval;
        while next <= total {
            days.push(next);
            next += interval;
        }
        days
    }

    pub fn is_cleaning_day(&self, day: u32) -> bool {
        // Days are 1-indexed; day 0 is out of schedule, not an underflow.
        day != 0 && (day == 1 || (day - 1) % self.cleaning.interval_days == 0)
    }

    /// Color hue for a performance percentage, per the configured bands.
    pub fn performance_hue(&self, performance: f64) -> u16 {
        let t = &self.performance.thresholds;
        let c = &self.performance.colors;
        if performance >= t.excellent {
            c.excellent_hue
        } else if performance >= t.good {
            c.good_hue
        } else if performance >= t.moderate {
            c.moderate_hue
        } else if performance >= t.poor {
            c.poor_hue
        } else {
            c.critical_hue
        }
    }

    pub fn offline_color(&self) -> &str {
        &self.performance.colors.offline_color
    }
}
