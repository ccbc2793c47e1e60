/// ============================================================
///  Synthetic soiling model generator
///
///  Produces the full SoilingModelData snapshot for one
///  configuration: per-string baselines, a daily time series of
///  soiling / cleaning / online-offline state, and the derived
///  array-level aggregates taken from the latest day.
///
///  Determinism contract: the PRNG is seeded from the hash of the
///  simulation-relevant configuration string, and every draw
///  happens in a fixed order: per string, the offline draw comes
///  before the soiling draw; per day, the cleaning-gain draw is
///  consumed only on cleaning days while the reference draw is
///  always consumed; one final draw yields the fault count. Same
///  configuration, byte-identical snapshot, across restarts.
/// ============================================================

use crate::config::Configuration;
use crate::error::GenerationError;
use crate::models::soiling::{
    ArrayPerformance, CleaningUnitStatus, DailyData, SoilingModelData, SoilingModelParameter,
    StringDailyData, StringPerformance, StringStatus,
};
use crate::services::seeded_random::SeededRandom;

/// Generate a snapshot for `config`, seeded from `config_hash` (normally
/// `config.simulation_hash()`). The input configuration is not mutated; the
/// snapshot is owned by the caller and meant to be treated as immutable.
pub fn generate(
    config: &Configuration,
    config_hash: &str,
) -> Result<SoilingModelData, GenerationError> {
    validate(config)?;

    let mut rng = SeededRandom::from_str_seed(config_hash);

    let total_days = config.simulation.total_days;
    let total_strings = config.simulation.total_strings as usize;
    let cleaning_interval = config.cleaning.interval_days;
    let soiling = &config.soiling;
    let simulation = &config.simulation;

    // Baseline performance, one draw per string, strictly in index order.
    let strings: Vec<StringPerformance> = (1..=total_strings)
        .map(|i| StringPerformance {
            id: format!("string-{}", i),
            name: format!("String {}", i),
            performance: rng
                .next_float(simulation.base_performance_min, simulation.base_performance_max),
            status: StringStatus::Online,
        })
        .collect();

    // Running soiling accumulator per string, carried across days.
    let mut string_soiling = vec![0.0_f64; total_strings];

    let mut daily_data: Vec<DailyData> = Vec::with_capacity(total_days as usize);

    for day in 1..=total_days {
        let is_cleaning_day = config.is_cleaning_day(day);

        let string_data: Vec<StringDailyData> = strings
            .iter()
            .enumerate()
            .map(|(index, string)| {
                // Offline draw first, soiling draw second; the interleaving
                // is part of the deterministic sequence.
                let is_offline = rng.next() < simulation.offline_probability;

                if is_cleaning_day {
                    string_soiling[index] =
                        rng.next_float(soiling.post_cleaning_min, soiling.post_cleaning_max);
                } else {
                    let daily_increase = rng
                        .next_float(soiling.daily_accumulation_min, soiling.daily_accumulation_max);
                    string_soiling[index] =
                        (string_soiling[index] + daily_increase).min(soiling.max_soiling_loss);
                }

                StringDailyData {
                    string_id: string.id.clone(),
                    soiling_percentage: string_soiling[index],
                    is_offline,
                }
            })
            .collect();

        let online_units = string_data.iter().filter(|s| !s.is_offline).count() as u32;
        let avg_soiling = if online_units > 0 {
            string_data
                .iter()
                .filter(|s| !s.is_offline)
                .map(|s| s.soiling_percentage)
                .sum::<f64>()
                / online_units as f64
        } else {
            0.0
        };

        // 1-3% gain, but only cleaning days consume a draw for it. The
        // reference draw (95-97%) is consumed on every day.
        let cleaning_gain = if is_cleaning_day { rng.next_float(1.0, 3.0) } else { 0.0 };
        let soiling_reference = rng.next_float(95.0, 97.0);
        let avg_array_soiling_ratio = soiling_reference + cleaning_gain;

        let days_since_clean = if is_cleaning_day { 0 } else { (day - 1) % cleaning_interval };

        daily_data.push(DailyData {
            day,
            daily_soiling: avg_soiling,
            soiling_reference,
            avg_array_soiling_ratio,
            soiling_loss: avg_soiling,
            cleaning_gain,
            days_since_clean,
            cleaning_scheduled: is_cleaning_day,
            online_units,
            total_units: total_strings as u32,
            offline: total_strings as u32 - online_units,
            string_data,
        });
    }

    // total_days >= 1 after sanitize, so the series is never empty.
    let latest = daily_data
        .last()
        .ok_or(GenerationError::InvalidNumericField {
            field: "simulation.total_days",
            value: 0.0,
        })?;

    let array_performance = ArrayPerformance {
        dirty: latest.soiling_reference,
        cleaning_gain: latest.cleaning_gain,
        residual_loss: 100.0 - latest.avg_array_soiling_ratio,
    };

    let cleaning_unit_status = CleaningUnitStatus {
        online: latest.online_units,
        offline: latest.offline,
        total: total_strings as u32,
        cleaning: u32::from(latest.cleaning_scheduled),
        // 0-2 faults, one trailing draw
        faults: rng.next_int(0, 2) as u32,
    };

    let parameters = vec![
        SoilingModelParameter {
            name: "Nominal Soiling Rate".to_string(),
            current_value: soiling.nominal_rate_per_day,
            units: "%/day".to_string(),
        },
        SoilingModelParameter {
            name: "Cleaning Interval".to_string(),
            current_value: cleaning_interval as f64,
            units: "days".to_string(),
        },
        SoilingModelParameter {
            name: "Average Soiling Loss".to_string(),
            current_value: latest.soiling_loss,
            units: "%".to_string(),
        },
    ];

    Ok(SoilingModelData {
        parameters,
        strings,
        cleaning_unit_status,
        array_performance,
        daily_data,
    })
}

/// Defense at the public seam. A configuration that went through
/// `Configuration::sanitized()` always passes.
fn validate(config: &Configuration) -> Result<(), GenerationError> {
    let checks: [(&'static str, f64); 7] = [
        ("simulation.base_performance_min", config.simulation.base_performance_min),
        ("simulation.base_performance_max", config.simulation.base_performance_max),
        ("simulation.offline_probability", config.simulation.offline_probability),
        ("soiling.daily_accumulation_min", config.soiling.daily_accumulation_min),
        ("soiling.daily_accumulation_max", config.soiling.daily_accumulation_max),
        ("soiling.post_cleaning_min", config.soiling.post_cleaning_min),
        ("soiling.max_soiling_loss", config.soiling.max_soiling_loss),
    ];
    for (field, value) in checks {
        if !value.is_finite() || value < 0.0 {
            return Err(GenerationError::InvalidNumericField { field, value });
        }
    }
    if config.cleaning.interval_days == 0 {
        return Err(GenerationError::InvalidNumericField {
            field: "cleaning.interval_days",
            value: 0.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn generate_default() -> SoilingModelData {
        let config = Configuration::default();
        generate(&config, &config.simulation_hash()).unwrap()
    }

    #[test]
    fn test_deterministic_across_calls() {
        let a = generate_default();
        let b = generate_default();
        assert_eq!(a, b, "same configuration must yield identical snapshots");
    }

    #[test]
    fn test_day_coverage_contiguous() {
        let data = generate_default();
        assert_eq!(data.daily_data.len(), 60);
        for (i, d) in data.daily_data.iter().enumerate() {
            assert_eq!(d.day, i as u32 + 1, "days must be 1..=total_days with no gaps");
        }
    }

    #[test]
    fn test_cleaning_schedule() {
        let data = generate_default();
        for d in &data.daily_data {
            let expected = d.day == 1 || (d.day - 1) % 14 == 0;
            assert_eq!(d.cleaning_scheduled, expected, "day {}", d.day);
            if d.cleaning_scheduled {
                assert_eq!(d.days_since_clean, 0);
                assert!(
                    (1.0..3.0).contains(&d.cleaning_gain),
                    "cleaning gain {} out of [1,3) on day {}",
                    d.cleaning_gain,
                    d.day
                );
            } else {
                assert_eq!(d.cleaning_gain, 0.0);
            }
        }
    }

    #[test]
    fn test_online_offline_partition() {
        let data = generate_default();
        for d in &data.daily_data {
            assert_eq!(d.online_units + d.offline, d.total_units);
            assert_eq!(d.total_units, 20);
            assert_eq!(d.string_data.len(), 20);
        }
    }

    #[test]
    fn test_soiling_bounds() {
        let data = generate_default();
        for d in &data.daily_data {
            for s in &d.string_data {
                assert!(
                    (0.0..=8.0).contains(&s.soiling_percentage),
                    "soiling {} out of [0, max] for {} on day {}",
                    s.soiling_percentage,
                    s.string_id,
                    d.day
                );
            }
        }
    }

    #[test]
    fn test_string_baselines() {
        let data = generate_default();
        assert_eq!(data.strings.len(), 20);
        assert_eq!(data.strings[0].id, "string-1");
        assert_eq!(data.strings[19].id, "string-20");
        assert_eq!(data.strings[4].name, "String 5");
        for s in &data.strings {
            assert!((64.3..99.1).contains(&s.performance), "baseline {} out of range", s.performance);
            assert_eq!(s.status, StringStatus::Online);
        }
    }

    #[test]
    fn test_soiling_reference_band() {
        let data = generate_default();
        for d in &data.daily_data {
            assert!(
                (95.0..97.0).contains(&d.soiling_reference),
                "reference {} out of [95,97) on day {}",
                d.soiling_reference,
                d.day
            );
        }
    }

    #[test]
    fn test_aggregates_from_latest_day() {
        let data = generate_default();
        let latest = data.daily_data.last().unwrap();
        assert_eq!(data.array_performance.dirty, latest.soiling_reference);
        assert_eq!(data.array_performance.cleaning_gain, latest.cleaning_gain);
        assert_eq!(data.array_performance.residual_loss, 100.0 - latest.avg_array_soiling_ratio);
        assert_eq!(data.cleaning_unit_status.online, latest.online_units);
        assert_eq!(data.cleaning_unit_status.offline, latest.offline);
        assert_eq!(data.cleaning_unit_status.total, 20);
        assert!(data.cleaning_unit_status.faults <= 2);
    }

    #[test]
    fn test_parameters_block() {
        let data = generate_default();
        assert_eq!(data.parameters.len(), 3);
        assert_eq!(data.parameters[0].name, "Nominal Soiling Rate");
        assert_eq!(data.parameters[0].current_value, 0.15);
        assert_eq!(data.parameters[1].name, "Cleaning Interval");
        assert_eq!(data.parameters[1].current_value, 14.0);
        assert_eq!(data.parameters[2].name, "Average Soiling Loss");
    }

    #[test]
    fn test_hash_changes_output() {
        let config = Configuration::default();
        let a = generate(&config, "hash-a").unwrap();
        let b = generate(&config, "hash-b").unwrap();
        assert_ne!(a, b, "different hashes should produce different draws");
    }

    // With min == max ranges the accumulation is randomness-free: day 1
    // (cleaning) resets to 0.3, then +0.5 per day.
    #[test]
    fn test_fixed_range_scenario() {
        let mut config = Configuration::default();
        config.simulation.total_days = 3;
        config.simulation.total_strings = 2;
        config.simulation.base_performance_min = 90.0;
        config.simulation.base_performance_max = 90.0;
        config.simulation.offline_probability = 0.0;
        config.cleaning.interval_days = 14;
        config.soiling.daily_accumulation_min = 0.5;
        config.soiling.daily_accumulation_max = 0.5;
        config.soiling.post_cleaning_min = 0.3;
        config.soiling.post_cleaning_max = 0.3;
        config.soiling.max_soiling_loss = 8.0;

        let data = generate(&config, "fixed-hash").unwrap();
        assert_eq!(data.daily_data.len(), 3);

        let expected = [0.3, 0.8, 1.3];
        for (d, want) in data.daily_data.iter().zip(expected) {
            assert_eq!(d.online_units, 2, "no string may go offline on day {}", d.day);
            for s in &d.string_data {
                assert!(
                    (s.soiling_percentage - want).abs() < 1e-12,
                    "day {} {}: soiling {} != {}",
                    d.day,
                    s.string_id,
                    s.soiling_percentage,
                    want
                );
            }
        }
        for s in &data.strings {
            assert_eq!(s.performance, 90.0);
        }
    }

    #[test]
    fn test_all_strings_offline_averages_to_zero() {
        let mut config = Configuration::default();
        config.simulation.total_days = 5;
        config.simulation.total_strings = 3;
        config.simulation.offline_probability = 1.0;

        let data = generate(&config, "all-offline").unwrap();
        for d in &data.daily_data {
            assert_eq!(d.online_units, 0, "day {}", d.day);
            assert_eq!(d.offline, 3);
            assert_eq!(d.daily_soiling, 0.0, "no online strings means no average on day {}", d.day);
            assert_eq!(d.soiling_loss, 0.0);
            assert!(d.string_data.iter().all(|s| s.is_offline));
        }
    }

    #[test]
    fn test_clamped_to_max_soiling_loss() {
        let mut config = Configuration::default();
        config.simulation.total_days = 30;
        config.simulation.total_strings = 1;
        config.simulation.offline_probability = 0.0;
        config.cleaning.interval_days = 100; // never cleans after day 1
        config.soiling.daily_accumulation_min = 1.0;
        config.soiling.daily_accumulation_max = 1.0;
        config.soiling.max_soiling_loss = 5.0;

        let data = generate(&config, "clamp").unwrap();
        let last = data.daily_data.last().unwrap();
        assert_eq!(last.string_data[0].soiling_percentage, 5.0);
    }

    #[test]
    fn test_invalid_field_rejected() {
        let mut config = Configuration::default();
        config.soiling.max_soiling_loss = f64::INFINITY;
        let err = generate(&config, "h").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidNumericField { field, .. }
            if field == "soiling.max_soiling_loss"));
    }
}
