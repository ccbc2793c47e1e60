//! Pure query accessors over a generated snapshot. Nothing here mutates the
//! snapshot or draws randomness; every answer is derivable from the stored
//! daily series.

use crate::models::soiling::{
    ArrayPerformance, CleaningUnitStatus, DailyData, SoilingModelData, SoilingModelParameter,
    StringPerformance, StringStatus,
};

impl SoilingModelData {
    /// Record for a single day, or `None` when out of range.
    pub fn data_for_day(&self, day: u32) -> Option<&DailyData> {
        // Days are contiguous and 1-indexed, so this is an index lookup.
        if day == 0 {
            return None;
        }
        self.daily_data.get(day as usize - 1)
    }

    /// Prefix of the series up to and including `day`.
    pub fn daily_data_up_to(&self, day: u32) -> &[DailyData] {
        let end = (day as usize).min(self.daily_data.len());
        &self.daily_data[..end]
    }

    /// Highest simulated day number (0 for an empty series).
    pub fn max_day(&self) -> u32 {
        self.daily_data.last().map(|d| d.day).unwrap_or(0)
    }

    pub fn parameter_by_name(&self, name: &str) -> Option<&SoilingModelParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Per-string performance on one day. Offline strings report 0 with an
    /// explicit Offline status; online strings report
    /// `baseline * (1 - soiling_pct / 100)`. Out-of-range days fall back to
    /// the stored baselines.
    pub fn string_performance_for_day(&self, day: u32) -> Vec<StringPerformance> {
        let Some(day_data) = self.data_for_day(day) else {
            return self.strings.clone();
        };

        self.strings
            .iter()
            .map(|string| {
                let daily = day_data.string_data.iter().find(|sd| sd.string_id == string.id);
                match daily {
                    Some(sd) if sd.is_offline => StringPerformance {
                        performance: 0.0,
                        status: StringStatus::Offline,
                        ..string.clone()
                    },
                    Some(sd) => StringPerformance {
                        performance: string.performance * (1.0 - sd.soiling_percentage / 100.0),
                        status: StringStatus::Online,
                        ..string.clone()
                    },
                    None => string.clone(),
                }
            })
            .collect()
    }

    /// Unit status a given day; the fault count always comes from the
    /// snapshot-level status (it is drawn once, after the last day).
    pub fn cleaning_unit_status_for_day(&self, day: u32) -> CleaningUnitStatus {
        match self.data_for_day(day) {
            Some(d) => CleaningUnitStatus {
                online: d.online_units,
                offline: d.total_units - d.online_units,
                total: d.total_units,
                cleaning: u32::from(d.cleaning_scheduled),
                faults: self.cleaning_unit_status.faults,
            },
            None => self.cleaning_unit_status.clone(),
        }
    }

    pub fn array_performance_for_day(&self, day: u32) -> ArrayPerformance {
        match self.data_for_day(day) {
            Some(d) => ArrayPerformance {
                dirty: d.soiling_reference,
                cleaning_gain: d.cleaning_gain,
                residual_loss: 100.0 - d.avg_array_soiling_ratio,
            },
            None => self.array_performance.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Configuration;
    use crate::models::soiling::StringStatus;
    use crate::services::soiling_model::generate;

    fn snapshot() -> crate::models::soiling::SoilingModelData {
        let config = Configuration::default();
        generate(&config, &config.simulation_hash()).unwrap()
    }

    #[test]
    fn test_data_for_day_lookup() {
        let data = snapshot();
        assert_eq!(data.data_for_day(1).unwrap().day, 1);
        assert_eq!(data.data_for_day(60).unwrap().day, 60);
        assert!(data.data_for_day(0).is_none());
        assert!(data.data_for_day(61).is_none());
    }

    #[test]
    fn test_daily_data_up_to() {
        let data = snapshot();
        assert_eq!(data.daily_data_up_to(10).len(), 10);
        assert_eq!(data.daily_data_up_to(10).last().unwrap().day, 10);
        assert_eq!(data.daily_data_up_to(0).len(), 0);
        assert_eq!(data.daily_data_up_to(999).len(), 60);
    }

    #[test]
    fn test_max_day() {
        assert_eq!(snapshot().max_day(), 60);
    }

    #[test]
    fn test_parameter_by_name() {
        let data = snapshot();
        assert!(data.parameter_by_name("Cleaning Interval").is_some());
        assert!(data.parameter_by_name("No Such Parameter").is_none());
    }

    #[test]
    fn test_string_performance_applies_soiling() {
        let data = snapshot();
        let day = 20;
        let day_data = data.data_for_day(day).unwrap();
        let per_day = data.string_performance_for_day(day);
        assert_eq!(per_day.len(), data.strings.len());

        for (baseline, effective) in data.strings.iter().zip(&per_day) {
            let sd = day_data
                .string_data
                .iter()
                .find(|sd| sd.string_id == baseline.id)
                .unwrap();
            if sd.is_offline {
                assert_eq!(effective.performance, 0.0);
                assert_eq!(effective.status, StringStatus::Offline);
            } else {
                let expected = baseline.performance * (1.0 - sd.soiling_percentage / 100.0);
                assert_eq!(effective.performance, expected);
                assert_eq!(effective.status, StringStatus::Online);
                assert!(effective.performance <= baseline.performance);
            }
        }
    }

    #[test]
    fn test_string_performance_out_of_range_falls_back() {
        let data = snapshot();
        assert_eq!(data.string_performance_for_day(999), data.strings);
    }

    #[test]
    fn test_per_day_status_and_array() {
        let data = snapshot();
        let d = data.data_for_day(15).unwrap().clone();
        let status = data.cleaning_unit_status_for_day(15);
        assert_eq!(status.online, d.online_units);
        assert_eq!(status.online + status.offline, status.total);
        assert_eq!(status.cleaning, 1, "day 15 is a cleaning day at interval 14");
        assert_eq!(status.faults, data.cleaning_unit_status.faults);

        let array = data.array_performance_for_day(15);
        assert_eq!(array.dirty, d.soiling_reference);
        assert_eq!(array.residual_loss, 100.0 - d.avg_array_soiling_ratio);
    }

    #[test]
    fn test_out_of_range_day_returns_snapshot_aggregates() {
        let data = snapshot();
        assert_eq!(data.cleaning_unit_status_for_day(999), data.cleaning_unit_status);
        assert_eq!(data.array_performance_for_day(999), data.array_performance);
    }
}
