/// ============================================================
///  IV / PV curve approximation for one string
///
///  Maps an effective performance percentage onto a pair of
///  current-voltage sweeps (clean reference vs. soiled):
///   1. Soiling scales short-circuit current linearly and trims
///      open-circuit voltage slightly
///   2. 101 evenly spaced voltage samples per sweep, with
///      I = Isc * (1 - (V/Voc)^3) * (1 - 0.1 * V/Voc)
///   3. Maximum power point and fill factor per sweep
///
///  Illustrative single-diode-flavored shape, not a calibrated
///  PV model. Deterministic; no randomness anywhere.
/// ============================================================

use crate::config::IvCurveConfig;
use crate::models::soiling::{IvCurveData, IvCurvePoint, IvCurveSummary};

const NUM_INTERVALS: usize = 100;

/// Generate clean and soiled IV/PV sweeps for an effective performance
/// percentage. `performance_pct` outside `[0, 100]` is clamped; the function
/// is total for finite inputs. `config` overrides the clean Voc/Isc
/// references (defaults 800 V / 450 A).
///
/// The nominal string power rating deliberately does not appear here: it
/// never shapes the sweeps, only Voc and Isc do. Callers that need the
/// rating alongside a curve report it separately (see
/// `StringIvCurveResponse.nominal_power_kw`).
pub fn generate_iv_curve(performance_pct: f64, config: Option<&IvCurveConfig>) -> IvCurveData {
    let defaults = IvCurveConfig::default();
    let reference = config.unwrap_or(&defaults);

    let voc_clean = reference.voc_clean;
    let isc_clean = reference.isc_clean;

    // Soiling mostly suppresses current; voltage only sags a little.
    let soiling_factor = (performance_pct / 100.0).clamp(0.0, 1.0);
    let isc_soiled = isc_clean * soiling_factor;
    let voc_soiled = voc_clean * (0.95 + soiling_factor * 0.05);

    let clean = sweep(voc_clean, isc_clean);
    let soiled = sweep(voc_soiled, isc_soiled);

    let clean_summary = summarize(&clean, voc_clean, isc_clean);
    let soiled_summary = summarize(&soiled, voc_soiled, isc_soiled);

    IvCurveData {
        clean,
        soiled,
        clean_summary,
        soiled_summary,
    }
}

/// One sweep of 101 samples from 0 to Voc, one decimal of precision per
/// coordinate. Power is reported in kW.
fn sweep(voc: f64, isc: f64) -> Vec<IvCurvePoint> {
    (0..=NUM_INTERVALS)
        .map(|i| {
            let v = voc * i as f64 / NUM_INTERVALS as f64;
            let normalized = if voc > 0.0 { v / voc } else { 0.0 };
            let current = isc * (1.0 - normalized.powi(3)) * (1.0 - 0.1 * normalized);
            let power = v * current / 1000.0;
            IvCurvePoint {
                voltage: round1(v),
                current: round1(current),
                power: round1(power),
            }
        })
        .collect()
}

/// Maximum power point (first sample on ties) and fill factor.
fn summarize(points: &[IvCurvePoint], voc: f64, isc: f64) -> IvCurveSummary {
    let mpp = points
        .iter()
        .fold(None::<&IvCurvePoint>, |best, p| match best {
            Some(b) if p.power > b.power => Some(p),
            None => Some(p),
            _ => best,
        })
        .copied()
        .unwrap_or(IvCurvePoint { voltage: 0.0, current: 0.0, power: 0.0 });

    let theoretical_kw = voc * isc / 1000.0;
    let fill_factor = if theoretical_kw > 0.0 { mpp.power / theoretical_kw } else { 0.0 };

    IvCurveSummary {
        voc,
        isc,
        vmp: mpp.voltage,
        imp: mpp.current,
        pmax: mpp.power,
        fill_factor,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_count_and_voltage_span() {
        let curve = generate_iv_curve(85.0, None);
        assert_eq!(curve.clean.len(), 101);
        assert_eq!(curve.soiled.len(), 101);
        assert_eq!(curve.clean[0].voltage, 0.0);
        assert_eq!(curve.clean[100].voltage, 800.0);
        assert_eq!(curve.soiled[0].voltage, 0.0);
        assert_eq!(curve.soiled[100].voltage, round1(curve.soiled_summary.voc));
    }

    #[test]
    fn test_full_performance_matches_clean() {
        let curve = generate_iv_curve(100.0, None);
        assert_eq!(curve.soiled_summary.isc, curve.clean_summary.isc);
        assert_eq!(curve.soiled_summary.voc, curve.clean_summary.voc);
        assert_eq!(curve.clean, curve.soiled);
    }

    #[test]
    fn test_zero_performance_kills_current() {
        let curve = generate_iv_curve(0.0, None);
        assert_eq!(curve.soiled_summary.isc, 0.0);
        assert!(curve.soiled.iter().all(|p| p.current == 0.0));
        // Voc only sags to 95%
        assert_eq!(curve.soiled_summary.voc, 800.0 * 0.95);
    }

    #[test]
    fn test_performance_clamped_outside_range() {
        let over = generate_iv_curve(150.0, None);
        let full = generate_iv_curve(100.0, None);
        assert_eq!(over, full);

        let under = generate_iv_curve(-20.0, None);
        let zero = generate_iv_curve(0.0, None);
        assert_eq!(under, zero);
    }

    #[test]
    fn test_current_monotonic_non_increasing() {
        let curve = generate_iv_curve(92.0, None);
        for pair in curve.clean.windows(2) {
            assert!(
                pair[1].current <= pair[0].current,
                "current should not rise with voltage: {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_short_and_open_circuit_endpoints() {
        let curve = generate_iv_curve(100.0, None);
        // At V=0 the full Isc flows; at Voc the current term collapses to
        // Isc * (1-1) * (1-0.1) = 0.
        assert_eq!(curve.clean[0].current, 450.0);
        assert_eq!(curve.clean[100].current, 0.0);
        assert_eq!(curve.clean[0].power, 0.0);
    }

    #[test]
    fn test_fill_factor_sane() {
        let curve = generate_iv_curve(100.0, None);
        let s = curve.clean_summary;
        assert!(s.pmax > 0.0);
        assert!(s.fill_factor > 0.0 && s.fill_factor < 1.0, "fill factor {} out of (0,1)", s.fill_factor);
        assert_eq!(s.fill_factor, s.pmax / (s.voc * s.isc / 1000.0));
    }

    #[test]
    fn test_config_overrides_references() {
        let config = IvCurveConfig {
            voc_clean: 600.0,
            isc_clean: 300.0,
            ..IvCurveConfig::default()
        };
        let curve = generate_iv_curve(100.0, Some(&config));
        assert_eq!(curve.clean_summary.voc, 600.0);
        assert_eq!(curve.clean_summary.isc, 300.0);
        assert_eq!(curve.clean[100].voltage, 600.0);
    }

    #[test]
    fn test_deterministic() {
        let a = generate_iv_curve(73.4, None);
        let b = generate_iv_curve(73.4, None);
        assert_eq!(a, b);
    }
}
