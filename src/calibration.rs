//! Linear voltage-to-concentration model.
//!
//! The GP2Y10's output voltage rises roughly linearly with dust density up to
//! `VMAX`; the datasheet curve is summarised by a sensitivity `K` (volts per
//! mg/m³) and a zero-dust offset voltage `VOC`.

/// Sensitivity of the output curve, volts per mg/m³.
pub const K: f32 = 5.0;
/// Output voltage at zero dust density, volts.
pub const VOC: f32 = 0.6;
/// Upper end of the linear output range, volts.
pub const VMAX: f32 = 3.5;

/// Linear calibration parameters, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Concentration per millivolt of sensor output, µg/m³/mV.
    pub slope: f32,
    /// Concentration axis intercept, mg/m³ (volt-referenced, see
    /// [`concentration`](Calibration::concentration)).
    pub intercept: f32,
    /// End of the linear range in millivolts. Readings beyond this sit on the
    /// flat part of the datasheet curve; the conversion does not clamp to it.
    pub max_linear_mv: f32,
}

impl Calibration {
    /// Derive slope and intercept from datasheet reference constants:
    /// `k` in V per mg/m³, `voc` and `vmax` in volts.
    pub fn from_reference(k: f32, voc: f32, vmax: f32) -> Self {
        Calibration {
            slope: 1.0 / k,
            intercept: -voc / k,
            max_linear_mv: 1000.0 * vmax,
        }
    }

    /// Convert a sensor output voltage in millivolts to a dust concentration
    /// in µg/m³.
    ///
    /// The intercept is expressed in volt-referenced units, hence the `1000x`
    /// scaling against the millivolt-based slope term. Voltages below the
    /// zero-dust offset are measurement noise and clamp to zero rather than
    /// reporting a negative concentration.
    pub fn concentration(&self, millivolts: f32) -> f32 {
        let conc = self.slope * millivolts + 1000.0 * self.intercept;
        if conc < 0.0 {
            0.0
        } else {
            conc
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration::from_reference(K, VOC, VMAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_constants() {
        let cal = Calibration::default();
        assert!((cal.slope - 0.2).abs() < 1e-6);
        assert!((cal.intercept - -0.12).abs() < 1e-6);
        assert!((cal.max_linear_mv - 3500.0).abs() < 1e-3);
    }

    #[test]
    fn concentration_above_baseline() {
        let cal = Calibration::default();
        // 0.2 * 1200 + 1000 * -0.12 = 120
        assert!((cal.concentration(1200.0) - 120.0).abs() < 1e-3);
    }

    #[test]
    fn concentration_at_baseline_is_zero() {
        let cal = Calibration::default();
        assert!(cal.concentration(1000.0 * VOC).abs() < 1e-3);
    }

    #[test]
    fn below_baseline_clamps_to_zero() {
        let cal = Calibration::default();
        assert_eq!(cal.concentration(400.0), 0.0);
        assert_eq!(cal.concentration(0.0), 0.0);
    }

    #[test]
    fn custom_fit() {
        let cal = Calibration::from_reference(4.0, 0.4, 3.0);
        assert!((cal.slope - 0.25).abs() < 1e-6);
        assert!((cal.intercept - -0.1).abs() < 1e-6);
        assert!((cal.concentration(800.0) - 100.0).abs() < 1e-3);
    }
}
