//! Driver for the Sharp GP2Y10 family of optical dust sensors
//! (GP2Y1010AU0F, GP2Y1014AU0F) built on top of `embedded-hal` primitives.
//!
//! The sensor exposes an analog output whose voltage tracks dust density,
//! but a valid reading requires pulsing the internal IR emitter with exact
//! datasheet timing. This crate drives that pulse protocol through a small
//! platform abstraction ([`pal::Pal`]), averages repeated samples to tame
//! measurement noise, and applies a linear [`calibration`] model to report
//! µg/m³.
//!
//! # Examples
//!
//! ```
//! use gp2y10_driver::pal::{AdcConfig, GpioAdc};
//! use gp2y10_driver::DustSensor;
//! # use embedded_hal_mock::adc::{Mock, MockChan0, Transaction};
//! # use embedded_hal_mock::delay::MockNoop;
//! # use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTransaction};
//! # let adc = Mock::new(&[Transaction::read(0, 614u16)]);
//! # let led = PinMock::new(&[
//! #     PinTransaction::set(State::High),
//! #     PinTransaction::set(State::Low),
//! #     PinTransaction::set(State::High),
//! # ]);
//! # let delay = MockNoop::new();
//!
//! // `adc`, `led` and `delay` come from the board's HAL.
//! let pal = GpioAdc::new(adc, MockChan0, led, delay, AdcConfig::default());
//! let mut sensor = DustSensor::new(pal, 1)?;
//!
//! let dust = sensor.measure()?;
//! assert!(dust > 0.0);
//! # Ok::<(), gp2y10_driver::Error<embedded_hal_mock::MockError, embedded_hal_mock::MockError>>(())
//! ```
#![cfg_attr(not(test), no_std)]

pub mod calibration;
mod error;
pub mod pal;

pub use crate::error::Error;

use crate::calibration::Calibration;
use crate::pal::{LedState, Pal};

/// Settle time between firing the emitter and sampling the output, per the
/// datasheet pulse timing.
pub const SAMPLING_DELAY_US: u32 = 280;
/// Minimum remaining emitter-on time after the sample.
pub const POST_READ_DELAY_US: u32 = 40;
/// Recovery time between samples with the emitter back at idle.
pub const RECOVERY_DELAY_MS: u32 = 10;

/// Samples averaged per measurement when none is specified.
pub const DEFAULT_REPEATS: u8 = 5;

/// A GP2Y10 dust sensor on some platform `P`.
///
/// Owns its platform resources, so independent sensors can coexist in one
/// process. All operations are blocking; a full [`measure`](DustSensor::measure)
/// takes roughly `repeats x 10.3 ms`.
pub struct DustSensor<P> {
    pal: P,
    repeats: u8,
    calibration: Calibration,
    last_concentration: f32,
}

impl<P> DustSensor<P>
where
    P: Pal,
{
    /// Create a driver over `pal` with the default datasheet calibration.
    ///
    /// Drives the emitter line to idle. A `repeats` of zero falls back to
    /// [`DEFAULT_REPEATS`].
    pub fn new(pal: P, repeats: u8) -> Result<Self, Error<P::PinError, P::AdcError>> {
        DustSensor::with_calibration(pal, repeats, Calibration::default())
    }

    /// Create a driver with a caller-supplied calibration fit.
    pub fn with_calibration(
        mut pal: P,
        repeats: u8,
        calibration: Calibration,
    ) -> Result<Self, Error<P::PinError, P::AdcError>> {
        pal.set_led(LedState::Off).map_err(Error::Pin)?;
        Ok(DustSensor {
            pal,
            repeats: if repeats == 0 { DEFAULT_REPEATS } else { repeats },
            calibration,
            last_concentration: 0.0,
        })
    }

    /// Change the number of samples averaged per measurement.
    ///
    /// Zero is rejected: it would make [`measure`](DustSensor::measure)
    /// divide by zero.
    pub fn set_repeat_count(&mut self, repeats: u8) -> Result<(), Error<P::PinError, P::AdcError>> {
        if repeats == 0 {
            return Err(Error::InvalidRepeatCount);
        }
        self.repeats = repeats;
        Ok(())
    }

    /// The most recent concentration result in µg/m³, zero before the first
    /// measurement.
    pub fn last_concentration(&self) -> f32 {
        self.last_concentration
    }

    /// Take one raw voltage sample in millivolts using the emitter pulse
    /// protocol.
    ///
    /// The sequence and durations are the sensor's electrical contract:
    /// emitter on, 280 µs settle, sample, 40 µs hold, emitter off, 10 ms
    /// recovery. Reordering or shortening any step invalidates the optical
    /// measurement.
    pub fn sample_voltage(&mut self) -> Result<f32, Error<P::PinError, P::AdcError>> {
        self.pal.set_led(LedState::On).map_err(Error::Pin)?;
        self.pal.delay_us(SAMPLING_DELAY_US);
        let millivolts = self.pal.read_millivolts().map_err(Error::Adc)?;
        self.pal.delay_us(POST_READ_DELAY_US);
        self.pal.set_led(LedState::Off).map_err(Error::Pin)?;
        self.pal.delay_ms(RECOVERY_DELAY_MS);
        Ok(millivolts)
    }

    /// Measure the dust concentration in µg/m³, averaging the configured
    /// number of samples.
    pub fn measure(&mut self) -> Result<f32, Error<P::PinError, P::AdcError>> {
        let mut sum = 0.0f32;
        for _ in 0..self.repeats {
            sum += self.sample_voltage()?;
        }
        let average = sum / f32::from(self.repeats);
        Ok(self.store(self.calibration.concentration(average)))
    }

    /// Measure the dust concentration from a single sample.
    ///
    /// Noisier than [`measure`](DustSensor::measure) but an order of
    /// magnitude faster, for high-frequency polling.
    pub fn measure_single(&mut self) -> Result<f32, Error<P::PinError, P::AdcError>> {
        let millivolts = self.sample_voltage()?;
        Ok(self.store(self.calibration.concentration(millivolts)))
    }

    /// Release the platform resources.
    pub fn free(self) -> P {
        self.pal
    }

    fn store(&mut self, concentration: f32) -> f32 {
        self.last_concentration = concentration;
        concentration
    }
}
