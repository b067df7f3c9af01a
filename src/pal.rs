//! Platform abstraction for the sensor's three electrical resources: the IR
//! emitter drive line, a blocking delay source, and the analog input.
//!
//! Measurement logic talks only to [`Pal`]; [`GpioAdc`] is the one concrete
//! implementation, built from `embedded-hal` primitives. Each sensor owns its
//! own `Pal` instance, so several sensors can coexist in one process as long
//! as their measurement calls are not interleaved.

use core::marker::PhantomData;
use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;
use nb::block;

/// Logical state of the sensor's internal IR emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    /// Emitter firing; the photodiode output is valid after the settle time.
    On,
    /// Emitter idle between samples.
    Off,
}

/// Platform primitives required by the measurement protocol.
///
/// All methods are synchronous and blocking. `read_millivolts` performs a
/// single conversion and no timing of its own; the pulse timing around it is
/// the caller's responsibility.
pub trait Pal {
    type PinError;
    type AdcError;

    /// Set the emitter drive line.
    fn set_led(&mut self, state: LedState) -> Result<(), Self::PinError>;

    /// Block for `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Run one ADC conversion on the sensor output and scale it to
    /// millivolts.
    fn read_millivolts(&mut self) -> Result<f32, Self::AdcError>;
}

/// ADC reference voltage and resolution, used to scale raw counts to
/// millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// Reference voltage in millivolts.
    pub vref_mv: u32,
    /// Converter resolution in bits.
    pub resolution_bits: u8,
}

impl AdcConfig {
    fn mv_per_count(&self) -> f32 {
        // e.g. 5000 mV over 10 bits: 5000/1024 = 4.8828 mV per count
        self.vref_mv as f32 / (1u32 << self.resolution_bits) as f32
    }
}

impl Default for AdcConfig {
    /// 5 V reference, 10-bit conversion (classic AVR boards).
    fn default() -> Self {
        AdcConfig {
            vref_mv: 5000,
            resolution_bits: 10,
        }
    }
}

/// [`Pal`] implementation over `embedded-hal` GPIO, one-shot ADC and delay
/// traits.
///
/// `led` drives the GP2Y10's LED terminal through the usual transistor
/// stage, which makes it active low: the emitter fires when the line is
/// driven low. The pins are expected to arrive already configured by the
/// board setup code.
pub struct GpioAdc<A, CH, LED, D, ADC = A> {
    adc: A,
    channel: CH,
    led: LED,
    delay: D,
    mv_per_count: f32,
    _adc: PhantomData<ADC>,
}

impl<A, CH, LED, D, ADC> GpioAdc<A, CH, LED, D, ADC>
where
    A: OneShot<ADC, u16, CH>,
    CH: Channel<ADC>,
    LED: OutputPin,
    D: DelayUs<u32> + DelayMs<u32>,
{
    pub fn new(adc: A, channel: CH, led: LED, delay: D, config: AdcConfig) -> Self {
        GpioAdc {
            adc,
            channel,
            led,
            delay,
            mv_per_count: config.mv_per_count(),
            _adc: PhantomData,
        }
    }

    /// Release the underlying HAL resources.
    pub fn free(self) -> (A, CH, LED, D) {
        (self.adc, self.channel, self.led, self.delay)
    }
}

impl<A, CH, LED, D, ADC> Pal for GpioAdc<A, CH, LED, D, ADC>
where
    A: OneShot<ADC, u16, CH>,
    CH: Channel<ADC>,
    LED: OutputPin,
    D: DelayUs<u32> + DelayMs<u32>,
{
    type PinError = LED::Error;
    type AdcError = <A as OneShot<ADC, u16, CH>>::Error;

    fn set_led(&mut self, state: LedState) -> Result<(), Self::PinError> {
        match state {
            LedState::On => self.led.set_low(),
            LedState::Off => self.led.set_high(),
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn read_millivolts(&mut self) -> Result<f32, Self::AdcError> {
        let count = block!(self.adc.read(&mut self.channel))?;
        Ok(f32::from(count) * self.mv_per_count)
    }
}
