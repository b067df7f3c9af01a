/// Errors returned by sensor operations.
///
/// `PinError` and `AdcError` are the HAL's error types for the emitter drive
/// line and the analog input. Platforms with infallible GPIO/ADC end up with
/// `core::convert::Infallible` here and the variants become unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<PinError, AdcError> {
    /// A repeat count of zero would make the averaging divide by zero.
    #[cfg_attr(
        feature = "thiserror",
        error("Repeat count must be at least one sample per measurement")
    )]
    InvalidRepeatCount,
    /// Driving the emitter line failed.
    #[cfg_attr(feature = "thiserror", error("Could not set emitter drive line: {0}"))]
    Pin(PinError),
    /// The ADC conversion failed.
    #[cfg_attr(feature = "thiserror", error("Could not read sensor output voltage: {0}"))]
    Adc(AdcError),
}
