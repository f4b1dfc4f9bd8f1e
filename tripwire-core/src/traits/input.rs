//! Interrupt-capable input pin trait

use crate::config::{PinMode, TriggerType};

/// Errors from pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Pin number does not exist on this chip
    InvalidPin,
    /// Pin exists but cannot raise interrupts
    InterruptUnsupported,
}

/// Pin-mode and interrupt-attachment primitives
///
/// Implemented by the board layer. Attaching routes matching transitions
/// on `pin` to the interrupt handler (see [`TriggerState::claim`]).
///
/// [`TriggerState::claim`]: crate::trigger::TriggerState::claim
pub trait InterruptInput {
    /// Set the electrical mode of a pin
    fn configure_pin(&mut self, pin: u8, mode: PinMode) -> Result<(), InputError>;

    /// Check whether a pin can raise interrupts
    fn supports_interrupt(&self, pin: u8) -> bool;

    /// Arm interrupt delivery for `pin` on the given condition
    ///
    /// [`TriggerType::Disabled`] detaches any previous handler.
    fn attach_interrupt(&mut self, pin: u8, trigger: TriggerType) -> Result<(), InputError>;
}
