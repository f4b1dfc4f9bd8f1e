//! Configuration type definitions
//!
//! These types represent the monitor configuration. Mode and trigger are
//! closed enums; their display names only matter to the document codec
//! (see [`super::document`]), never to the monitor logic.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum task name length
pub const MAX_TASK_NAME_LEN: usize = 32;

/// Default polling period (ms)
pub const DEFAULT_TASK_PERIOD_MS: u32 = 100;

/// Maximum postcard-encoded config size
pub const MAX_CONFIG_BYTES: usize = 64;

/// Electrical pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input
    #[default]
    Input,
    /// Input with internal pull-up
    Pullup,
    /// Input with internal pull-down
    Pulldown,
    /// Open-drain
    OpenDrain,
}

impl PinMode {
    /// All modes, in document option order
    pub const ALL: [PinMode; 4] = [
        PinMode::Input,
        PinMode::Pullup,
        PinMode::Pulldown,
        PinMode::OpenDrain,
    ];

    /// Display name used in the configuration document
    pub const fn name(self) -> &'static str {
        match self {
            PinMode::Input => "Input",
            PinMode::Pullup => "Pullup",
            PinMode::Pulldown => "Pulldown",
            PinMode::OpenDrain => "Open Drain",
        }
    }

    /// Look up a mode by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// Interrupt trigger condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerType {
    /// Interrupt detached
    #[default]
    Disabled,
    /// Low-to-high edge
    Rising,
    /// High-to-low edge
    Falling,
    /// Either edge
    Change,
    /// Level low
    Low,
    /// Level high
    High,
    /// Level low, also wakes the chip from sleep
    LowWithWakeup,
    /// Level high, also wakes the chip from sleep
    HighWithWakeup,
}

impl TriggerType {
    /// All trigger types, in document option order
    pub const ALL: [TriggerType; 8] = [
        TriggerType::Disabled,
        TriggerType::Rising,
        TriggerType::Falling,
        TriggerType::Change,
        TriggerType::Low,
        TriggerType::High,
        TriggerType::LowWithWakeup,
        TriggerType::HighWithWakeup,
    ];

    /// Display name used in the configuration document
    pub const fn name(self) -> &'static str {
        match self {
            TriggerType::Disabled => "Disabled",
            TriggerType::Rising => "Rising",
            TriggerType::Falling => "Falling",
            TriggerType::Change => "Change",
            TriggerType::Low => "Low",
            TriggerType::High => "High",
            TriggerType::LowWithWakeup => "Low with Wakeup",
            TriggerType::HighWithWakeup => "High with Wakeup",
        }
    }

    /// Look up a trigger type by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Level-sensitive (fires for as long as the level is held)
    pub fn is_level(self) -> bool {
        matches!(
            self,
            TriggerType::Low
                | TriggerType::High
                | TriggerType::LowWithWakeup
                | TriggerType::HighWithWakeup
        )
    }

    /// Should also arm the pin as a sleep wake source
    pub fn wakes(self) -> bool {
        matches!(self, TriggerType::LowWithWakeup | TriggerType::HighWithWakeup)
    }
}

/// Periodic task scheduling parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskConfig {
    /// Task name
    pub name: String<MAX_TASK_NAME_LEN>,
    /// Minimum time between runs (ms)
    pub period_ms: u32,
    /// Task is being invoked
    pub enabled: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            period_ms: DEFAULT_TASK_PERIOD_MS,
            enabled: false,
        }
    }
}

/// Digital input configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Electrical mode
    pub mode: PinMode,
    /// Interrupt condition
    pub trigger: TriggerType,
    /// Identifier echoed in reports
    pub id: i32,
    /// Polling task parameters
    pub task: TaskConfig,
}

impl InputConfig {
    /// Create a default config for a pin
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            ..Default::default()
        }
    }

    /// Encode as postcard binary (for flash persistence)
    pub fn to_bytes<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], postcard::Error> {
        postcard::to_slice(self, buffer)
    }

    /// Decode from postcard binary
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}
