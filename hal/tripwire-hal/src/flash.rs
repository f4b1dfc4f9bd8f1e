//! Persistent key-value storage
//!
//! Chip HALs implement [`FlashStorage`] on top of their flash controller.
//! Items are small (a config document at most) and written rarely, so the
//! interface is a plain async read/write by key.

/// What an item in storage holds
///
/// The discriminant is the on-flash key byte and must never be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// `InputConfig` in postcard form (backup copy)
    InputConfig = 0,
    /// The JSON configuration document
    InputConfigJson = 1,
}

impl StorageKey {
    /// On-flash key byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse an on-flash key byte
    pub fn from_u8(value: u8) -> Option<Self> {
        [StorageKey::InputConfig, StorageKey::InputConfigJson]
            .into_iter()
            .find(|k| k.as_u8() == value)
    }
}

/// Storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Nothing stored under the key
    NotFound,
    /// Stored item is larger than the caller's buffer
    BufferTooSmall,
    /// Item is larger than the backend can store
    TooLarge,
    /// No space left, even after reclaiming stale items
    Full,
    /// Partition contents failed an integrity check
    Corrupted,
    /// Any other backend failure
    Storage,
}

/// Async key-value storage
pub trait FlashStorage {
    /// Copy the item stored under `key` into `buffer`
    ///
    /// Returns the item length.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Store `data` under `key`, replacing any previous item
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
mod keyed {
    use super::StorageKey;
    use sequential_storage::map::{Key, SerializationError};

    /// Keys occupy a single byte in the map
    impl Key for StorageKey {
        fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
            let slot = buffer
                .first_mut()
                .ok_or(SerializationError::BufferTooSmall)?;
            *slot = self.as_u8();
            Ok(1)
        }

        fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
            let byte = *buffer.first().ok_or(SerializationError::BufferTooSmall)?;
            StorageKey::from_u8(byte)
                .map(|key| (key, 1))
                .ok_or(SerializationError::InvalidFormat)
        }
    }
}
