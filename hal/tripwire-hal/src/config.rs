//! Configuration persistence
//!
//! The applied configuration is kept twice: as the JSON document, which is
//! what configuration tools exchange, and as a postcard backup that is
//! used if the document copy is lost or damaged. Whatever copy is loaded is
//! handed back as a document, so callers apply stored and built-in
//! configurations the same way.

use alloc::string::String;
use core::str;

use tripwire_core::config::{self, DecodeError, InputConfig, MAX_CONFIG_BYTES};

use crate::flash::{FlashError, FlashStorage, StorageKey};

/// Largest stored configuration document
pub const MAX_DOCUMENT_BYTES: usize = 512;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Storage operation failed
    Flash(FlashError),
    /// Backup copy could not be encoded
    Serialize,
    /// Backup copy could not be decoded
    Deserialize,
    /// Stored document rejected
    Decode(DecodeError),
    /// Stored document is not UTF-8
    InvalidUtf8,
    /// Pin does not exist on this board
    InvalidPin {
        /// Configured pin
        pin: u8,
    },
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<DecodeError> for ConfigError {
    fn from(e: DecodeError) -> Self {
        ConfigError::Decode(e)
    }
}

/// Which stored copy a configuration was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    /// The JSON document
    Document,
    /// The postcard backup
    Binary,
}

/// Loads and stores the input configuration
pub struct ConfigStore<S> {
    storage: S,
    pin_count: u8,
}

impl<S: FlashStorage> ConfigStore<S> {
    /// Create a store for a board with `pin_count` GPIOs
    ///
    /// Stored configurations naming a pin at or above `pin_count` are
    /// treated as invalid.
    pub fn new(storage: S, pin_count: u8) -> Self {
        Self { storage, pin_count }
    }

    /// Load the stored configuration as a document
    ///
    /// Tries the document first and falls back to the backup.
    pub async fn load(&mut self) -> Result<(String, ConfigSource), ConfigError> {
        match self.load_document().await {
            Ok(document) => return Ok((document, ConfigSource::Document)),
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("No stored config document, trying backup");
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Stored config document unusable: {}, trying backup", _e);
            }
        }

        let document = self.load_binary().await?;
        Ok((document, ConfigSource::Binary))
    }

    /// Store a configuration
    ///
    /// The backup is written first, so an interrupted save still leaves a
    /// loadable copy.
    pub async fn save(&mut self, config: &InputConfig) -> Result<(), ConfigError> {
        self.check_pin(config)?;

        let mut buffer = [0u8; MAX_CONFIG_BYTES];
        let bytes = config
            .to_bytes(&mut buffer)
            .map_err(|_| ConfigError::Serialize)?;
        self.storage.write(StorageKey::InputConfig, bytes).await?;

        let document = config::encode(config);
        self.storage
            .write(StorageKey::InputConfigJson, document.as_bytes())
            .await?;
        Ok(())
    }

    async fn load_document(&mut self) -> Result<String, ConfigError> {
        let mut buffer = [0u8; MAX_DOCUMENT_BYTES];
        let len = self
            .storage
            .read(StorageKey::InputConfigJson, &mut buffer)
            .await?;

        let document = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
        let config = config::decode(document)?;
        self.check_pin(&config)?;

        Ok(String::from(document))
    }

    async fn load_binary(&mut self) -> Result<String, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_BYTES];
        let len = self
            .storage
            .read(StorageKey::InputConfig, &mut buffer)
            .await?;

        let config =
            InputConfig::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;
        self.check_pin(&config)?;

        Ok(config::encode(&config))
    }

    fn check_pin(&self, config: &InputConfig) -> Result<(), ConfigError> {
        if config.pin >= self.pin_count {
            return Err(ConfigError::InvalidPin { pin: config.pin });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use std::vec::Vec;
    use tripwire_core::config::{decode, TriggerType};

    const PIN_COUNT: u8 = 30;

    const DOOR: &str = r#"{"Pin":4,"Mode":{"current":"Pullup"},"Trigger":{"current":"Falling"},"id":7,"taskName":"door","taskPeriod":100,"taskEnabled":true}"#;

    /// In-memory storage with a per-item size limit
    struct MockFlash {
        items: Vec<(StorageKey, Vec<u8>)>,
        max_item: usize,
    }

    impl MockFlash {
        fn new() -> Self {
            Self {
                items: Vec::new(),
                max_item: MAX_DOCUMENT_BYTES,
            }
        }

        fn with(mut self, key: StorageKey, data: &[u8]) -> Self {
            self.items.push((key, data.to_vec()));
            self
        }
    }

    impl FlashStorage for MockFlash {
        async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            let (_, data) = self
                .items
                .iter()
                .find(|(k, _)| *k == key)
                .ok_or(FlashError::NotFound)?;
            let dst = buffer
                .get_mut(..data.len())
                .ok_or(FlashError::BufferTooSmall)?;
            dst.copy_from_slice(data);
            Ok(data.len())
        }

        async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
            if data.len() > self.max_item {
                return Err(FlashError::Full);
            }
            self.items.retain(|(k, _)| *k != key);
            self.items.push((key, data.to_vec()));
            Ok(())
        }
    }

    fn binary(config: &InputConfig) -> Vec<u8> {
        let mut buffer = [0u8; MAX_CONFIG_BYTES];
        config.to_bytes(&mut buffer).unwrap().to_vec()
    }

    #[test]
    fn test_empty_storage() {
        let mut store = ConfigStore::new(MockFlash::new(), PIN_COUNT);
        assert_eq!(
            block_on(store.load()),
            Err(ConfigError::Flash(FlashError::NotFound))
        );
    }

    #[test]
    fn test_saved_config_loads_back() {
        let config = decode(DOOR).unwrap();
        let mut store = ConfigStore::new(MockFlash::new(), PIN_COUNT);

        block_on(store.save(&config)).unwrap();

        let (document, source) = block_on(store.load()).unwrap();
        assert_eq!(source, ConfigSource::Document);
        assert_eq!(decode(&document).unwrap(), config);
    }

    #[test]
    fn test_damaged_document_falls_back_to_backup() {
        let config = decode(DOOR).unwrap();
        let flash = MockFlash::new()
            .with(StorageKey::InputConfigJson, &[0xFF, 0xFE, 0x00])
            .with(StorageKey::InputConfig, &binary(&config));
        let mut store = ConfigStore::new(flash, PIN_COUNT);

        let (document, source) = block_on(store.load()).unwrap();
        assert_eq!(source, ConfigSource::Binary);
        assert_eq!(decode(&document).unwrap(), config);
    }

    #[test]
    fn test_document_with_missing_pin_is_not_loaded() {
        let config = decode(DOOR).unwrap();
        let bad = DOOR.replace("\"Pin\":4", "\"Pin\":40");

        let flash = MockFlash::new().with(StorageKey::InputConfigJson, bad.as_bytes());
        let mut store = ConfigStore::new(flash, PIN_COUNT);
        assert_eq!(
            block_on(store.load()),
            Err(ConfigError::Flash(FlashError::NotFound))
        );

        let flash = MockFlash::new()
            .with(StorageKey::InputConfigJson, bad.as_bytes())
            .with(StorageKey::InputConfig, &binary(&config));
        let mut store = ConfigStore::new(flash, PIN_COUNT);
        let (document, source) = block_on(store.load()).unwrap();
        assert_eq!(source, ConfigSource::Binary);
        assert_eq!(decode(&document).unwrap().pin, 4);
    }

    #[test]
    fn test_backup_with_missing_pin_is_not_loaded() {
        let mut config = decode(DOOR).unwrap();
        config.pin = 31;
        let flash = MockFlash::new().with(StorageKey::InputConfig, &binary(&config));
        let mut store = ConfigStore::new(flash, PIN_COUNT);

        assert_eq!(
            block_on(store.load()),
            Err(ConfigError::InvalidPin { pin: 31 })
        );
    }

    #[test]
    fn test_save_rejects_missing_pin() {
        let mut config = decode(DOOR).unwrap();
        config.pin = 40;
        let mut store = ConfigStore::new(MockFlash::new(), PIN_COUNT);

        assert_eq!(
            block_on(store.save(&config)),
            Err(ConfigError::InvalidPin { pin: 40 })
        );
        assert!(store.storage.items.is_empty());
    }

    #[test]
    fn test_save_reports_full_storage() {
        let mut config = decode(DOOR).unwrap();
        config.trigger = TriggerType::Change;
        let flash = MockFlash {
            items: Vec::new(),
            max_item: MAX_CONFIG_BYTES,
        };
        let mut store = ConfigStore::new(flash, PIN_COUNT);

        // Backup fits, document does not
        assert_eq!(
            block_on(store.save(&config)),
            Err(ConfigError::Flash(FlashError::Full))
        );
        let (document, source) = block_on(store.load()).unwrap();
        assert_eq!(source, ConfigSource::Binary);
        assert_eq!(decode(&document).unwrap(), config);
    }
}
