use serde::{Deserialize, Serialize};

use crate::error::{Result, SharingError};

/// Default number of Miller-Rabin rounds (false-accept rate at most 4^-64)
pub const DEFAULT_PRIMALITY_ROUNDS: u32 = 64;

/// Default upper bound on secret length in bytes
pub const DEFAULT_MAX_SECRET_LEN: usize = 4096;

/// Evaluation mode for share generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitMode {
    /// Evaluate the polynomial at each x in turn
    #[default]
    Sequential,
    /// Evaluate the polynomial at all x values in parallel
    Parallel,
}

/// Configuration options for share generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Miller-Rabin rounds used when generating the prime
    pub primality_rounds: u32,
    /// Processing mode
    pub mode: SplitMode,
    /// Longest secret accepted, bounds the size of the generated prime
    pub max_secret_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            mode: SplitMode::default(),
            max_secret_len: DEFAULT_MAX_SECRET_LEN,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of Miller-Rabin rounds
    pub fn with_primality_rounds(mut self, rounds: u32) -> Result<Self> {
        if rounds == 0 {
            return Err(SharingError::InvalidConfig(
                "Primality rounds cannot be zero".into(),
            ));
        }
        self.primality_rounds = rounds;
        Ok(self)
    }

    /// Sets the processing mode
    pub fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the maximum secret length
    pub fn with_max_secret_len(mut self, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(SharingError::InvalidConfig(
                "Maximum secret length cannot be zero".into(),
            ));
        }
        self.max_secret_len = len;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.primality_rounds == 0 {
            return Err(SharingError::InvalidConfig(
                "Primality rounds cannot be zero".into(),
            ));
        }
        if self.max_secret_len == 0 {
            return Err(SharingError::InvalidConfig(
                "Maximum secret length cannot be zero".into(),
            ));
        }

        Ok(())
    }
}
