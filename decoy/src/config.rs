//! Configuration types for controlling generation parameters.

use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid filter retry budget (must be > 0)
    #[error("Invalid filter attempts: {0} (must be > 0)")]
    InvalidFilterAttempts(usize),
    /// Invalid derivation retry budget (must be > 0)
    #[error("Invalid derive attempts: {0} (must be > 0)")]
    InvalidDeriveAttempts(usize),
}

/// Configuration for generators and derivations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Hint for the size of generated strings and proliferated lists
    pub size_hint: usize,
    /// Inclusive upper bound for the target length drawn by a sequence container
    pub max_sequence_length: usize,
    /// How many times `such_that` redraws before giving up
    pub max_filter_attempts: usize,
    /// How many fresh derivations a derived generator tries before giving up
    pub max_derive_attempts: usize,
    /// Path depth below which untyped requests may also yield sequences and maps
    pub max_any_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size_hint: 10,
            max_sequence_length: 100,
            max_filter_attempts: 1000,
            max_derive_attempts: 100,
            max_any_depth: 3,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator configuration with validation
    pub fn new(
        size_hint: usize,
        max_sequence_length: usize,
        max_filter_attempts: usize,
        max_derive_attempts: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            size_hint,
            max_sequence_length,
            max_filter_attempts,
            max_derive_attempts,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the generator configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_filter_attempts == 0 {
            return Err(ConfigError::InvalidFilterAttempts(self.max_filter_attempts));
        }
        if self.max_derive_attempts == 0 {
            return Err(ConfigError::InvalidDeriveAttempts(self.max_derive_attempts));
        }
        Ok(())
    }

    pub fn with_size_hint(mut self, size_hint: usize) -> Self {
        self.size_hint = size_hint;
        self
    }

    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    pub fn with_max_filter_attempts(mut self, max_filter_attempts: usize) -> Self {
        self.max_filter_attempts = max_filter_attempts;
        self
    }

    pub fn with_max_derive_attempts(mut self, max_derive_attempts: usize) -> Self {
        self.max_derive_attempts = max_derive_attempts;
        self
    }

    pub fn with_max_any_depth(mut self, max_any_depth: usize) -> Self {
        self.max_any_depth = max_any_depth;
        self
    }
}
