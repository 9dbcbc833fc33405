//! Startup configuration.
//!
//! The interactive command interpreter that parses a configuration *script*
//! is out of scope (§1); this is the structured configuration every
//! embedding of the core still needs — RAM layout, hart count, and the
//! trace flag — loaded once, deserialize-only, via `serde_json`.
//!
//! ```
//! # use msim_core::config::Config;
//! let json = r#"{
//!     "general": { "trace_instructions": true },
//!     "system": { "ram_base": 2147483648, "num_harts": 1 },
//!     "memory": { "ram_size": 16777216 }
//! }"#;
//! let cfg: Config = serde_json::from_str(json).unwrap();
//! assert!(cfg.general.trace_instructions);
//! assert_eq!(cfg.memory.ram_size, 16 * 1024 * 1024);
//! ```

use serde::Deserialize;

mod defaults {
    pub fn trace_instructions() -> bool {
        false
    }
    pub fn ram_base() -> u64 {
        0x8000_0000
    }
    pub fn kernel_offset() -> u64 {
        0x20_0000
    }
    pub fn num_harts() -> usize {
        1
    }
    pub fn ram_size() -> u64 {
        128 * 1024 * 1024
    }
    pub fn timer_divider() -> u64 {
        100
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub trace_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { trace_instructions: defaults::trace_instructions() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub ram_base: u64,
    pub kernel_offset: u64,
    pub num_harts: usize,
    pub timer_divider: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::ram_base(),
            kernel_offset: defaults::kernel_offset(),
            num_harts: defaults::num_harts(),
            timer_divider: defaults::timer_divider(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub ram_size: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { ram_size: defaults::ram_size() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub system: SystemConfig,
    pub memory: MemoryConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), crate::common::HostError> {
        if self.system.kernel_offset >= self.memory.ram_size {
            return Err(crate::common::HostError::RamTooSmall {
                ram_size: self.memory.ram_size,
                kernel_offset: self.system.kernel_offset,
            });
        }
        if self.system.num_harts == 0 {
            return Err(crate::common::HostError::InvalidConfig("num_harts must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.system.ram_base, 0x8000_0000);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"memory": {"ram_size": 4096}}"#).unwrap();
        assert_eq!(cfg.memory.ram_size, 4096);
        assert_eq!(cfg.system.ram_base, defaults::ram_base());
    }

    #[test]
    fn rejects_kernel_offset_past_ram_size() {
        let cfg = Config {
            system: SystemConfig { kernel_offset: 0x1000, ..Default::default() },
            memory: MemoryConfig { ram_size: 0x800 },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
