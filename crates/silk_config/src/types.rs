//! Run-configuration value types.

use serde::{Deserialize, Serialize};
use silk_device::{PartId, PullDirection, PullStrength};
use std::path::PathBuf;

/// Configuration supplied by the caller for one fitter run.
///
/// `unused_pull`/`unused_drive` are `Some` only when the caller explicitly
/// set them; `None` lets the netlist's `UNUSED_PULL`/`UNUSED_DRIVE`
/// attributes (or the family defaults) apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Target part.
    pub part: PartId,
    /// Caller-forced unused-pin pull direction.
    pub unused_pull: Option<PullDirection>,
    /// Caller-forced unused-pin pull strength.
    pub unused_drive: Option<PullStrength>,
    /// User ID code stored in the image metadata.
    pub user_code: u8,
    /// Sets the read-protection bit in the image metadata.
    pub read_protect: bool,
    /// Strengthens pull resistors during power-on reset.
    pub io_precharge: bool,
    /// Disables the on-die charge pump for the analog blocks.
    pub charge_pump_disable: bool,
    /// Bypasses the internal LDO regulator.
    pub ldo_bypass: bool,
    /// Global analog bias trim (4 bits).
    pub analog_bias: u8,
    /// Boot retry count (1–3).
    pub boot_retry: u8,
    /// Seed for the placement search's random source.
    pub seed: u64,
    /// Optional path to a timing characterization file.
    pub timing_path: Option<PathBuf>,
}

impl RunConfig {
    /// A default configuration targeting the given part.
    pub fn for_part(part: PartId) -> Self {
        Self {
            part,
            unused_pull: None,
            unused_drive: None,
            user_code: 0,
            read_protect: false,
            io_precharge: false,
            charge_pump_disable: false,
            ldo_bypass: false,
            analog_bias: 0,
            boot_retry: 1,
            seed: 0,
            timing_path: None,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::for_part(PartId::Mx3620)
    }
}

/// The effective device configuration after merging caller values with
/// netlist attributes.
///
/// Threaded explicitly into the placement engine and the bitstream encoder;
/// there is no process-wide configuration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Target part.
    pub part: PartId,
    /// Effective unused-pin pull direction.
    pub unused_pull: PullDirection,
    /// Effective unused-pin pull strength.
    pub unused_drive: PullStrength,
    /// User ID code.
    pub user_code: u8,
    /// Read-protection bit.
    pub read_protect: bool,
    /// I/O precharge bit.
    pub io_precharge: bool,
    /// Charge-pump-disable bit.
    pub charge_pump_disable: bool,
    /// LDO-bypass bit.
    pub ldo_bypass: bool,
    /// Global analog bias trim (4 bits).
    pub analog_bias: u8,
    /// Boot retry count (1–3).
    pub boot_retry: u8,
    /// Seed for the placement search's random source.
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let run = RunConfig::default();
        assert_eq!(run.part, PartId::Mx3620);
        assert_eq!(run.unused_pull, None);
        assert_eq!(run.boot_retry, 1);
        assert_eq!(run.seed, 0);
    }

    #[test]
    fn for_part() {
        let run = RunConfig::for_part(PartId::Mx3140);
        assert_eq!(run.part, PartId::Mx3140);
    }

    #[test]
    fn serde_roundtrip() {
        let mut run = RunConfig::default();
        run.unused_pull = Some(PullDirection::Up);
        run.user_code = 0xA5;
        let json = serde_json::to_string(&run).unwrap();
        let back: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.unused_pull, Some(PullDirection::Up));
        assert_eq!(back.user_code, 0xA5);
    }
}
