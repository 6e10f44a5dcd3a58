//! Precedence merge of caller values and netlist attributes.

use crate::error::ConfigError;
use crate::types::{DeviceConfig, RunConfig};
use silk_diagnostics::DiagnosticSink;
use silk_device::{PullDirection, PullStrength};
use std::collections::BTreeMap;

/// Merges a [`RunConfig`] with the top module's attributes.
///
/// Precedence per field: caller value, then netlist attribute, then family
/// default. When a caller value overrides a conflicting attribute, a notice
/// is emitted; agreement is silent. Invalid attribute values and
/// out-of-range caller values are errors.
pub fn merge(
    run: &RunConfig,
    attributes: &BTreeMap<String, String>,
    sink: &DiagnosticSink,
) -> Result<DeviceConfig, ConfigError> {
    if !(1..=3).contains(&run.boot_retry) {
        return Err(ConfigError::InvalidValue {
            field: "boot-retry count".into(),
            detail: format!("must be between 1 and 3, got {}", run.boot_retry),
        });
    }
    if run.analog_bias > 15 {
        return Err(ConfigError::InvalidValue {
            field: "analog bias trim".into(),
            detail: format!("must fit in 4 bits, got {}", run.analog_bias),
        });
    }

    let attr_pull = match attributes.get("UNUSED_PULL") {
        Some(value) => Some(PullDirection::parse(value).ok_or_else(|| {
            ConfigError::InvalidAttribute {
                attr: "UNUSED_PULL".into(),
                value: value.clone(),
                expected: "UP, DOWN, NONE, FLOAT".into(),
            }
        })?),
        None => None,
    };
    let attr_drive = match attributes.get("UNUSED_DRIVE") {
        Some(value) => Some(PullStrength::parse(value).ok_or_else(|| {
            ConfigError::InvalidAttribute {
                attr: "UNUSED_DRIVE".into(),
                value: value.clone(),
                expected: "10K, 100K, 1M".into(),
            }
        })?),
        None => None,
    };

    let unused_pull = match (run.unused_pull, attr_pull) {
        (Some(forced), Some(attr)) => {
            if forced != attr {
                sink.notice("unused-pull option overrides UNUSED_PULL attribute");
            }
            forced
        }
        (Some(forced), None) => forced,
        (None, Some(attr)) => attr,
        (None, None) => PullDirection::default(),
    };
    let unused_drive = match (run.unused_drive, attr_drive) {
        (Some(forced), Some(attr)) => {
            if forced != attr {
                sink.notice("unused-drive option overrides UNUSED_DRIVE attribute");
            }
            forced
        }
        (Some(forced), None) => forced,
        (None, Some(attr)) => attr,
        (None, None) => PullStrength::default(),
    };

    Ok(DeviceConfig {
        part: run.part,
        unused_pull,
        unused_drive,
        user_code: run.user_code,
        read_protect: run.read_protect,
        io_precharge: run.io_precharge,
        charge_pump_disable: run.charge_pump_disable,
        ldo_bypass: run.ldo_bypass,
        analog_bias: run.analog_bias,
        boot_retry: run.boot_retry,
        seed: run.seed,
    })
}
