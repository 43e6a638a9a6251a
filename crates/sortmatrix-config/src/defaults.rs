//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `sortmatrix_core::defaults`.

use sortmatrix_core::defaults;

use crate::types::HoldRuleConfig;

/// Generate default value functions that forward to sortmatrix_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

default_fns! {
    default_compression_level => DEFAULT_COMPRESSION_LEVEL: i32,
    default_inject_rules      => DEFAULT_INJECT_DEFAULT_RULES: bool,
    default_max_fingerprints  => DEFAULT_MAX_FINGERPRINTS: usize,
    default_include_holds     => DEFAULT_INCLUDE_HOLDS: bool,
    default_explain           => DEFAULT_EXPLAIN: bool,
}

pub(crate) fn default_deny_locations() -> Vec<String> {
    defaults::DEFAULT_DENY_LOCATIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub(crate) fn default_hold_rules() -> Vec<HoldRuleConfig> {
    defaults::DEFAULT_HOLD_RULES
        .iter()
        .map(|(route, alert, alert_type, severity)| HoldRuleConfig {
            route: route.to_string(),
            alert: alert.to_string(),
            alert_type: alert_type.to_string(),
            severity: *severity,
        })
        .collect()
}
