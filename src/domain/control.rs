//! Operator Controls
//!
//! Maintenance mode and manual signal override. These are owned by the admin
//! side of the product and passed into the query path explicitly.

use serde::{Deserialize, Serialize};

use super::event::{validate_value, ValueError};
use super::signal::Signal;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    /// Withhold the prediction entirely
    #[serde(default)]
    pub maintenance_mode: bool,
    /// Fixed value shown instead of the computed prediction
    #[serde(default)]
    pub manual_override: Option<f64>,
}

impl ControlState {
    /// Set or clear the manual override, enforcing the multiplier invariant
    pub fn set_override(&mut self, value: Option<f64>) -> Result<(), ValueError> {
        self.manual_override = match value {
            Some(v) => Some(validate_value(v)?),
            None => None,
        };
        Ok(())
    }

    /// True when the computed prediction would be discarded
    pub fn supersedes_prediction(&self) -> bool {
        self.maintenance_mode || self.manual_override.is_some()
    }

    /// Apply the precedence maintenance > override > computed.
    ///
    /// `computed` is only evaluated when no control supersedes it.
    pub fn resolve_signal<F>(&self, computed: F) -> Signal
    where
        F: FnOnce() -> Signal,
    {
        if self.maintenance_mode {
            return Signal::withheld();
        }
        if let Some(value) = self.manual_override {
            return Signal::manual(value);
        }
        computed()
    }
}
