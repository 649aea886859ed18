//! Analytics configuration (`[analytics]` section)

use serde::{Deserialize, Serialize};

use crate::filter::OperatorPolicy;
use crate::growth::FirstPeriodPolicy;

/// Largest accepted `top_limit`
pub const MAX_TOP_LIMIT: usize = 1000;

/// Tunables for the analytics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Rows returned by `top`
    pub top_limit: usize,

    /// Growth reported for the first period
    pub first_period_growth: FirstPeriodPolicy,

    /// Handling of unknown filter operators
    pub operator_policy: OperatorPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_limit: 10,
            first_period_growth: FirstPeriodPolicy::default(),
            operator_policy: OperatorPolicy::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn with_top_limit(mut self, top_limit: usize) -> Self {
        self.top_limit = top_limit;
        self
    }

    pub fn with_first_period_growth(mut self, policy: FirstPeriodPolicy) -> Self {
        self.first_period_growth = policy;
        self
    }

    pub fn with_operator_policy(mut self, policy: OperatorPolicy) -> Self {
        self.operator_policy = policy;
        self
    }

    /// Check value ranges, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        if self.top_limit == 0 || self.top_limit > MAX_TOP_LIMIT {
            return Err(format!(
                "top_limit must be between 1 and {}, got {}",
                MAX_TOP_LIMIT, self.top_limit
            ));
        }
        Ok(())
    }
}
