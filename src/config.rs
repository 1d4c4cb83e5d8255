use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{BillingError, Result};
use crate::types::DueDayPolicy;

/// default cap on installments per purchase
pub const DEFAULT_MAX_INSTALLMENTS: u32 = 48;

/// hard upper bound on installments, whatever the configuration (30 years)
pub const INSTALLMENT_COUNT_CEILING: u32 = 360;

/// billing engine policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// post-purchase utilization above which an approval carries a warning
    pub utilization_warning_threshold: Rate,
    /// treatment of cards whose due day is not after their closing day
    pub due_day_policy: DueDayPolicy,
    /// largest installment count accepted for a single purchase
    pub max_installments: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            utilization_warning_threshold: Rate::from_percentage(80),
            due_day_policy: DueDayPolicy::RollForward,
            max_installments: DEFAULT_MAX_INSTALLMENTS,
        }
    }
}

impl BillingConfig {
    /// stricter profile for corporate cards
    pub fn strict() -> Self {
        Self {
            utilization_warning_threshold: Rate::from_percentage(70),
            due_day_policy: DueDayPolicy::Reject,
            max_installments: 12,
        }
    }

    /// parse from a toml document; absent keys keep their defaults
    ///
    /// ```toml
    /// utilization_warning_threshold = "0.75"
    /// due_day_policy = "reject"
    /// max_installments = 24
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: BillingConfig =
            toml::from_str(source).map_err(|e| BillingError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.utilization_warning_threshold.as_decimal();
        if threshold <= Decimal::ZERO || threshold > Decimal::ONE {
            return Err(BillingError::InvalidConfiguration {
                message: format!(
                    "utilization warning threshold must be in (0, 1], got {}",
                    threshold
                ),
            });
        }

        if self.max_installments == 0 || self.max_installments > INSTALLMENT_COUNT_CEILING {
            return Err(BillingError::InvalidConfiguration {
                message: format!(
                    "max installments must be in 1..={}, got {}",
                    INSTALLMENT_COUNT_CEILING, self.max_installments
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.utilization_warning_threshold, Rate::from_percentage(80));
        assert_eq!(config.due_day_policy, DueDayPolicy::RollForward);
        assert_eq!(config.max_installments, 48);
        assert!(config.validate().is_ok());
        assert!(BillingConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BillingConfig::from_toml_str("max_installments = 24\n").unwrap();
        assert_eq!(config.max_installments, 24);
        assert_eq!(config.utilization_warning_threshold, Rate::from_percentage(80));

        let config = BillingConfig::from_toml_str("").unwrap();
        assert_eq!(config, BillingConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let source = r#"
            utilization_warning_threshold = "0.75"
            due_day_policy = "reject"
            max_installments = 10
        "#;
        let config = BillingConfig::from_toml_str(source).unwrap();
        assert_eq!(config.utilization_warning_threshold, Rate::from_decimal(dec!(0.75)));
        assert_eq!(config.due_day_policy, DueDayPolicy::Reject);
        assert_eq!(config.max_installments, 10);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let result = BillingConfig::from_toml_str("utilization_warning_threshold = \"1.5\"");
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));

        let result = BillingConfig::from_toml_str("max_installments = 0");
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));

        let result = BillingConfig::from_toml_str("max_installments = 361");
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));
        assert!(BillingConfig::from_toml_str("max_installments = 360").is_ok());

        let result = BillingConfig::from_toml_str("due_day_policy = \"sometimes\"");
        assert!(matches!(result, Err(BillingError::InvalidConfiguration { .. })));
    }
}
