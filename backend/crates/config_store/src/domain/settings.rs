//! Typed settings
//!
//! Settings the marketplace reads by name. Each one fixes its key, value type,
//! default, description and category, so call sites get a typed value back
//! while arbitrary other keys stay available through the untyped API.

use crate::domain::value_objects::ConfigValue;

/// Rust types a setting may decode to
pub trait SettingValue: Sized + Clone + Send + Sync {
    fn from_config(value: &ConfigValue) -> Option<Self>;
    fn into_config(self) -> ConfigValue;
}

impl SettingValue for bool {
    fn from_config(value: &ConfigValue) -> Option<Self> {
        value.as_bool()
    }

    fn into_config(self) -> ConfigValue {
        ConfigValue::Bool(self)
    }
}

impl SettingValue for i64 {
    fn from_config(value: &ConfigValue) -> Option<Self> {
        value.as_i64()
    }

    fn into_config(self) -> ConfigValue {
        self.into()
    }
}

impl SettingValue for String {
    fn from_config(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn into_config(self) -> ConfigValue {
        ConfigValue::Text(self)
    }
}

/// A known setting
pub trait Setting {
    const KEY: &'static str;
    const DESCRIPTION: &'static str;
    const CATEGORY: &'static str;

    type Value: SettingValue;

    /// Used when the entry is missing, inactive, unreadable or mis-shaped.
    /// Must be the conservative choice.
    fn default_value() -> Self::Value;
}

/// Whether users must confirm an emailed code when signing in
pub struct TwoFactorEnabledForLogin;

impl Setting for TwoFactorEnabledForLogin {
    const KEY: &'static str = "2fa_enabled_for_login";
    const DESCRIPTION: &'static str = "Require an emailed verification code at login";
    const CATEGORY: &'static str = "security";
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

pub struct SiteName;

impl Setting for SiteName {
    const KEY: &'static str = "site_name";
    const DESCRIPTION: &'static str = "Display name of the marketplace";
    const CATEGORY: &'static str = "general";
    type Value = String;

    fn default_value() -> String {
        "Guest Post Marketplace".to_string()
    }
}

pub struct MaxWebsitesPerPublisher;

impl Setting for MaxWebsitesPerPublisher {
    const KEY: &'static str = "max_websites_per_publisher";
    const DESCRIPTION: &'static str = "Maximum number of websites a publisher may list";
    const CATEGORY: &'static str = "publisher";
    type Value = i64;

    fn default_value() -> i64 {
        50
    }
}

pub struct WebsiteApprovalRequired;

impl Setting for WebsiteApprovalRequired {
    const KEY: &'static str = "website_approval_required";
    const DESCRIPTION: &'static str = "New website listings need admin approval";
    const CATEGORY: &'static str = "website";
    type Value = bool;

    fn default_value() -> bool {
        true
    }
}

pub struct MaintenanceMode;

impl Setting for MaintenanceMode {
    const KEY: &'static str = "maintenance_mode";
    const DESCRIPTION: &'static str = "Put the marketplace into maintenance mode";
    const CATEGORY: &'static str = "system";
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

/// Seed row for a known setting
#[derive(Debug, Clone)]
pub struct SettingDefault {
    pub key: &'static str,
    pub value: ConfigValue,
    pub description: &'static str,
    pub category: &'static str,
}

impl SettingDefault {
    pub fn of<S: Setting>() -> Self {
        Self {
            key: S::KEY,
            value: S::default_value().into_config(),
            description: S::DESCRIPTION,
            category: S::CATEGORY,
        }
    }
}

/// Defaults for every known setting
pub fn known_defaults() -> Vec<SettingDefault> {
    vec![
        SettingDefault::of::<TwoFactorEnabledForLogin>(),
        SettingDefault::of::<SiteName>(),
        SettingDefault::of::<MaxWebsitesPerPublisher>(),
        SettingDefault::of::<WebsiteApprovalRequired>(),
        SettingDefault::of::<MaintenanceMode>(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ConfigKey;

    #[test]
    fn test_known_keys_are_valid() {
        for default in known_defaults() {
            assert!(ConfigKey::new(default.key).is_ok(), "{}", default.key);
        }
    }

    #[test]
    fn test_known_keys_are_unique() {
        let mut keys: Vec<_> = known_defaults().into_iter().map(|d| d.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), known_defaults().len());
    }

    #[test]
    fn test_two_factor_defaults_off() {
        let default = SettingDefault::of::<TwoFactorEnabledForLogin>();
        assert_eq!(default.key, "2fa_enabled_for_login");
        assert_eq!(default.value, ConfigValue::Bool(false));
    }

    #[test]
    fn test_setting_value_shapes() {
        assert_eq!(bool::from_config(&ConfigValue::from(true)), Some(true));
        assert_eq!(bool::from_config(&ConfigValue::from("true")), None);
        assert_eq!(i64::from_config(&ConfigValue::from(10_i64)), Some(10));
        assert_eq!(i64::from_config(&ConfigValue::from_f64(1.5).unwrap()), None);
        assert_eq!(String::from_config(&ConfigValue::from("x")), Some("x".to_string()));
    }
}
