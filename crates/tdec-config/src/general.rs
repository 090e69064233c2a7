//! General user preferences.

use serde::{Deserialize, Serialize};
use tdec_core::NamingAttribute;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Emit debug-level client logs.
    #[serde(default)]
    pub logging_enabled: bool,

    /// Attribute used to name structures handed to the viewer. Unknown
    /// values fall back to `label`.
    #[serde(default)]
    pub naming_attribute: NamingAttribute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(!config.logging_enabled);
        assert_eq!(config.naming_attribute, NamingAttribute::Label);
    }
}
