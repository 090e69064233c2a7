//! Integration tests for TOML settings loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::Jail;
use pretty_assertions::assert_eq;
use tdec_config::{ConfigStore, TdecConfig};
use tdec_core::NamingAttribute;

#[test]
fn loads_api_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://3dec.example/api"
api_key = "key-123"
token = "tok-abc"
"#,
        )?;

        let config = TdecConfig::load_from(&jail.directory().join("config.toml"))
            .expect("config loads");
        assert_eq!(config.api.base_url, "https://3dec.example/api");
        assert_eq!(config.api.api_key, "key-123");
        assert_eq!(config.api.token(), Some("tok-abc"));
        assert!(config.api.is_configured());
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[polling]
interval_ms = 500

[http]
accept_invalid_certs = false
"#,
        )?;

        let config = TdecConfig::load_from(&jail.directory().join("config.toml"))
            .expect("config loads");
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.polling.export_max_attempts, 30);
        assert_eq!(config.polling.search_max_attempts, 60);
        assert!(!config.http.accept_invalid_certs);
        assert_eq!(config.http.timeout_secs, 60);
        Ok(())
    });
}

#[test]
fn unknown_naming_attribute_falls_back_to_label() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
logging_enabled = true
naming_attribute = "nickname"
"#,
        )?;

        let config = TdecConfig::load_from(&jail.directory().join("config.toml"))
            .expect("config loads");
        assert!(config.general.logging_enabled);
        assert_eq!(config.general.naming_attribute, NamingAttribute::Label);
        Ok(())
    });
}

#[test]
fn catalog_lists_are_replaced_not_merged() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[catalog]
owner_fields = ["maintainer", "owner"]
excluded_projects = ["3decision", "sandbox"]
"#,
        )?;

        let config = TdecConfig::load_from(&jail.directory().join("config.toml"))
            .expect("config loads");
        assert_eq!(config.catalog.owner_fields, vec!["maintainer", "owner"]);
        assert!(config.catalog.is_excluded("Sandbox", None));
        Ok(())
    });
}

#[test]
fn store_output_loads_back_through_figment() {
    Jail::expect_with(|jail| {
        let store = ConfigStore::new(jail.directory().join("tdec").join("config.toml"));
        let mut config = TdecConfig::default();
        config.api.base_url = "http://localhost:8080".into();
        config.api.api_key = "k".into();
        config.general.naming_attribute = NamingAttribute::Title;
        store.save(&config).expect("save");

        let loaded = store.load().expect("load");
        assert_eq!(loaded, config);
        Ok(())
    });
}

#[test]
fn malformed_value_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[polling]
interval_ms = "soon"
"#,
        )?;

        let result = TdecConfig::load_from(&jail.directory().join("config.toml"));
        assert!(result.is_err());
        Ok(())
    });
}
