//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use moqi_config::MoqiConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_db_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[db]
path = "./data/moqi.db"
url = "libsql://moqi.turso.io"
auth_token = "db-token"
"#,
        )?;

        let config: MoqiConfig = Figment::from(Serialized::defaults(MoqiConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.db.path, "./data/moqi.db");
        assert_eq!(config.db.url, "libsql://moqi.turso.io");
        assert!(config.db.is_remote());
        Ok(())
    });
}

#[test]
fn loads_pipeline_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[pipeline]
request_timeout_secs = 3
reconcile_on_stage_entry = false
"#,
        )?;

        let config: MoqiConfig = Figment::from(Serialized::defaults(MoqiConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.pipeline.request_timeout_secs, 3);
        assert!(!config.pipeline.reconcile_on_stage_entry);
        assert_eq!(config.general.default_limit, 20);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_field_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
default_limit = 5
"#,
        )?;

        let config: MoqiConfig = Figment::from(Serialized::defaults(MoqiConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.default_limit, 5);
        assert_eq!(config.pipeline.request_timeout_secs, 10);
        assert_eq!(config.db.path, ".moqi/moqi.db");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[pipeline]
request_timeout_secs = 3
"#,
        )?;
        jail.set_env("MOQI_PIPELINE__REQUEST_TIMEOUT_SECS", "25");

        let config: MoqiConfig = Figment::from(Serialized::defaults(MoqiConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("MOQI_").split("__"))
            .extract()?;

        assert_eq!(config.pipeline.request_timeout_secs, 25);
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".moqi")?;
        jail.create_file(
            ".moqi/config.toml",
            r#"
[db]
path = ":memory:"
"#,
        )?;

        let config = MoqiConfig::load().expect("config loads");
        assert!(config.db.is_in_memory());
        Ok(())
    });
}
