//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed env var and working-directory manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use stamp_config::{ConfigError, StampConfig};

#[test]
fn loads_full_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[stamping]
mirror_date_created = false

[database]
path = "/var/lib/stamp/audit.db"

[general]
log_level = "debug"
"#,
        )?;

        let config: StampConfig = Figment::from(Serialized::defaults(StampConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.stamping.mirror_date_created);
        assert!(!config.stamping.policy().mirror_date_created);
        assert_eq!(config.database.path, "/var/lib/stamp/audit.db");
        assert_eq!(config.general.log_level, "debug");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = ":memory:"
"#,
        )?;

        let config: StampConfig = Figment::from(Serialized::defaults(StampConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.database.is_in_memory());
        assert!(config.stamping.mirror_date_created);
        assert_eq!(config.general.log_level, "warn");
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".stamp")?;
        jail.create_file(
            ".stamp/config.toml",
            r#"
[stamping]
mirror_date_created = false
"#,
        )?;

        let config = StampConfig::load().expect("config loads");
        assert!(!config.stamping.mirror_date_created);
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".stamp")?;
        jail.create_file(
            ".stamp/config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("STAMP_DATABASE__PATH", "from-env.db");

        let config = StampConfig::load().expect("config loads");
        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn env_var_overrides_default() {
    Jail::expect_with(|jail| {
        jail.set_env("STAMP_STAMPING__MIRROR_DATE_CREATED", "false");
        jail.set_env("STAMP_GENERAL__LOG_LEVEL", "trace");

        let config = StampConfig::load().expect("config loads");
        assert!(!config.stamping.mirror_date_created);
        assert_eq!(config.general.log_level, "trace");
        Ok(())
    });
}

#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("STAMP_DATABASE__PAHT", "typo.db");

        let config = StampConfig::load().expect("config loads");
        assert_eq!(config.database.path, ".stamp/stamp.db");
        Ok(())
    });
}

#[test]
fn invalid_log_level_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("STAMP_GENERAL__LOG_LEVEL", "chatty");

        let err = StampConfig::load().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "general.log_level"),
            "unexpected error: {err}"
        );
        Ok(())
    });
}

#[test]
fn empty_database_path_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("STAMP_DATABASE__PATH", "");

        let err = StampConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }), "unexpected error: {err}");
        Ok(())
    });
}

#[test]
fn malformed_toml_surfaces_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".stamp")?;
        jail.create_file(
            ".stamp/config.toml",
            r#"
[stamping]
mirror_date_created = "sometimes"
"#,
        )?;

        let err = StampConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)), "unexpected error: {err}");
        Ok(())
    });
}
