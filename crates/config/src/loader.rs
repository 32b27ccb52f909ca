use std::path::Path;

use tracing::debug;

use crate::{
    error::{Error, Result},
    schema::UploaderConfig,
    validate,
};

/// Config file used when no override is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Files without an extension are treated as YAML.
    fn of(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
        match ext {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Load, normalize and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<UploaderConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse_config(&raw, path)?;
    let cfg = validate::finalize(cfg)?;
    debug!(path = %path.display(), channels = cfg.sponsored_channels.len(), "loaded config");
    Ok(cfg)
}

/// Serialize `config` in the format implied by `path` and overwrite the file.
///
/// The file is restricted to the owner on Unix since it carries secrets.
pub fn save_config(path: &Path, config: &UploaderConfig) -> Result<()> {
    let raw = match Format::of(path)? {
        Format::Yaml => serde_yaml::to_string(config).map_err(Error::serialize)?,
        Format::Toml => toml::to_string_pretty(config).map_err(Error::serialize)?,
        Format::Json => serde_json::to_string_pretty(config).map_err(Error::serialize)?,
    };
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(path, raw).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }

    debug!(path = %path.display(), "saved config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> Result<UploaderConfig> {
    match Format::of(path)? {
        Format::Yaml => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        Format::Toml => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        Format::Json => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {rstest::rstest, secrecy::ExposeSecret};

    use super::*;

    const YAML: &str = r#"
api_token: "123:ABC"
bot_username: "FilesBot"
default_tag: "@MyChannel"
admin_password: "pw"
delete_delay: 0
sponsored_channels:
  - "@news"
  - " "
  - "https://t.me/extra/"
  - "@news"
"#;

    #[test]
    fn load_yaml_applies_defaults_and_cleans_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, YAML).unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.api_token.expose_secret(), "123:ABC");
        assert_eq!(cfg.default_tag, "@MyChannel");
        assert_eq!(cfg.delete_delay, 30);
        assert_eq!(cfg.sponsored_channels, vec!["@news", "https://t.me/extra/"]);
    }

    #[test]
    fn missing_required_fields_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bot_username: FilesBot\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::MissingFields(_)));
        assert!(err.to_string().contains("api_token"));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "x=1").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[rstest]
    #[case("config.yaml")]
    #[case("config.toml")]
    #[case("config.json")]
    fn save_then_load_keeps_values(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("config.yaml");
        std::fs::write(&src, YAML).unwrap();
        let mut cfg = load_config(&src).unwrap();
        cfg.default_tag = "@Other".into();

        let path = dir.path().join(name);
        save_config(&path, &cfg).unwrap();
        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.default_tag, "@Other");
        assert_eq!(reloaded.admin_password.expose_secret(), "pw");
        assert_eq!(reloaded.sponsored_channels, cfg.sponsored_channels);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("config.yaml");
        std::fs::write(&src, YAML).unwrap();
        let cfg = load_config(&src).unwrap();
        save_config(&src, &cfg).unwrap();

        let perms = std::fs::metadata(&src).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
