use crate::config::Config;
use crate::network_config::NetworkConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load the configuration if a path is given, otherwise use the built-in defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using default overlay pools");
            Ok(Config::default())
        }
    }
}

/// Build the process-wide network configuration; failures are fatal at startup
pub fn init_network_config(config: &Config) -> Result<NetworkConfig> {
    config
        .network_config()
        .wrap_err("Failed to initialize overlay network configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
general:
  log_level: warn
network:
  ipv4_pool: "127.10.10.128/25"
  ipv6_pool: "fe80::/64"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");

        let network = init_network_config(&config).unwrap();
        assert_eq!(network.gateway_v4().to_string(), "127.10.10.129");
        assert!(network.allocate(129).is_err());
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "general:\n  log_level: loud\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "network: 42\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Path::new("/nonexistent/overlay-ipam.yaml")).is_err());
    }

    #[test]
    fn test_load_or_default() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_network_config_is_fatal_on_bad_pool() {
        let mut config = Config::default();
        config.network.ipv6_pool = "fd00::/128".to_string();
        let err = init_network_config(&config).unwrap_err();
        assert!(err.chain().any(|cause| cause.to_string().contains("Invalid CIDR")));
    }
}
