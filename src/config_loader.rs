use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and validate a batch plan file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading plan file from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open plan file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse plan file '{}'", config_path.display()))?;

    config.validate()?;

    info!("Loaded {} plan(s)", config.plans.len());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_plan_file() {
        let yaml = r#"
plans:
  - name: campus
    network: 172.16.5.0
    demands: "40:300 10:100 500:150 30:300"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.plans[0].name, "campus");
    }

    #[test]
    fn test_load_rejects_invalid_plan_file() {
        let yaml = r#"
plans: []
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("at least one plan"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/plans.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to open plan file"));
    }
}
