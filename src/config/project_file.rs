use crate::domain::model::ProjectInput;
use crate::utils::error::Result;
use std::path::Path;

/// Reads a project submission from a `.toml` file, or JSON otherwise.
pub fn load_project_input<P: AsRef<Path>>(path: P) -> Result<ProjectInput> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        Ok(toml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EcosyncError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_toml_project() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
name = "Relay Commons"
description = "A bridge aggregator that routes community treasury transfers at the lowest cost."
stage = "MVP"
funding_stage = "Seed"
categories = ["DeFi", "DAO/Governance"]
"#,
        )
        .unwrap();

        let input = load_project_input(file.path()).unwrap();
        assert_eq!(input.name, "Relay Commons");
        assert_eq!(input.funding_stage, "Seed");
        assert_eq!(input.categories, vec!["DeFi", "DAO/Governance"]);
    }

    #[test]
    fn test_load_json_project() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"name":"Pixel Guild","description":"Cross-game item ownership with a shared marketplace for guild members.","stage":"Beta","fundingStage":"Series A","categories":["NFT/Gaming"]}"#,
        )
        .unwrap();

        let input = load_project_input(file.path()).unwrap();
        assert_eq!(input.funding_stage, "Series A");
    }

    #[test]
    fn test_missing_field_is_serialization_error() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"name":"Half"}"#).unwrap();

        let err = load_project_input(file.path()).unwrap_err();
        assert!(matches!(err, EcosyncError::SerializationError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_project_input("/nonexistent/project.json").unwrap_err();
        assert!(matches!(err, EcosyncError::IoError(_)));
    }
}
