use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use personal_finance_core::{PersonalFinanceError, PersonalFinanceResult};

/// Read a calculator document from disk as untyped JSON.
///
/// Unreadable or unparseable files are the caller's problem, so both surface
/// as malformed input.
pub fn read_json_value(path: &str) -> PersonalFinanceResult<Value> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved).map_err(|e| {
        PersonalFinanceError::MalformedInput(format!(
            "Failed to read '{}': {e}",
            resolved.display()
        ))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        PersonalFinanceError::MalformedInput(format!(
            "Failed to parse '{}': {e}",
            resolved.display()
        ))
    })
}

fn resolve_path(path: &str) -> PersonalFinanceResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| PersonalFinanceError::MalformedInput(format!("cannot resolve '{path}': {e}")))?
            .join(p)
    };

    if !resolved.exists() {
        return Err(PersonalFinanceError::MalformedInput(format!(
            "File not found: {}",
            resolved.display()
        )));
    }
    if !resolved.is_file() {
        return Err(PersonalFinanceError::MalformedInput(format!(
            "Not a file: {}",
            resolved.display()
        )));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_malformed_input() {
        let err = read_json_value("/nonexistent/pfc/input.json").unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_reads_document() {
        let path = std::env::temp_dir().join(format!("pfc-input-{}.json", std::process::id()));
        fs::write(&path, r#"{ "savings": 100 }"#).unwrap();
        let value = read_json_value(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(value["savings"], 100);
    }

    #[test]
    fn test_bad_json_is_malformed_input() {
        let path = std::env::temp_dir().join(format!("pfc-bad-{}.json", std::process::id()));
        fs::write(&path, "{ savings: ").unwrap();
        let err = read_json_value(path.to_str().unwrap()).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, PersonalFinanceError::MalformedInput(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
