//! Value parsers for CLI arguments beyond what clap checks itself.

use std::fs;
use std::path::PathBuf;

pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!("Port must be a valid number between 1 and 65535, got: '{port_str}'")
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }
    Ok(port)
}

/// The file must exist, be a regular file and be readable.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{path_str}'"));
    }
    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{path_str}'"));
    }
    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{path_str}': {e}"))
}

/// 1 to 100 steps.
pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!("Rollback steps must be a valid positive number, got: '{steps_str}'")
    })?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        s if s > 100 => Err("Rollback steps cannot exceed 100".to_string()),
        s => Ok(s),
    }
}

/// Accepts hostnames and IPv4 literals; rejects blanks, spaces and
/// out-of-range octets.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(' ') {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.parse::<u8>().is_err()) {
            return Err(format!("Invalid IPv4 address format: '{host_str}'"));
        }
    }

    Ok(host.to_string())
}

/// Trims and rejects blank values.
pub fn validate_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be blank".to_string());
    }
    Ok(trimmed.to_string())
}

/// Like [`validate_non_empty`] but keeps surrounding whitespace.
pub fn validate_password(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Password cannot be blank".to_string());
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "{port} should be valid");
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "{port} should be invalid");
        }
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "10.0.0.1", "api.example.com"] {
            assert!(validate_host_address(host).is_ok(), "{host} should be valid");
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "host with spaces", "999.999.999.999", "1.2.3", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "'{host}' should be invalid");
        }
    }

    #[test]
    fn test_rollback_steps_validation() {
        for steps in ["1", "50", "100"] {
            assert!(validate_rollback_steps(steps).is_ok());
        }
        for steps in ["0", "101", "-1", "abc", ""] {
            assert!(validate_rollback_steps(steps).is_err());
        }
    }

    #[test]
    fn test_config_file_path_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("crm.toml");
        fs::write(&file, "[server]\nport = 3000\n").unwrap();

        assert_eq!(validate_config_file_path(file.to_str().unwrap()).unwrap(), file);
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(validate_non_empty("  Acme ").unwrap(), "Acme");
        assert!(validate_non_empty("   ").is_err());
        assert_eq!(validate_password(" pw ").unwrap(), " pw ");
        assert!(validate_password("").is_err());
    }
}
