//! Credential and recipient files.
//!
//! Both are line-delimited. Keys: blank lines and `#` comments skipped, the
//! file must exist and hold at least one entry. Recipients: only lines that
//! look like a 20-byte hex address are kept, a missing file is an empty list.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{CycleError, Result};

/// Parse signing keys from file contents
pub fn parse_private_keys(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Load signing keys; absent file or no entries is fatal
pub fn load_private_keys(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CycleError::Credentials(format!("{} not found", path.display())));
        }
        Err(e) => return Err(e.into()),
    };

    let keys = parse_private_keys(&content);
    if keys.is_empty() {
        return Err(CycleError::Credentials(format!("No private keys in {}", path.display())));
    }
    Ok(keys)
}

/// Parse recipient addresses from file contents
pub fn parse_recipients(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("0x") && line.len() == 42)
        .map(String::from)
        .collect()
}

/// Load recipients; a missing file yields an empty list
pub fn load_recipients(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_recipients(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No recipient file at {}", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Shorten an address to `0x1234...abcd`
pub fn mask_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
