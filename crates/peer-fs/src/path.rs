//! Client name validation.
//!
//! A client name becomes a directory under `clients/` and a file name
//! (`<name>.conf`), so it must stay a single plain path component.

use crate::{Error, Result};

/// Checks that `name` is safe to use as a client directory name.
///
/// Rejects empty names, `.` and `..`, names with a leading dot, path
/// separators, and control characters.
pub fn validate_client_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidClientName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name is empty");
    }
    if name == "." || name == ".." {
        return reject("name is a relative path component");
    }
    if name.starts_with('.') {
        return reject("name must not start with '.'");
    }
    if name.contains(['/', '\\']) {
        return reject("name must not contain path separators");
    }
    if name.chars().any(char::is_control) {
        return reject("name must not contain control characters");
    }
    if name != name.trim() {
        return reject("name must not have leading or trailing whitespace");
    }

    Ok(())
}
