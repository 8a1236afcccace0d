//! Command implementations

pub mod detect;
pub mod init;
pub mod scan;
pub mod validate;

use std::io::Read;
use std::path::Path;

/// Resolve command input: inline text, a file path, or stdin
pub(crate) fn read_input(text: &Option<String>, file: &Option<String>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text.clone());
    }
    if let Some(file) = file {
        return Ok(std::fs::read_to_string(Path::new(file))?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
