use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Path argument that means "read standard input"
pub const STDIN_PATH: &str = "-";

/// Read a file to a string, or all of stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
