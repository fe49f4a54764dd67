//! Prints the JSON schema of `config.toml`, or writes it to the path given
//! as the first argument.

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let schema = formink::Config::json_schema();
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;

    match std::env::args_os().nth(1) {
        Some(path) => std::fs::write(&path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.to_string_lossy()))?,
        None => println!("{json}"),
    }
    Ok(())
}
