//! JSON arguments: inline text, or `@path` to read a file.

use serde::de::DeserializeOwned;
use std::error::Error;

pub fn read_json<T: DeserializeOwned>(arg: &str) -> Result<T, Box<dyn Error>> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {path}: {e}"))?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}

/// Like [`read_json`], defaulting when the argument was not given.
pub fn read_json_or_default<T: DeserializeOwned + Default>(
    arg: Option<&str>,
) -> Result<T, Box<dyn Error>> {
    arg.map_or_else(|| Ok(T::default()), |a| read_json(a))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
