use std::path::Path;

use crate::config::load_markup;
use crate::error::Result;

/// Prints the markup a run would use, as a starting point for an override file.
pub fn run(path: Option<&Path>) -> Result<u8> {
	let markup = load_markup(path)?;
	println!("{}", markup.to_json_pretty()?);
	Ok(0)
}
