use std::{collections::HashMap, fs, path::Path};

use tracing::{info, warn};

/// Loads the URL redirect table. No configured path means no remapping, and a
/// broken table degrades to the identity mapping rather than blocking startup.
pub(crate) fn load(path: Option<&Path>) -> HashMap<String, String> {
	let Some(path) = path else {
		return HashMap::new();
	};
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(err) => {
			warn!(path = %path.display(), error = %err, "Redirect table unreadable; URLs pass through unchanged.");

			return HashMap::new();
		},
	};

	match serde_json::from_str::<HashMap<String, String>>(&raw) {
		Ok(redirects) => {
			info!(entries = redirects.len(), "Loaded URL redirect table.");

			redirects
		},
		Err(err) => {
			warn!(path = %path.display(), error = %err, "Redirect table is not a JSON string map; URLs pass through unchanged.");

			HashMap::new()
		},
	}
}
