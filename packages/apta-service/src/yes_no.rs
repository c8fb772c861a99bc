//! Serde helpers for support flags carried as `"Yes"`/`"No"` strings on the
//! wire.

use serde::{Deserialize, Deserializer, Serializer, de};

pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(if *value { "Yes" } else { "No" })
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	if raw.eq_ignore_ascii_case("yes") {
		Ok(true)
	} else if raw.eq_ignore_ascii_case("no") {
		Ok(false)
	} else {
		Err(de::Error::custom(format!("expected \"Yes\" or \"No\", got {raw:?}")))
	}
}
