use serde::{Deserialize, Serialize};

/// Coarse job-level band used both as a retrieval filter and as a ranking
/// penalty signal. Wire labels match the catalog's ingestion format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeniorityBand {
	#[serde(rename = "Entry_Level")]
	EntryLevel,
	#[serde(rename = "Manager_Senior")]
	ManagerSenior,
	#[default]
	#[serde(rename = "General")]
	General,
}
impl SeniorityBand {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::EntryLevel => "Entry_Level",
			Self::ManagerSenior => "Manager_Senior",
			Self::General => "General",
		}
	}

	pub fn parse(label: &str) -> Option<Self> {
		match label {
			"Entry_Level" => Some(Self::EntryLevel),
			"Manager_Senior" => Some(Self::ManagerSenior),
			"General" => Some(Self::General),
			_ => None,
		}
	}

	/// Entry-level and manager/senior exclude each other; `General` conflicts
	/// with nothing on either side.
	pub fn conflicts_with(self, other: Self) -> bool {
		matches!(
			(self, other),
			(Self::EntryLevel, Self::ManagerSenior) | (Self::ManagerSenior, Self::EntryLevel)
		)
	}
}

/// One assessment instrument from the catalog snapshot. Created during
/// offline ingestion and immutable at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
	pub id: String,
	pub name: String,
	pub description: String,
	pub duration_minutes: u32,
	pub test_type: String,
	pub remote_support: bool,
	pub adaptive_support: bool,
	pub seniority: SeniorityBand,
	pub url: String,
}

/// A catalog item paired with the raw document text it was indexed under.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDoc {
	pub item: CatalogItem,
	pub text: String,
}

/// Structured filters extracted from a free-text query. Derived per request,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConstraints {
	pub max_duration_minutes: Option<u32>,
	pub requires_remote: Option<bool>,
	pub requires_adaptive: Option<bool>,
	pub seniority: Option<SeniorityBand>,
}
impl QueryConstraints {
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	/// Manual post-filter for channels without native filter support. The
	/// seniority rule only excludes the entry/manager mismatch; a `General`
	/// constraint or candidate never filters.
	pub fn allows(&self, item: &CatalogItem) -> bool {
		if let Some(max) = self.max_duration_minutes
			&& item.duration_minutes > max
		{
			return false;
		}
		if self.requires_remote == Some(true) && !item.remote_support {
			return false;
		}
		if self.requires_adaptive == Some(true) && !item.adaptive_support {
			return false;
		}
		if let Some(band) = self.seniority
			&& band.conflicts_with(item.seniority)
		{
			return false;
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(duration: u32, remote: bool, adaptive: bool, band: SeniorityBand) -> CatalogItem {
		CatalogItem {
			id: "item".to_string(),
			name: "Item".to_string(),
			description: String::new(),
			duration_minutes: duration,
			test_type: "Knowledge & Skills".to_string(),
			remote_support: remote,
			adaptive_support: adaptive,
			seniority: band,
			url: "https://example.com/item".to_string(),
		}
	}

	#[test]
	fn band_labels_round_trip() {
		for band in [SeniorityBand::EntryLevel, SeniorityBand::ManagerSenior, SeniorityBand::General]
		{
			assert_eq!(SeniorityBand::parse(band.as_str()), Some(band));
		}
		assert_eq!(SeniorityBand::parse("Director"), None);
	}

	#[test]
	fn band_conflicts_are_symmetric() {
		assert!(SeniorityBand::EntryLevel.conflicts_with(SeniorityBand::ManagerSenior));
		assert!(SeniorityBand::ManagerSenior.conflicts_with(SeniorityBand::EntryLevel));
		assert!(!SeniorityBand::General.conflicts_with(SeniorityBand::ManagerSenior));
		assert!(!SeniorityBand::EntryLevel.conflicts_with(SeniorityBand::General));
	}

	#[test]
	fn empty_constraints_allow_everything() {
		let constraints = QueryConstraints::default();

		assert!(constraints.is_empty());
		assert!(constraints.allows(&item(240, false, false, SeniorityBand::ManagerSenior)));
	}

	#[test]
	fn duration_ceiling_filters() {
		let constraints =
			QueryConstraints { max_duration_minutes: Some(60), ..QueryConstraints::default() };

		assert!(constraints.allows(&item(60, false, false, SeniorityBand::General)));
		assert!(!constraints.allows(&item(61, false, false, SeniorityBand::General)));
	}

	#[test]
	fn remote_required_filters_only_when_true() {
		let required =
			QueryConstraints { requires_remote: Some(true), ..QueryConstraints::default() };
		let not_required =
			QueryConstraints { requires_remote: Some(false), ..QueryConstraints::default() };

		assert!(!required.allows(&item(30, false, false, SeniorityBand::General)));
		assert!(required.allows(&item(30, true, false, SeniorityBand::General)));
		assert!(not_required.allows(&item(30, true, false, SeniorityBand::General)));
	}

	#[test]
	fn seniority_mismatch_filters_but_general_passes() {
		let constraints = QueryConstraints {
			seniority: Some(SeniorityBand::EntryLevel),
			..QueryConstraints::default()
		};

		assert!(!constraints.allows(&item(30, false, false, SeniorityBand::ManagerSenior)));
		assert!(constraints.allows(&item(30, false, false, SeniorityBand::General)));
		assert!(constraints.allows(&item(30, false, false, SeniorityBand::EntryLevel)));
	}

	#[test]
	fn band_serde_uses_wire_labels() {
		let json = serde_json::to_string(&SeniorityBand::ManagerSenior).expect("serialize failed");

		assert_eq!(json, "\"Manager_Senior\"");

		let band: SeniorityBand = serde_json::from_str("\"Entry_Level\"").expect("parse failed");

		assert_eq!(band, SeniorityBand::EntryLevel);
	}
}
