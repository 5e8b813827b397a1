//! Factory settings
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! entity_namespace = "fleet::entities"
//! persist_on_get = true
//! max_depth = 16
//! ```

use serde::{Deserialize, Serialize};

use crate::error::FactoryResult;

/// Separator between namespace segments in entity type names
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Default bound on nested reference construction
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Process-independent configuration of one fixture factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorySettings {
	/// Prefix applied to relative entity names
	pub entity_namespace: String,
	/// Stage every constructed instance for persistence
	pub persist_on_get: bool,
	/// Maximum nesting of entities built through references
	pub max_depth: usize,
}

impl Default for FactorySettings {
	fn default() -> Self {
		Self {
			entity_namespace: String::new(),
			persist_on_get: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl FactorySettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse settings from a TOML document; missing keys keep their defaults
	pub fn from_toml_str(source: &str) -> FactoryResult<Self> {
		let mut settings: Self = toml::from_str(source)?;
		settings.entity_namespace = normalize_namespace(&settings.entity_namespace);
		Ok(settings)
	}

	pub fn with_entity_namespace(mut self, namespace: impl AsRef<str>) -> Self {
		self.entity_namespace = normalize_namespace(namespace.as_ref());
		self
	}

	pub fn with_persist_on_get(mut self, enabled: bool) -> Self {
		self.persist_on_get = enabled;
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Resolve an entity name against the configured namespace
	///
	/// A name starting with `::` is already fully qualified and bypasses the
	/// prefix. Trailing separators are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use entity_factory_core::FactorySettings;
	///
	/// let settings = FactorySettings::new().with_entity_namespace("fleet::entities");
	/// assert_eq!(settings.qualify("SpaceShip"), "fleet::entities::SpaceShip");
	/// assert_eq!(settings.qualify("::gallery::Artist"), "gallery::Artist");
	/// ```
	pub fn qualify(&self, name: &str) -> String {
		let name = trim_end_separators(name);
		if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
			return absolute.to_string();
		}
		if self.entity_namespace.is_empty() {
			name.to_string()
		} else {
			format!("{}{}{}", self.entity_namespace, NAMESPACE_SEPARATOR, name)
		}
	}
}

/// Strip leading and trailing separators from a namespace
pub(crate) fn normalize_namespace(namespace: &str) -> String {
	let mut namespace = trim_end_separators(namespace.trim());
	while let Some(rest) = namespace.strip_prefix(NAMESPACE_SEPARATOR) {
		namespace = rest;
	}
	namespace.to_string()
}

fn trim_end_separators(name: &str) -> &str {
	let mut name = name;
	while let Some(rest) = name.strip_suffix(NAMESPACE_SEPARATOR) {
		name = rest;
	}
	name
}
