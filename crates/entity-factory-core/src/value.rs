//! Dynamic field values
//!
//! A [`FieldValue`] is what a field producer resolves to and what the
//! metadata backend stores on an entity. It is generic over the backend's
//! entity handle `E` and collection container `C`.

use indexmap::IndexMap;

/// Value assigned to a single entity field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<E, C> {
	Null,
	Boolean(bool),
	Integer(i64),
	Float(f64),
	String(String),
	/// Reference to another entity
	Entity(E),
	/// Ordered elements, coerced into a fresh collection on to-many fields
	List(Vec<FieldValue<E, C>>),
	/// Collection container already built by the backend
	Collection(C),
}

impl<E, C> FieldValue<E, C> {
	/// Wrap an entity handle
	pub fn entity(entity: E) -> Self {
		FieldValue::Entity(entity)
	}

	/// Build a list of entity references
	///
	/// # Examples
	///
	/// ```
	/// use entity_factory_core::FieldValue;
	///
	/// let value: FieldValue<u32, ()> = FieldValue::entities(vec![1, 2]);
	/// assert_eq!(value.as_list().map(<[_]>::len), Some(2));
	/// ```
	pub fn entities(entities: impl IntoIterator<Item = E>) -> Self {
		FieldValue::List(entities.into_iter().map(FieldValue::Entity).collect())
	}

	/// Short label for the value kind, used in error messages
	pub fn kind(&self) -> &'static str {
		match self {
			FieldValue::Null => "null",
			FieldValue::Boolean(_) => "boolean",
			FieldValue::Integer(_) => "integer",
			FieldValue::Float(_) => "float",
			FieldValue::String(_) => "string",
			FieldValue::Entity(_) => "entity",
			FieldValue::List(_) => "list",
			FieldValue::Collection(_) => "collection",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			FieldValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			FieldValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			FieldValue::Float(f) => Some(*f),
			_ => None,
		}
	}

	pub fn as_boolean(&self) -> Option<bool> {
		match self {
			FieldValue::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_entity(&self) -> Option<&E> {
		match self {
			FieldValue::Entity(entity) => Some(entity),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[FieldValue<E, C>]> {
		match self {
			FieldValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_collection(&self) -> Option<&C> {
		match self {
			FieldValue::Collection(collection) => Some(collection),
			_ => None,
		}
	}
}

impl<E, C> From<String> for FieldValue<E, C> {
	fn from(s: String) -> Self {
		FieldValue::String(s)
	}
}

impl<E, C> From<&str> for FieldValue<E, C> {
	fn from(s: &str) -> Self {
		FieldValue::String(s.to_string())
	}
}

impl<E, C> From<i64> for FieldValue<E, C> {
	fn from(i: i64) -> Self {
		FieldValue::Integer(i)
	}
}

impl<E, C> From<i32> for FieldValue<E, C> {
	fn from(i: i32) -> Self {
		FieldValue::Integer(i64::from(i))
	}
}

impl<E, C> From<u32> for FieldValue<E, C> {
	fn from(i: u32) -> Self {
		FieldValue::Integer(i64::from(i))
	}
}

/// Values above `i64::MAX` are kept as their decimal string
impl<E, C> From<u64> for FieldValue<E, C> {
	fn from(i: u64) -> Self {
		i64::try_from(i).map_or_else(|_| FieldValue::String(i.to_string()), FieldValue::Integer)
	}
}

impl<E, C> From<f64> for FieldValue<E, C> {
	fn from(f: f64) -> Self {
		FieldValue::Float(f)
	}
}

impl<E, C> From<bool> for FieldValue<E, C> {
	fn from(b: bool) -> Self {
		FieldValue::Boolean(b)
	}
}

impl<E, C, T> From<Option<T>> for FieldValue<E, C>
where
	T: Into<FieldValue<E, C>>,
{
	fn from(value: Option<T>) -> Self {
		value.map_or(FieldValue::Null, Into::into)
	}
}

impl<E, C> From<Vec<FieldValue<E, C>>> for FieldValue<E, C> {
	fn from(items: Vec<FieldValue<E, C>>) -> Self {
		FieldValue::List(items)
	}
}

impl<E, C> From<serde_json::Value> for FieldValue<E, C> {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => FieldValue::Null,
			serde_json::Value::Bool(b) => FieldValue::Boolean(b),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					FieldValue::Integer(i)
				} else if let Some(f) = n.as_f64() {
					FieldValue::Float(f)
				} else {
					FieldValue::String(n.to_string())
				}
			}
			serde_json::Value::String(s) => FieldValue::String(s),
			serde_json::Value::Array(items) => {
				FieldValue::List(items.into_iter().map(FieldValue::from).collect())
			}
			serde_json::Value::Object(_) => FieldValue::String(value.to_string()),
		}
	}
}

/// Insertion-ordered mapping of field name to value
///
/// Used both for request-time overrides and for the resolved values passed
/// to an `after_create` hook.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues<E, C> {
	entries: IndexMap<String, FieldValue<E, C>>,
}

impl<E, C> FieldValues<E, C> {
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: IndexMap::with_capacity(capacity),
		}
	}

	/// Builder form of [`insert`](Self::insert)
	///
	/// # Examples
	///
	/// ```
	/// use entity_factory_core::FieldValues;
	///
	/// let values: FieldValues<(), ()> = FieldValues::new()
	///     .with("name", "Nova")
	///     .with("decks", 4);
	/// assert_eq!(values.get("name").and_then(|v| v.as_str()), Some("Nova"));
	/// assert_eq!(values.len(), 2);
	/// ```
	pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue<E, C>>) -> Self {
		self.insert(name, value);
		self
	}

	/// Insert a value; an existing entry keeps its position
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue<E, C>>) {
		self.entries.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&FieldValue<E, C>> {
		self.entries.get(name)
	}

	/// Remove an entry, keeping the order of the others
	pub fn remove(&mut self, name: &str) -> Option<FieldValue<E, C>> {
		self.entries.shift_remove(name)
	}

	pub fn contains_key(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue<E, C>)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<E, C> Default for FieldValues<E, C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<E, C, K, V> FromIterator<(K, V)> for FieldValues<E, C>
where
	K: Into<String>,
	V: Into<FieldValue<E, C>>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		}
	}
}

impl<E, C> IntoIterator for FieldValues<E, C> {
	type Item = (String, FieldValue<E, C>);
	type IntoIter = indexmap::map::IntoIter<String, FieldValue<E, C>>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
