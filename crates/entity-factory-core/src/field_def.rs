//! Field value producers
//!
//! Each declared field of an entity definition is bound to a [`FieldDef`]
//! that yields the field's value whenever an instance is built and the
//! caller did not override it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::{FactoryError, FactoryResult};
use crate::factory::FixtureFactory;
use crate::metadata::{EntityManager, Value};
use crate::value::{FieldValue, FieldValues};

/// Placeholders substituted by template sequences
const PLACEHOLDERS: [&str; 2] = ["{n}", "%d"];

/// Closure invoked with the factory as context on every resolution
pub type Generator<M> = Rc<dyn Fn(&mut FixtureFactory<M>) -> FactoryResult<Value<M>>>;

/// Source of a field's value
pub enum FieldDef<M: EntityManager> {
	/// The same value on every resolution
	Constant(Value<M>),
	/// Closure re-invoked on every resolution
	Generator(Generator<M>),
	/// A fresh (or singleton) instance of the named entity
	Reference(String),
	/// A one-element list of the named entity
	References(String),
	/// Counter-based value, unique per resolution
	Sequence(Sequence<Value<M>>),
}

impl<M: EntityManager + 'static> FieldDef<M> {
	pub fn constant(value: impl Into<Value<M>>) -> Self {
		FieldDef::Constant(value.into())
	}

	/// Generator whose return value converts into a field value
	///
	/// # Examples
	///
	/// ```ignore
	/// let fleet = Rc::new(RefCell::new("Star".to_string()));
	/// let name = {
	///     let fleet = Rc::clone(&fleet);
	///     FieldDef::generator(move |_| format!("M/S {}", fleet.borrow()))
	/// };
	/// ```
	pub fn generator<F, T>(generator: F) -> Self
	where
		F: Fn(&mut FixtureFactory<M>) -> T + 'static,
		T: Into<Value<M>>,
	{
		FieldDef::Generator(Rc::new(move |factory: &mut FixtureFactory<M>| {
			Ok(generator(factory).into())
		}))
	}

	/// Generator that may fail, typically because it builds other entities
	pub fn try_generator<F>(generator: F) -> Self
	where
		F: Fn(&mut FixtureFactory<M>) -> FactoryResult<Value<M>> + 'static,
	{
		FieldDef::Generator(Rc::new(generator))
	}

	pub fn reference(entity_name: impl Into<String>) -> Self {
		FieldDef::Reference(entity_name.into())
	}

	pub fn references(entity_name: impl Into<String>) -> Self {
		FieldDef::References(entity_name.into())
	}

	/// Sequence from a template, a plain prefix or a prepared [`Sequence`]
	pub fn sequence(sequence: impl Into<Sequence<Value<M>>>) -> Self {
		FieldDef::Sequence(sequence.into())
	}

	/// Sequence calling `f` with 1, 2, 3, ...
	pub fn sequence_fn<F, T>(f: F) -> Self
	where
		F: Fn(u64) -> T + 'static,
		T: Into<Value<M>> + 'static,
	{
		FieldDef::Sequence(Sequence::new(f))
	}
}

impl<M: EntityManager> FieldDef<M> {
	/// Produce the field's value for one construction
	pub(crate) fn resolve(&self, factory: &mut FixtureFactory<M>) -> FactoryResult<Value<M>> {
		match self {
			FieldDef::Constant(value) => Ok(value.clone()),
			FieldDef::Generator(generator) => generator(factory),
			FieldDef::Reference(target) => factory
				.get(target, FieldValues::new())
				.map(FieldValue::Entity),
			FieldDef::References(target) => factory
				.get_list(target, FieldValues::new(), 1)
				.map(FieldValue::entities),
			FieldDef::Sequence(sequence) => sequence.next_value(),
		}
	}
}

impl<M: EntityManager> FieldDef<M> {
	/// Copy that keeps no counter shared with `self`
	pub(crate) fn fork(&self) -> Self {
		match self {
			FieldDef::Sequence(sequence) => FieldDef::Sequence(sequence.fork()),
			other => other.clone(),
		}
	}
}

impl<M: EntityManager> Clone for FieldDef<M> {
	fn clone(&self) -> Self {
		match self {
			FieldDef::Constant(value) => FieldDef::Constant(value.clone()),
			FieldDef::Generator(generator) => FieldDef::Generator(Rc::clone(generator)),
			FieldDef::Reference(target) => FieldDef::Reference(target.clone()),
			FieldDef::References(target) => FieldDef::References(target.clone()),
			FieldDef::Sequence(sequence) => FieldDef::Sequence(sequence.clone()),
		}
	}
}

impl<M: EntityManager> fmt::Debug for FieldDef<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldDef::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
			FieldDef::Generator(_) => f.write_str("Generator(..)"),
			FieldDef::Reference(target) => f.debug_tuple("Reference").field(target).finish(),
			FieldDef::References(target) => f.debug_tuple("References").field(target).finish(),
			FieldDef::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
		}
	}
}

impl<M: EntityManager> From<FieldValue<M::Entity, M::Collection>> for FieldDef<M> {
	fn from(value: FieldValue<M::Entity, M::Collection>) -> Self {
		FieldDef::Constant(value)
	}
}

impl<M: EntityManager> From<Sequence<Value<M>>> for FieldDef<M> {
	fn from(sequence: Sequence<Value<M>>) -> Self {
		FieldDef::Sequence(sequence)
	}
}

macro_rules! constant_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl<M: EntityManager> From<$ty> for FieldDef<M> {
				fn from(value: $ty) -> Self {
					FieldDef::Constant(FieldValue::from(value))
				}
			}
		)*
	};
}

constant_from!(&str, String, bool, i32, i64, u32, u64, f64);

enum SequenceFormat<V> {
	Template(String),
	Append(String),
	Function(Rc<dyn Fn(u64) -> V>),
}

/// Stateful producer owning a monotonically increasing counter
///
/// Clones share the counter, so a sequence copied into several places still
/// never hands out the same number twice. [`fork`](Self::fork) makes a copy
/// with a counter of its own.
///
/// # Examples
///
/// ```
/// use entity_factory_core::Sequence;
///
/// let tags: Sequence<String> = Sequence::from("T{n}");
/// assert_eq!(tags.next_value().unwrap(), "T1");
/// assert_eq!(tags.next_value().unwrap(), "T2");
///
/// let names: Sequence<String> = Sequence::from("Gamma ");
/// assert_eq!(names.next_value().unwrap(), "Gamma 1");
/// ```
pub struct Sequence<V> {
	/// `None` once `u64::MAX` has been handed out
	counter: Rc<Cell<Option<u64>>>,
	first: u64,
	format: SequenceFormat<V>,
}

impl<V: 'static> Sequence<V> {
	/// Sequence calling `f` with the counter
	pub fn new<F, T>(f: F) -> Self
	where
		F: Fn(u64) -> T + 'static,
		T: Into<V> + 'static,
	{
		Self::with_format(SequenceFormat::Function(Rc::new(move |n| f(n).into())))
	}
}

impl<V> Sequence<V> {
	fn with_format(format: SequenceFormat<V>) -> Self {
		Self {
			counter: Rc::new(Cell::new(Some(1))),
			first: 1,
			format,
		}
	}

	/// Substitute the counter for every `{n}` or `%d` in `template`
	pub fn template(template: impl Into<String>) -> Self {
		Self::with_format(SequenceFormat::Template(template.into()))
	}

	/// Append the counter directly after `prefix`
	pub fn append(prefix: impl Into<String>) -> Self {
		Self::with_format(SequenceFormat::Append(prefix.into()))
	}

	/// Start counting at `first` instead of 1
	pub fn starting_at(mut self, first: u64) -> Self {
		self.counter.set(Some(first));
		self.first = first;
		self
	}

	/// Number the next resolution will use, `None` once exhausted
	pub fn peek(&self) -> Option<u64> {
		self.counter.get()
	}

	/// Rewind the shared counter to the first number; affects every clone
	pub fn reset(&self) {
		self.counter.set(Some(self.first));
	}

	/// Copy with its own counter, positioned at the first number
	pub fn fork(&self) -> Self {
		Self {
			counter: Rc::new(Cell::new(Some(self.first))),
			first: self.first,
			format: self.format.clone(),
		}
	}

	fn advance(&self) -> FactoryResult<u64> {
		let n = self.counter.get().ok_or(FactoryError::SequenceExhausted)?;
		self.counter.set(n.checked_add(1));
		Ok(n)
	}
}

impl<V: From<String>> Sequence<V> {
	/// Read-then-increment the counter and format the result
	///
	/// Fails once the counter has passed `u64::MAX`.
	pub fn next_value(&self) -> FactoryResult<V> {
		let n = self.advance()?;
		let value = match &self.format {
			SequenceFormat::Template(template) => {
				let number = n.to_string();
				let rendered = PLACEHOLDERS
					.iter()
					.fold(template.clone(), |acc, placeholder| {
						acc.replace(placeholder, &number)
					});
				V::from(rendered)
			}
			SequenceFormat::Append(prefix) => V::from(format!("{}{}", prefix, n)),
			SequenceFormat::Function(f) => f(n),
		};
		Ok(value)
	}
}

impl<V> From<&str> for Sequence<V> {
	fn from(pattern: &str) -> Self {
		if PLACEHOLDERS.iter().any(|placeholder| pattern.contains(placeholder)) {
			Self::template(pattern)
		} else {
			Self::append(pattern)
		}
	}
}

impl<V> From<String> for Sequence<V> {
	fn from(pattern: String) -> Self {
		Self::from(pattern.as_str())
	}
}

impl<V> Clone for SequenceFormat<V> {
	fn clone(&self) -> Self {
		match self {
			SequenceFormat::Template(template) => SequenceFormat::Template(template.clone()),
			SequenceFormat::Append(prefix) => SequenceFormat::Append(prefix.clone()),
			SequenceFormat::Function(f) => SequenceFormat::Function(Rc::clone(f)),
		}
	}
}

impl<V> Clone for Sequence<V> {
	fn clone(&self) -> Self {
		Self {
			counter: Rc::clone(&self.counter),
			first: self.first,
			format: self.format.clone(),
		}
	}
}

impl<V> fmt::Debug for Sequence<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let format = match &self.format {
			SequenceFormat::Template(template) => format!("template {:?}", template),
			SequenceFormat::Append(prefix) => format!("append {:?}", prefix),
			SequenceFormat::Function(_) => "function".to_string(),
		};
		f.debug_struct("Sequence")
			.field("next", &self.counter.get())
			.field("format", &format)
			.finish()
	}
}
