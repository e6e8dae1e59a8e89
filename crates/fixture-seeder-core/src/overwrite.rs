//! Path-keyed payload overwrites.
//!
//! Paths are dotted (`price.gross`) with optional bracket indices
//! (`prices[0].gross`). Setting a path creates any missing containers along
//! the way: an array when the next segment is an index, an object otherwise.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SeedingError, SeedingResult};

/// How far past the end of an array an index may write before the array is
/// treated as an object keyed by position.
const MAX_INDEX_GAP: usize = 1024;

/// A single step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	/// Object key.
	Key(String),
	/// Array index, written either `[0]` or as a numeric dotted segment.
	Index(usize),
}

impl PathSegment {
	fn as_key(&self) -> String {
		match self {
			Self::Key(key) => key.clone(),
			Self::Index(index) => index.to_string(),
		}
	}
}

/// A parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
	segments: Vec<PathSegment>,
}

impl FieldPath {
	/// Parses a dotted path.
	///
	/// # Example
	///
	/// ```
	/// # use fixture_seeder_core::overwrite::{FieldPath, PathSegment};
	/// let path = FieldPath::parse("prices[0].gross");
	/// assert_eq!(
	///     path.segments(),
	///     &[
	///         PathSegment::Key("prices".to_string()),
	///         PathSegment::Index(0),
	///         PathSegment::Key("gross".to_string()),
	///     ]
	/// );
	/// ```
	pub fn parse(path: &str) -> Self {
		let mut segments = Vec::new();

		for part in path.split('.') {
			let (head, mut rest) = match part.find('[') {
				Some(start) => part.split_at(start),
				None => (part, ""),
			};

			if !head.is_empty() {
				segments.push(match head.parse::<usize>() {
					Ok(index) => PathSegment::Index(index),
					Err(_) => PathSegment::Key(head.to_string()),
				});
			}

			while let Some(stripped) = rest.strip_prefix('[') {
				let Some(end) = stripped.find(']') else {
					segments.push(PathSegment::Key(rest.to_string()));
					break;
				};
				let inner = &stripped[..end];
				segments.push(match inner.parse::<usize>() {
					Ok(index) => PathSegment::Index(index),
					Err(_) => PathSegment::Key(inner.trim_matches(['"', '\'']).to_string()),
				});
				rest = &stripped[end + 1..];
			}
		}

		Self { segments }
	}

	/// Returns the parsed segments.
	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}
}

/// Sets `value` at `path` inside `target`, creating containers as needed.
///
/// Intermediate values that are not objects or arrays are replaced. Writing
/// past the end of an array pads it with `null`; an index far beyond the end
/// turns the array into an object keyed by position instead.
pub fn set_path(target: &mut Value, path: &str, value: Value) {
	let path = FieldPath::parse(path);
	let Some((last, parents)) = path.segments.split_last() else {
		return;
	};

	let mut current = target;
	for (position, segment) in parents.iter().enumerate() {
		let next_is_index = matches!(
			parents.get(position + 1).unwrap_or(last),
			PathSegment::Index(index) if fits_array(0, *index)
		);
		let child = child_mut(current, segment);
		if !child.is_object() && !child.is_array() {
			*child = if next_is_index {
				Value::Array(Vec::new())
			} else {
				Value::Object(Map::new())
			};
		}
		current = child;
	}

	*child_mut(current, last) = value;
}

/// Reads the value at `path` inside `source`.
pub fn get_path<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
	FieldPath::parse(path)
		.segments
		.iter()
		.try_fold(source, |current, segment| match (current, segment) {
			(Value::Object(map), segment) => map.get(&segment.as_key()),
			(Value::Array(items), PathSegment::Index(index)) => items.get(*index),
			_ => None,
		})
}

fn child_mut<'a>(container: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
	let keeps_shape = match (&*container, segment) {
		(Value::Object(_), _) => true,
		(Value::Array(items), PathSegment::Index(index)) => fits_array(items.len(), *index),
		_ => false,
	};
	if !keeps_shape {
		// A key, or a far out of range index, turns an array into an object keyed by position.
		let map: Map<String, Value> = match container.take() {
			Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(index, item)| (index.to_string(), item))
				.collect(),
			_ => Map::new(),
		};
		*container = Value::Object(map);
	}

	match (container, segment) {
		(Value::Array(items), PathSegment::Index(index)) => {
			if items.len() <= *index {
				items.resize(*index + 1, Value::Null);
			}
			&mut items[*index]
		}
		(Value::Object(map), segment) => map.entry(segment.as_key()).or_insert(Value::Null),
		_ => unreachable!("container was normalized to an object or array"),
	}
}

fn fits_array(len: usize, index: usize) -> bool {
	index <= len.saturating_add(MAX_INDEX_GAP)
}

/// Caller-supplied field overrides for one `create_fixture` call.
///
/// Keys are dotted paths into the fixture's own payload, or the name of a
/// requirement whose value is an object of overwrites forwarded to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overwrites(Map<String, Value>);

impl Overwrites {
	/// Creates an empty overwrite set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an overwrite.
	pub fn with(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(path.into(), value.into());
		self
	}

	/// Removes and returns the block addressed to `requirement`.
	///
	/// Returns an empty set when there is no such block.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::InvalidOverwrite`] when the block is not an object.
	pub fn take_requirement(&mut self, requirement: &str) -> SeedingResult<Overwrites> {
		match self.0.shift_remove(requirement) {
			None | Some(Value::Null) => Ok(Self::new()),
			Some(Value::Object(block)) => Ok(Self(block)),
			Some(value) => Err(SeedingError::InvalidOverwrite {
				requirement: requirement.to_string(),
				value,
			}),
		}
	}

	/// Sets every overwrite path on `payload`, in insertion order.
	pub fn apply_to(&self, payload: &mut Value) {
		for (path, value) in &self.0 {
			set_path(payload, path, value.clone());
		}
	}

	/// Returns the overwrite for an exact key.
	pub fn get(&self, path: &str) -> Option<&Value> {
		self.0.get(path)
	}

	/// Returns the number of overwrites.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if there are no overwrites.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the overwrites in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}
}

impl From<Map<String, Value>> for Overwrites {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl TryFrom<Value> for Overwrites {
	type Error = SeedingError;

	fn try_from(value: Value) -> SeedingResult<Self> {
		match value {
			Value::Object(map) => Ok(Self(map)),
			Value::Null => Ok(Self::new()),
			other => Err(SeedingError::ParseError(format!(
				"Overwrites must be a JSON object, got {}",
				other
			))),
		}
	}
}
