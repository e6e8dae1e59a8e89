//! Shop version handling and API path selection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::AdminApiError;

/// API path prefix of current shops.
pub const API_PATH: &str = "/api";

/// API path prefix of shops older than 6.4.0.0.
pub const LEGACY_API_PATH: &str = "/api/v2";

/// Dotted numeric shop version, e.g. `6.4.20.0`.
///
/// Missing trailing segments compare as zero, so `6.4` equals `6.4.0.0`.
#[derive(Debug, Clone)]
pub struct ShopVersion {
	segments: Vec<u64>,
}

impl ShopVersion {
	/// Derives the version from a base URL of the form `https://v<version>-<suffix>`.
	///
	/// Returns `None` for any other URL shape.
	pub fn from_base_url(base_url: &str) -> Option<Self> {
		base_url
			.split('-')
			.next()?
			.strip_prefix("https://v")?
			.parse()
			.ok()
	}

	/// Resolves the version of the target shop.
	///
	/// A configured version wins; without one the base URL is consulted.
	///
	/// # Errors
	///
	/// Returns [`AdminApiError::InvalidVersion`] if `configured` is not a valid version.
	pub fn resolve(configured: Option<&str>, base_url: &str) -> Result<Option<Self>, AdminApiError> {
		match configured {
			Some(version) => version.parse().map(Some),
			None => Ok(Self::from_base_url(base_url)),
		}
	}

	/// Returns the API path prefix this version serves.
	pub fn api_path(&self) -> &'static str {
		if *self < Self::legacy_boundary() {
			LEGACY_API_PATH
		} else {
			API_PATH
		}
	}

	/// Returns the numeric segments as parsed.
	pub fn segments(&self) -> &[u64] {
		&self.segments
	}

	fn legacy_boundary() -> Self {
		Self {
			segments: vec![6, 4, 0, 0],
		}
	}
}

/// Returns the API path prefix for an optionally known version.
pub fn api_path_for(version: Option<&ShopVersion>) -> &'static str {
	version.map_or(API_PATH, ShopVersion::api_path)
}

impl FromStr for ShopVersion {
	type Err = AdminApiError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
		if digits.is_empty() {
			return Err(AdminApiError::InvalidVersion(s.to_string()));
		}

		let segments = digits
			.split('.')
			.map(|segment| segment.parse::<u64>())
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| AdminApiError::InvalidVersion(s.to_string()))?;

		Ok(Self { segments })
	}
}

impl Ord for ShopVersion {
	fn cmp(&self, other: &Self) -> Ordering {
		let len = self.segments.len().max(other.segments.len());
		(0..len)
			.map(|i| {
				let left = self.segments.get(i).copied().unwrap_or(0);
				let right = other.segments.get(i).copied().unwrap_or(0);
				left.cmp(&right)
			})
			.find(|ordering| ordering.is_ne())
			.unwrap_or(Ordering::Equal)
	}
}

impl PartialOrd for ShopVersion {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for ShopVersion {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for ShopVersion {}

impl fmt::Display for ShopVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.segments.iter().map(u64::to_string).collect();
		write!(f, "{}", parts.join("."))
	}
}
