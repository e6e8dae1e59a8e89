//! Admin API client

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fixture_seeder_core::{QueryInterface, SeedingResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;

use crate::error::{AdminApiError, AdminApiResult};
use crate::settings::AdminApiSettings;

/// Tokens are refreshed this long before the server says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Lookup of a single record by one field value.
///
/// This is the shape of the `query` of a load declaration:
///
/// ```json
/// { "endpoint": "tax", "data": { "field": "name", "value": "Standard rate" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
	/// Entity endpoint, e.g. `sales-channel`
	pub endpoint: String,
	/// Equals filter
	pub data: SearchCriteria,
}

/// Equals filter of a [`SearchQuery`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
	/// Field to filter on
	pub field: String,
	/// Value the field must equal
	pub value: Value,
}

impl SearchQuery {
	/// Create a new search query
	pub fn new(endpoint: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			endpoint: endpoint.into(),
			data: SearchCriteria {
				field: field.into(),
				value: value.into(),
			},
		}
	}

	fn body(&self) -> Value {
		json!({
			"limit": 1,
			"filter": [{
				"type": "equals",
				"field": self.data.field,
				"value": self.data.value,
			}],
		})
	}
}

impl TryFrom<&Value> for SearchQuery {
	type Error = AdminApiError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		serde_json::from_value(value.clone())
			.map_err(|e| AdminApiError::InvalidQuery(format!("{} in {}", e, value)))
	}
}

#[derive(Debug, Clone)]
struct CachedToken {
	access_token: String,
	expires_at: Instant,
}

impl CachedToken {
	fn is_valid(&self) -> bool {
		Instant::now() < self.expires_at
	}
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
	#[serde(default)]
	data: Vec<Value>,
}

/// Client for the shop's admin API
pub struct AdminApiClient {
	base_url: String,
	api_path: &'static str,
	username: String,
	password: String,
	client_id: String,
	client: reqwest::Client,
	token: RwLock<Option<CachedToken>>,
}

impl AdminApiClient {
	/// Create a new admin API client
	///
	/// # Errors
	///
	/// Returns an error if the configured shop version is invalid or the HTTP
	/// client cannot be built.
	pub fn new(settings: &AdminApiSettings) -> AdminApiResult<Self> {
		let client = reqwest::Client::builder()
			.timeout(settings.timeout())
			.build()
			.map_err(|e| AdminApiError::Config(format!("Failed to create client: {}", e)))?;
		let api_path = settings.api_path()?;

		tracing::debug!(url = %settings.url, api_path, "admin API client created");

		Ok(Self {
			base_url: settings.url.trim_end_matches('/').to_string(),
			api_path,
			username: settings.username.clone(),
			password: settings.password.clone(),
			client_id: settings.client_id.clone(),
			client,
			token: RwLock::new(None),
		})
	}

	/// Returns the API path prefix in use (`/api` or `/api/v2`).
	pub fn api_path(&self) -> &str {
		self.api_path
	}

	/// Returns a valid access token, requesting a new one when needed.
	pub async fn authenticate(&self) -> AdminApiResult<String> {
		if let Some(token) = self.token.read().await.as_ref()
			&& token.is_valid()
		{
			return Ok(token.access_token.clone());
		}

		let mut cached = self.token.write().await;
		if let Some(token) = cached.as_ref()
			&& token.is_valid()
		{
			return Ok(token.access_token.clone());
		}

		let url = format!("{}/api/oauth/token", self.base_url);
		let body = json!({
			"grant_type": "password",
			"client_id": self.client_id,
			"scopes": "write",
			"username": self.username,
			"password": self.password,
		});

		let response = self
			.client
			.post(&url)
			.json(&body)
			.send()
			.await
			.map_err(|e| AdminApiError::Transport {
				url: url.clone(),
				message: e.to_string(),
			})?;

		if !response.status().is_success() {
			let status = response.status();
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| "Unknown error".to_string());
			return Err(AdminApiError::Authentication(format!(
				"status {}: {}",
				status, error_text
			)));
		}

		let token: TokenResponse = response
			.json()
			.await
			.map_err(|e| AdminApiError::InvalidResponse(e.to_string()))?;

		let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
		tracing::debug!(expires_in = token.expires_in, "obtained admin API token");

		*cached = Some(CachedToken {
			access_token: token.access_token.clone(),
			expires_at: Instant::now() + lifetime,
		});
		Ok(token.access_token)
	}

	/// Finds the first record matching the query.
	///
	/// # Returns
	///
	/// Returns `Ok(None)` when nothing matches.
	pub async fn search(&self, query: &SearchQuery) -> AdminApiResult<Option<Value>> {
		let path = format!("search/{}", query.endpoint);
		let response = self
			.request(reqwest::Method::POST, &path, Some(&query.body()))
			.await?;

		let response: SearchResponse = serde_json::from_value(response)
			.map_err(|e| AdminApiError::InvalidResponse(e.to_string()))?;
		Ok(response.data.into_iter().next())
	}

	/// Creates a record at `endpoint`.
	///
	/// # Returns
	///
	/// Returns the response body, or `Value::Null` when the API answers
	/// without one.
	pub async fn create(&self, endpoint: &str, payload: &Value) -> AdminApiResult<Value> {
		self.request(reqwest::Method::POST, endpoint, Some(payload))
			.await
	}

	/// Sets one global system configuration value.
	pub async fn set_system_config(&self, key: &str, value: Value) -> AdminApiResult<()> {
		let mut values = Map::new();
		values.insert(key.to_string(), value);
		// The batch endpoint keys values by sales channel; `null` is the global scope.
		let body = json!({ "null": values });

		self.request(
			reqwest::Method::POST,
			"_action/system-config/batch",
			Some(&body),
		)
		.await?;
		tracing::info!(key, "system config updated");
		Ok(())
	}

	/// Clones the CMS page named `original_name` and renames the copy.
	///
	/// # Returns
	///
	/// Returns the id of the cloned page.
	///
	/// # Errors
	///
	/// Returns [`AdminApiError::NotFound`] if no page has that name.
	pub async fn clone_cms_page(&self, original_name: &str, cloned_name: &str) -> AdminApiResult<String> {
		let original_id = self.find_id_by_name("cms-page", original_name).await?;

		let response = self
			.request(
				reqwest::Method::POST,
				&format!("_action/clone/cms-page/{}", original_id),
				None,
			)
			.await?;
		let cloned_id = record_id(&response).ok_or_else(|| {
			AdminApiError::InvalidResponse(format!("clone of cms-page {} returned no id", original_id))
		})?;

		self.request(
			reqwest::Method::PATCH,
			&format!("cms-page/{}", cloned_id),
			Some(&json!({ "name": cloned_name })),
		)
		.await?;
		tracing::info!(original = original_name, cloned = cloned_name, id = %cloned_id, "cms page cloned");
		Ok(cloned_id)
	}

	/// Assigns a CMS page to the category named `category_name`.
	///
	/// # Returns
	///
	/// Returns `false`, without updating anything, when no category has that name.
	pub async fn set_category_cms_page(&self, category_name: &str, cms_page_id: &str) -> AdminApiResult<bool> {
		let category = self
			.search(&SearchQuery::new("category", "name", category_name))
			.await?;
		let Some(category_id) = category.as_ref().and_then(record_id) else {
			tracing::warn!(category = category_name, "category not found, cms page not assigned");
			return Ok(false);
		};

		self.request(
			reqwest::Method::PATCH,
			&format!("category/{}", category_id),
			Some(&json!({ "cmsPageId": cms_page_id })),
		)
		.await?;
		Ok(true)
	}

	/// Replaces the domains of a sales channel with a single domain.
	///
	/// Language, currency and snippet set are looked up by name.
	///
	/// # Errors
	///
	/// Returns [`AdminApiError::NotFound`] if any of the named records is missing.
	pub async fn add_domain_to_sales_channel(
		&self,
		sales_channel_name: &str,
		language_name: &str,
		currency_name: &str,
		snippet_set_name: &str,
		url: &str,
	) -> AdminApiResult<()> {
		let sales_channel_id = self
			.find_id_by_name("sales-channel", sales_channel_name)
			.await?;
		let language_id = self.find_id_by_name("language", language_name).await?;
		let currency_id = self.find_id_by_name("currency", currency_name).await?;
		let snippet_set_id = self
			.find_id_by_name("snippet-set", snippet_set_name)
			.await?;

		let body = json!({
			"domains": [{
				"currencyId": currency_id,
				"hreflangUseOnlyLocale": false,
				"languageId": language_id,
				"snippetSetId": snippet_set_id,
				"url": url,
			}],
		});
		self.request(
			reqwest::Method::PATCH,
			&format!("sales-channel/{}", sales_channel_id),
			Some(&body),
		)
		.await?;
		tracing::info!(sales_channel = sales_channel_name, url, "sales channel domain set");
		Ok(())
	}

	async fn find_id_by_name(&self, endpoint: &str, name: &str) -> AdminApiResult<String> {
		let record = self
			.search(&SearchQuery::new(endpoint, "name", name))
			.await?;
		record
			.as_ref()
			.and_then(record_id)
			.ok_or_else(|| AdminApiError::NotFound {
				endpoint: endpoint.to_string(),
				field: "name".to_string(),
				value: name.to_string(),
			})
	}

	fn build_url(&self, path: &str) -> String {
		format!(
			"{}{}/{}",
			self.base_url,
			self.api_path,
			path.trim_start_matches('/')
		)
	}

	async fn request(
		&self,
		method: reqwest::Method,
		path: &str,
		body: Option<&Value>,
	) -> AdminApiResult<Value> {
		let url = self.build_url(path);
		let token = self.authenticate().await?;

		let mut req = self
			.client
			.request(method, &url)
			.bearer_auth(token)
			.header(reqwest::header::ACCEPT, "application/json");

		if let Some(body) = body {
			req = req.json(body);
		}

		let response = req.send().await.map_err(|e| AdminApiError::Transport {
			url: url.clone(),
			message: e.to_string(),
		})?;

		let status = response.status();
		let text = response
			.text()
			.await
			.unwrap_or_else(|_| "Unknown error".to_string());

		if !status.is_success() {
			return Err(AdminApiError::Status {
				url,
				status: status.as_u16(),
				body: text,
			});
		}

		if text.trim().is_empty() {
			return Ok(Value::Null);
		}
		serde_json::from_str(&text).map_err(|e| AdminApiError::InvalidResponse(e.to_string()))
	}
}

fn record_id(record: &Value) -> Option<String> {
	record.get("id").and_then(Value::as_str).map(str::to_string)
}

impl std::fmt::Debug for AdminApiClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminApiClient")
			.field("base_url", &self.base_url)
			.field("api_path", &self.api_path)
			.field("username", &self.username)
			.finish()
	}
}

#[async_trait]
impl QueryInterface for AdminApiClient {
	async fn search(&self, query: &Value) -> SeedingResult<Option<Value>> {
		let query = SearchQuery::try_from(query)?;
		tracing::debug!(endpoint = %query.endpoint, field = %query.data.field, "searching admin API");
		Ok(AdminApiClient::search(self, &query).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_search_query_from_load_query() {
		let query = SearchQuery::try_from(&json!({
			"endpoint": "tax",
			"data": {"field": "name", "value": "Standard rate"}
		}))
		.unwrap();

		assert_eq!(query, SearchQuery::new("tax", "name", "Standard rate"));
	}

	#[rstest]
	#[case(json!({"data": {"field": "name", "value": "x"}}))]
	#[case(json!({"endpoint": "tax"}))]
	#[case(json!("tax"))]
	fn test_search_query_rejects_other_shapes(#[case] value: Value) {
		assert!(matches!(
			SearchQuery::try_from(&value),
			Err(AdminApiError::InvalidQuery(_))
		));
	}

	#[rstest]
	fn test_search_body_is_equals_filter() {
		let body = SearchQuery::new("currency", "isoCode", "EUR").body();

		assert_eq!(
			body,
			json!({
				"limit": 1,
				"filter": [{"type": "equals", "field": "isoCode", "value": "EUR"}]
			})
		);
	}

	#[rstest]
	#[case(None, "http://shop.test/api/currency")]
	#[case(Some("6.3.0.0"), "http://shop.test/api/v2/currency")]
	fn test_build_url(#[case] version: Option<&str>, #[case] expected: &str) {
		let settings = AdminApiSettings {
			url: "http://shop.test/".to_string(),
			shop_version: version.map(str::to_string),
			..AdminApiSettings::default()
		};
		let client = AdminApiClient::new(&settings).unwrap();

		assert_eq!(client.build_url("currency"), expected);
	}
}
