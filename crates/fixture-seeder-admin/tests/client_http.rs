//! HTTP-level tests of the admin API client against a mock server.

use std::collections::BTreeMap;
use std::sync::Arc;

use fixture_seeder_admin::{
	AdminApiClient, AdminApiError, AdminApiSettings, SearchQuery, operations_from_settings,
};
use fixture_seeder_core::prelude::*;
use mockito::{Matcher, Mock, Server, ServerGuard};
use rstest::rstest;
use serde_json::json;

fn settings(server: &ServerGuard) -> AdminApiSettings {
	AdminApiSettings {
		url: server.url(),
		..AdminApiSettings::default()
	}
}

async fn mock_token(server: &mut ServerGuard, expected_calls: usize) -> Mock {
	server
		.mock("POST", "/api/oauth/token")
		.match_body(Matcher::PartialJson(json!({
			"grant_type": "password",
			"client_id": "administration",
			"username": "admin",
			"password": "shopware"
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"token_type":"Bearer","expires_in":600,"access_token":"test-token"}"#)
		.expect(expected_calls)
		.create_async()
		.await
}

#[rstest]
#[tokio::test]
async fn test_search_returns_first_record_and_reuses_token() {
	let mut server = Server::new_async().await;
	let token = mock_token(&mut server, 1).await;
	let search = server
		.mock("POST", "/api/search/tax")
		.match_header("authorization", "Bearer test-token")
		.match_body(Matcher::Json(json!({
			"limit": 1,
			"filter": [{"type": "equals", "field": "name", "value": "Standard rate"}]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"total":2,"data":[{"id":"tax-1","name":"Standard rate"},{"id":"tax-2"}]}"#)
		.expect(2)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();
	let query = SearchQuery::new("tax", "name", "Standard rate");

	let first = client.search(&query).await.unwrap();
	let second = client.search(&query).await.unwrap();

	assert_eq!(first, Some(json!({"id": "tax-1", "name": "Standard rate"})));
	assert_eq!(first, second);
	token.assert_async().await;
	search.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_search_without_match_returns_none() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let _search = server
		.mock("POST", "/api/search/sales-channel")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"total":0,"data":[]}"#)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let result = client
		.search(&SearchQuery::new("sales-channel", "name", "Headless"))
		.await
		.unwrap();

	assert_eq!(result, None);
}

#[rstest]
#[tokio::test]
async fn test_legacy_shop_uses_v2_path() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let search = server
		.mock("POST", "/api/v2/search/currency")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"data":[{"id":"eur"}]}"#)
		.expect(1)
		.create_async()
		.await;
	let settings = AdminApiSettings {
		shop_version: Some("6.3.5.0".to_string()),
		..settings(&server)
	};
	let client = AdminApiClient::new(&settings).unwrap();

	let result = client
		.search(&SearchQuery::new("currency", "isoCode", "EUR"))
		.await
		.unwrap();

	assert_eq!(result, Some(json!({"id": "eur"})));
	search.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_rejected_credentials() {
	let mut server = Server::new_async().await;
	let _token = server
		.mock("POST", "/api/oauth/token")
		.with_status(401)
		.with_body(r#"{"errors":[{"title":"The user credentials were incorrect."}]}"#)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let result = client.authenticate().await;

	match result {
		Err(AdminApiError::Authentication(message)) => {
			assert!(message.contains("401"));
			assert!(message.contains("credentials were incorrect"));
		}
		other => panic!("Expected Authentication error, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_set_system_config_posts_global_batch() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let batch = server
		.mock("POST", "/api/_action/system-config/batch")
		.match_header("authorization", "Bearer test-token")
		.match_body(Matcher::Json(json!({
			"null": {"core.listing.showSoldOutProducts": true}
		})))
		.with_status(204)
		.expect(1)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	client
		.set_system_config("core.listing.showSoldOutProducts", json!(true))
		.await
		.unwrap();

	batch.assert_async().await;
}

async fn mock_search_by_name(server: &mut ServerGuard, endpoint: &str, name: &str, data: &str) -> Mock {
	server
		.mock("POST", format!("/api/search/{}", endpoint).as_str())
		.match_body(Matcher::Json(json!({
			"limit": 1,
			"filter": [{"type": "equals", "field": "name", "value": name}]
		})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(format!(r#"{{"total":1,"data":{}}}"#, data))
		.expect(1)
		.create_async()
		.await
}

#[rstest]
#[tokio::test]
async fn test_clone_cms_page_renames_the_copy() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let search = mock_search_by_name(&mut server, "cms-page", "Default listing", r#"[{"id":"page-1"}]"#).await;
	let clone = server
		.mock("POST", "/api/_action/clone/cms-page/page-1")
		.match_header("authorization", "Bearer test-token")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"id":"page-2"}"#)
		.expect(1)
		.create_async()
		.await;
	let rename = server
		.mock("PATCH", "/api/cms-page/page-2")
		.match_header("authorization", "Bearer test-token")
		.match_body(Matcher::Json(json!({"name": "Cloned listing"})))
		.with_status(204)
		.expect(1)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let cloned_id = client
		.clone_cms_page("Default listing", "Cloned listing")
		.await
		.unwrap();

	assert_eq!(cloned_id, "page-2");
	search.assert_async().await;
	clone.assert_async().await;
	rename.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_clone_missing_cms_page_fails() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let _search = mock_search_by_name(&mut server, "cms-page", "Missing", "[]").await;
	let clone = server
		.mock("POST", Matcher::Regex("^/api/_action/clone/".to_string()))
		.expect(0)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let result = client.clone_cms_page("Missing", "Copy").await;

	assert!(matches!(
		result,
		Err(AdminApiError::NotFound { endpoint, value, .. }) if endpoint == "cms-page" && value == "Missing"
	));
	clone.assert_async().await;
}

#[rstest]
#[case(r#"[{"id":"category-1","name":"Home"}]"#, true, 1)]
#[case("[]", false, 0)]
#[tokio::test]
async fn test_set_category_cms_page(
	#[case] found: &str,
	#[case] expected: bool,
	#[case] patches: usize,
) {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let _search = mock_search_by_name(&mut server, "category", "Home", found).await;
	let patch = server
		.mock("PATCH", "/api/category/category-1")
		.match_header("authorization", "Bearer test-token")
		.match_body(Matcher::Json(json!({"cmsPageId": "page-2"})))
		.with_status(204)
		.expect(patches)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let updated = client.set_category_cms_page("Home", "page-2").await.unwrap();

	assert_eq!(updated, expected);
	patch.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_add_domain_to_sales_channel() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let lookups = [
		mock_search_by_name(&mut server, "sales-channel", "Storefront", r#"[{"id":"channel-1"}]"#).await,
		mock_search_by_name(&mut server, "language", "Deutsch", r#"[{"id":"language-de"}]"#).await,
		mock_search_by_name(&mut server, "currency", "Euro", r#"[{"id":"currency-eur"}]"#).await,
		mock_search_by_name(&mut server, "snippet-set", "BASE de-DE", r#"[{"id":"snippets-de"}]"#).await,
	];
	let patch = server
		.mock("PATCH", "/api/sales-channel/channel-1")
		.match_header("authorization", "Bearer test-token")
		.match_body(Matcher::Json(json!({
			"domains": [{
				"currencyId": "currency-eur",
				"hreflangUseOnlyLocale": false,
				"languageId": "language-de",
				"snippetSetId": "snippets-de",
				"url": "http://shop.test/de"
			}]
		})))
		.with_status(204)
		.expect(1)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	client
		.add_domain_to_sales_channel("Storefront", "Deutsch", "Euro", "BASE de-DE", "http://shop.test/de")
		.await
		.unwrap();

	for lookup in lookups {
		lookup.assert_async().await;
	}
	patch.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_add_domain_with_unknown_language_fails() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let _channel = mock_search_by_name(&mut server, "sales-channel", "Storefront", r#"[{"id":"channel-1"}]"#).await;
	let _language = mock_search_by_name(&mut server, "language", "Klingon", "[]").await;
	let patch = server
		.mock("PATCH", Matcher::Any)
		.expect(0)
		.create_async()
		.await;
	let client = AdminApiClient::new(&settings(&server)).unwrap();

	let result = client
		.add_domain_to_sales_channel("Storefront", "Klingon", "Euro", "BASE de-DE", "http://shop.test/tlh")
		.await;

	assert!(matches!(
		result,
		Err(AdminApiError::NotFound { endpoint, .. }) if endpoint == "language"
	));
	patch.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn test_operation_failure_names_operation_and_body() {
	let mut server = Server::new_async().await;
	let _token = mock_token(&mut server, 1).await;
	let _create = server
		.mock("POST", "/api/currency")
		.with_status(400)
		.with_body(r#"{"errors":[{"code":"CURRENCY_ISO_CODE_DUPLICATE"}]}"#)
		.create_async()
		.await;
	let client = Arc::new(AdminApiClient::new(&settings(&server)).unwrap());
	let mut endpoints = BTreeMap::new();
	endpoints.insert("createCurrency".to_string(), "currency".to_string());
	let operations = operations_from_settings(&endpoints, client);

	let operation = operations.get("createCurrency").unwrap();
	let result = operation.create(json!({"isoCode": "XTS"})).await;

	match result {
		Err(SeedingError::OperationFailed { operation, message }) => {
			assert_eq!(operation, "createCurrency");
			assert!(message.contains("400"));
			assert!(message.contains("CURRENCY_ISO_CODE_DUPLICATE"));
		}
		other => panic!("Expected OperationFailed, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_manager_seeds_through_admin_api() {
	let mut server = Server::new_async().await;
	let token = mock_token(&mut server, 1).await;
	let search = server
		.mock("POST", "/api/search/tax")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"data":[{"id":"tax-19","name":"Standard rate"}]}"#)
		.expect(1)
		.create_async()
		.await;
	let currency = server
		.mock("POST", "/api/currency")
		.match_body(Matcher::Json(json!({"isoCode": "XTS", "name": "Test currency"})))
		.with_status(204)
		.expect(1)
		.create_async()
		.await;
	let product = server
		.mock("POST", "/api/product")
		.match_body(Matcher::Json(json!({"name": "Trousers", "taxId": "tax-19"})))
		.with_status(204)
		.expect(1)
		.create_async()
		.await;

	let registry = FixtureRegistry::default()
		.with_type(
			"currency",
			FixtureTypeDefinition::new().with_method("createCurrency"),
			vec![json!({"isoCode": "XTS", "name": "Test currency"})],
		)
		.with_type(
			"product",
			FixtureTypeDefinition::new()
				.with_requirement("currency")
				.with_load(LoadSpec::new(
					"tax",
					json!({"endpoint": "tax", "data": {"field": "name", "value": "Standard rate"}}),
					"taxId",
					"id",
				))
				.with_method("createProduct"),
			vec![json!({"name": "Shirt"})],
		);
	let client = Arc::new(AdminApiClient::new(&settings(&server)).unwrap());
	let mut endpoints = BTreeMap::new();
	endpoints.insert("createCurrency".to_string(), "currency".to_string());
	endpoints.insert("createProduct".to_string(), "product".to_string());
	let operations = operations_from_settings(&endpoints, Arc::clone(&client));
	let mut manager = FixtureManager::new(Arc::new(registry), &operations, client).unwrap();

	manager
		.create_fixture("product", Overwrites::new().with("name", "Trousers"))
		.await
		.unwrap();
	manager
		.create_fixture("product", Overwrites::new())
		.await
		.unwrap();

	token.assert_async().await;
	search.assert_async().await;
	currency.assert_async().await;
	product.assert_async().await;
}
