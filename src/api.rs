//! Japanese Wikipedia API client.
//!
//! [`WikipediaApi::call`] sends arbitrary MediaWiki parameters; the remaining
//! methods only shape parameters for common queries. The free functions at the
//! bottom of this module build a fresh client against
//! [`WIKIPEDIA_API_ENDPOINT`] for every call.

use anyhow::{Context, Result};
use reqwest::{Client, Url};

use crate::http::HttpClient;
use crate::options::ApiOptions;
use crate::params::Params;
use crate::response::ApiResponse;

/// Endpoint of the Japanese Wikipedia's MediaWiki API.
pub const WIKIPEDIA_API_ENDPOINT: &str = "https://ja.wikipedia.org/w/api.php";

/// Result limit used by search and category listing when none is given.
pub const DEFAULT_LIMIT: u32 = 10;

/// Page properties requested by [`WikipediaApi::get_page`].
const PAGE_PROPS: &str = "text|categories|links|images|templates";

/// Parameters for parsing a page by title.
pub fn page_params(title: &str) -> Params {
    Params::new()
        .with("action", "parse")
        .with("page", title)
        .with("prop", PAGE_PROPS)
        .with("format", "json")
}

/// Parameters for a full-text search.
pub fn search_params(query: &str, limit: u32) -> Params {
    Params::new()
        .with("action", "query")
        .with("list", "search")
        .with("srsearch", query)
        .with("srlimit", limit)
        .with("format", "json")
}

/// Parameters for listing the members of a category. `category` is the name
/// without the `Category:` prefix.
pub fn category_params(category: &str, limit: u32) -> Params {
    Params::new()
        .with("action", "query")
        .with("list", "categorymembers")
        .with("cmtitle", format!("Category:{}", category))
        .with("cmlimit", limit)
        .with("format", "json")
}

/// Parameters for the site information query.
pub fn site_info_params() -> Params {
    Params::new()
        .with("action", "query")
        .with("meta", "siteinfo")
        .with("format", "json")
}

/// Client for one MediaWiki API endpoint.
#[derive(Clone)]
pub struct WikipediaApi {
    endpoint: String,
    http: HttpClient,
}

impl WikipediaApi {
    /// Client for the Japanese Wikipedia.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(WIKIPEDIA_API_ENDPOINT)
    }

    /// Client for another MediaWiki-compatible endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        Url::parse(&endpoint).with_context(|| format!("Invalid API endpoint: {}", endpoint))?;

        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint,
            http: HttpClient::new(client),
        })
    }

    /// Replaces the HTTP client used to execute requests.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Calls the API with arbitrary parameters. `format`, `formatversion` and
    /// `origin` are added unless `params` sets them.
    #[tracing::instrument(skip(self, params, options))]
    pub async fn call(&self, params: &Params, options: &ApiOptions) -> Result<ApiResponse> {
        let resolved = options.resolve();
        self.http
            .execute(&self.endpoint, params, &resolved)
            .await
            .context("Wikipedia API call failed")
    }

    /// Parses a page: text, categories, links, images and templates.
    pub async fn get_page(&self, title: &str, options: &ApiOptions) -> Result<ApiResponse> {
        self.call(&page_params(title), options).await
    }

    pub async fn search_pages(
        &self,
        query: &str,
        limit: u32,
        options: &ApiOptions,
    ) -> Result<ApiResponse> {
        self.call(&search_params(query, limit), options).await
    }

    pub async fn get_category_members(
        &self,
        category: &str,
        limit: u32,
        options: &ApiOptions,
    ) -> Result<ApiResponse> {
        self.call(&category_params(category, limit), options).await
    }

    pub async fn get_site_info(&self, options: &ApiOptions) -> Result<ApiResponse> {
        self.call(&site_info_params(), options).await
    }
}

/// Calls the Japanese Wikipedia API with arbitrary parameters.
pub async fn call_wikipedia_api(params: &Params, options: &ApiOptions) -> Result<ApiResponse> {
    WikipediaApi::new()?.call(params, options).await
}

pub async fn get_page(title: &str, options: &ApiOptions) -> Result<ApiResponse> {
    WikipediaApi::new()?.get_page(title, options).await
}

pub async fn search_pages(query: &str, limit: u32, options: &ApiOptions) -> Result<ApiResponse> {
    WikipediaApi::new()?.search_pages(query, limit, options).await
}

pub async fn get_category_members(
    category: &str,
    limit: u32,
    options: &ApiOptions,
) -> Result<ApiResponse> {
    WikipediaApi::new()?
        .get_category_members(category, limit, options)
        .await
}

pub async fn get_site_info(options: &ApiOptions) -> Result<ApiResponse> {
    WikipediaApi::new()?.get_site_info(options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use mockito::Matcher;
    use serde_json::json;

    fn text(s: &str) -> Option<ParamValue> {
        Some(ParamValue::Text(s.to_string()))
    }

    fn api_for(server: &mockito::Server) -> WikipediaApi {
        WikipediaApi::with_endpoint(format!("{}/w/api.php", server.url())).unwrap()
    }

    #[test]
    fn test_page_params() {
        let params = page_params("日本");
        assert_eq!(params.get("action"), text("parse").as_ref());
        assert_eq!(params.get("page"), text("日本").as_ref());
        assert_eq!(
            params.get("prop"),
            text("text|categories|links|images|templates").as_ref()
        );
        assert_eq!(params.get("format"), text("json").as_ref());
    }

    #[test]
    fn test_search_params() {
        let params = search_params("TypeScript", 5);
        assert_eq!(params.get("action"), text("query").as_ref());
        assert_eq!(params.get("list"), text("search").as_ref());
        assert_eq!(params.get("srsearch"), text("TypeScript").as_ref());
        assert_eq!(params.get("srlimit"), Some(&ParamValue::Int(5)));
    }

    #[test]
    fn test_category_params_adds_prefix() {
        let params = category_params("プログラミング言語", DEFAULT_LIMIT);
        assert_eq!(params.get("list"), text("categorymembers").as_ref());
        assert_eq!(
            params.get("cmtitle"),
            text("Category:プログラミング言語").as_ref()
        );
        assert_eq!(params.get("cmlimit"), Some(&ParamValue::Int(10)));
    }

    #[test]
    fn test_site_info_params() {
        let params = site_info_params();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("meta"), text("siteinfo").as_ref());
    }

    #[test]
    fn test_default_endpoint() {
        let api = WikipediaApi::new().unwrap();
        assert_eq!(api.endpoint(), "https://ja.wikipedia.org/w/api.php");
    }

    #[test]
    fn test_with_endpoint_rejects_invalid_url() {
        assert!(WikipediaApi::with_endpoint("api.php").is_err());
    }

    #[tokio::test]
    async fn test_get_page() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "parse".into()),
                Matcher::UrlEncoded("page".into(), "日本".into()),
                Matcher::UrlEncoded(
                    "prop".into(),
                    "text|categories|links|images|templates".into(),
                ),
                Matcher::UrlEncoded("formatversion".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(r#"{"parse": {"title": "日本", "pageid": 1}}"#)
            .create_async()
            .await;

        let result = api_for(&server)
            .get_page("日本", &ApiOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.pointer("/parse/title"), Some(&json!("日本")));
        assert_eq!(result.pointer("/parse/pageid"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_search_pages() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("list".into(), "search".into()),
                Matcher::UrlEncoded("srsearch".into(), "TypeScript".into()),
                Matcher::UrlEncoded("srlimit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"query": {"search": [{"title": "TypeScript"}]}}"#)
            .create_async()
            .await;

        let result = api_for(&server)
            .search_pages("TypeScript", 5, &ApiOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.pointer("/query/search/0/title"),
            Some(&json!("TypeScript"))
        );
    }

    #[tokio::test]
    async fn test_get_category_members() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("list".into(), "categorymembers".into()),
                Matcher::UrlEncoded("cmtitle".into(), "Category:プログラミング言語".into()),
                Matcher::UrlEncoded("cmlimit".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"query": {"categorymembers": []}}"#)
            .create_async()
            .await;

        let result = api_for(&server)
            .get_category_members("プログラミング言語", DEFAULT_LIMIT, &ApiOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.pointer("/query/categorymembers"),
            Some(&json!([]))
        );
    }

    #[tokio::test]
    async fn test_get_site_info() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "query".into()),
                Matcher::UrlEncoded("meta".into(), "siteinfo".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"query": {"general": {"wikiid": "jawiki"}}}"#)
            .create_async()
            .await;

        let result = api_for(&server)
            .get_site_info(&ApiOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.pointer("/query/general/wikiid"),
            Some(&json!("jawiki"))
        );
    }

    #[tokio::test]
    async fn test_with_http_client() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("ok")
            .create_async()
            .await;

        let result = api_for(&server)
            .with_http_client(HttpClient::new(Client::new()))
            .call(&Params::new(), &ApiOptions::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, ApiResponse::Text("ok".to_string()));
    }

    #[tokio::test]
    async fn test_call_failure_is_wrapped() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let result = api_for(&server)
            .call(
                &Params::new().with("action", "query"),
                &ApiOptions::new().max_retries(1),
            )
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Wikipedia API call failed");
        assert!(format!("{:#}", err).starts_with("Wikipedia API call failed: "));
        assert!(format!("{:#}", err).contains("HTTP error! status: 500"));
    }
}
