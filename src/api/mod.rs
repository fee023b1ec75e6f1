//! Client for the prediction service.
//!
//! Two endpoints are used:
//!
//! - `GET  {base_url}/api/entities/{category}` → `{"<category>": [{label, value}, ...]}`
//! - `POST {base_url}/api/predict`             → `{"predicted_charges": float}`

use std::collections::HashMap;

use crate::domain::{Category, PredictionRequest, PredictionResponse, ReferenceEntity};

pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use transport::{HttpReply, ReqwestTransport, Transport};

/// Failure of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    Transport(String),
    /// Any status other than 200.
    Status(u16),
    /// A 200 body that is not the expected JSON shape.
    Decode(String),
    /// A 200 body missing a required key.
    MissingField(&'static str),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "request failed: {msg}"),
            ApiError::Status(code) => write!(f, "service responded with status {code}"),
            ApiError::Decode(msg) => write!(f, "invalid response body: {msg}"),
            ApiError::MissingField(key) => write!(f, "response did not include {key}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Client backed by a blocking `reqwest` transport.
    pub fn with_reqwest(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Box::new(ReqwestTransport::new()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn entities_url(&self, category: Category) -> String {
        format!("{}/api/entities/{}", self.base_url, category.as_str())
    }

    pub fn predict_url(&self) -> String {
        format!("{}/api/predict", self.base_url)
    }

    /// Fetch the reference options for one category.
    ///
    /// A body without the category key is reported as `MissingField`; an
    /// empty list is returned as-is and left for the caller to judge.
    pub fn fetch_entities(&self, category: Category) -> Result<Vec<ReferenceEntity>, ApiError> {
        let reply = self.transport.get(&self.entities_url(category))?;
        if !reply.is_ok() {
            return Err(ApiError::Status(reply.status));
        }

        let mut body: HashMap<String, Vec<ReferenceEntity>> =
            serde_json::from_str(&reply.body).map_err(|e| ApiError::Decode(e.to_string()))?;

        body.remove(category.as_str())
            .ok_or(ApiError::MissingField(category.as_str()))
    }

    /// Submit one prediction request and return the predicted charge.
    pub fn predict(&self, request: &PredictionRequest) -> Result<f64, ApiError> {
        let payload = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        let reply = self.transport.post_json(&self.predict_url(), &payload)?;
        if !reply.is_ok() {
            return Err(ApiError::Status(reply.status));
        }

        let body: PredictionResponse =
            serde_json::from_str(&reply.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        body.predicted_charges
            .ok_or(ApiError::MissingField("predicted_charges"))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;
    use crate::domain::Region;

    #[test]
    fn fetch_entities_parses_category_list() {
        let fake = FakeTransport::new().on_get(
            "http://svc/api/entities/sex",
            HttpReply::new(
                200,
                r#"{"sex": [{"label": "Male", "value": 1}, {"label": "Female", "value": 0}]}"#,
            ),
        );
        let client = ApiClient::new("http://svc", Box::new(fake));

        let entities = client.fetch_entities(Category::Sex).unwrap();
        assert_eq!(
            entities,
            vec![ReferenceEntity::new("Male", 1), ReferenceEntity::new("Female", 0)]
        );
    }

    #[test]
    fn fetch_entities_reports_status_and_missing_key() {
        let fake = FakeTransport::new()
            .on_get("http://svc/api/entities/sex", HttpReply::new(500, "boom"))
            .on_get("http://svc/api/entities/smoker", HttpReply::new(200, r#"{"other": []}"#));
        let client = ApiClient::new("http://svc", Box::new(fake));

        assert_eq!(client.fetch_entities(Category::Sex), Err(ApiError::Status(500)));
        assert_eq!(
            client.fetch_entities(Category::Smoker),
            Err(ApiError::MissingField("smoker"))
        );
    }

    #[test]
    fn unrouted_request_is_a_transport_error() {
        let client = ApiClient::new("http://svc", Box::new(FakeTransport::new()));
        assert!(matches!(
            client.fetch_entities(Category::Region),
            Err(ApiError::Transport(_))
        ));
    }

    #[test]
    fn predict_posts_payload_once() {
        let fake = FakeTransport::new().on_post(
            "http://svc/api/predict",
            HttpReply::new(200, r#"{"predicted_charges": 5432.1}"#),
        );
        let log = fake.log();
        let client = ApiClient::new("http://svc", Box::new(fake));

        let req = PredictionRequest::new(30, 0, 25.0, 0, 1, Region::Southeast);
        assert_eq!(client.predict(&req), Ok(5432.1));

        let posts = log.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "http://svc/api/predict");
        assert_eq!(posts[0].1["southeast"], 1);
        assert_eq!(posts[0].1["northwest"], 0);
        assert_eq!(posts[0].1["southwest"], 0);
    }

    #[test]
    fn predict_missing_key_is_an_error() {
        let fake = FakeTransport::new()
            .on_post("http://svc/api/predict", HttpReply::new(200, r#"{"detail": "ok"}"#));
        let client = ApiClient::new("http://svc", Box::new(fake));
        let req = PredictionRequest::new(30, 1, 25.0, 0, 0, Region::Northeast);

        assert_eq!(
            client.predict(&req),
            Err(ApiError::MissingField("predicted_charges"))
        );
    }
}
