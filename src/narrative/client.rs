use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{AtlasError, AtlasResult};
use crate::narrative::{FoodReport, build_prompt, food_report_schema};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const JSON_MIME_TYPE: &str = "application/json";

/// One structured-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    pub prompt: String,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl NarrativeRequest {
    /// Request for the history of `query`, constrained to the report schema.
    #[must_use]
    pub fn for_query(query: &str) -> Self {
        Self {
            prompt: build_prompt(query),
            response_mime_type: JSON_MIME_TYPE.to_owned(),
            response_schema: food_report_schema(),
        }
    }
}

/// Generative backend producing the raw report text.
///
/// `Ok(None)` means the call succeeded but carried no text content.
pub trait NarrativeBackend {
    fn generate(&self, request: &NarrativeRequest) -> AtlasResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> AtlasResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AtlasError::MissingCredential);
        }
        if self.model.trim().is_empty() || self.endpoint.trim().is_empty() {
            return Err(AtlasError::InvalidData(
                "model and endpoint must not be empty".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AtlasError::InvalidData(
                "request timeout must be > 0 seconds".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> AtlasResult<Self> {
        config.validate()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AtlasError::Network(format!("http client error: {e}")))?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn request_body(request: &NarrativeRequest) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "responseMimeType": request.response_mime_type,
                "responseSchema": request.response_schema,
            }
        })
    }
}

impl NarrativeBackend for GeminiClient {
    fn generate(&self, request: &NarrativeRequest) -> AtlasResult<Option<String>> {
        let url = self.config.generate_url();
        debug!(model = %self.config.model, "narrative request sent");
        let response: GenerateResponse = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(request))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AtlasError::Network(format!("request error: {e}")))?
            .json()
            .map_err(|e| AtlasError::Network(format!("envelope decode error: {e}")))?;
        Ok(response.text())
    }
}

/// Fetches and validates the report for one dish.
pub fn fetch_food_history<B>(backend: &B, query: &str) -> AtlasResult<FoodReport>
where
    B: NarrativeBackend + ?Sized,
{
    let request = NarrativeRequest::for_query(query);
    let text = backend
        .generate(&request)
        .inspect_err(|err| warn!(%err, query, "narrative backend failed"))?;
    let text = text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        warn!(query, "narrative backend returned no text");
        return Err(AtlasError::EmptyResponse);
    }
    let report = parse_food_report(text)?;
    debug!(
        query,
        food = %report.food_name,
        steps = report.evolution_steps.len(),
        hubs = report.consumption_hubs.len(),
        "narrative report parsed"
    );
    Ok(report)
}

/// Strict parse: syntax errors are `Parse`, shape or range errors are
/// `SchemaMismatch`.
pub fn parse_food_report(text: &str) -> AtlasResult<FoodReport> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| AtlasError::Parse(e.to_string()))?;
    let report: FoodReport =
        serde_json::from_value(value).map_err(|e| AtlasError::SchemaMismatch(e.to_string()))?;
    report.validate()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{
        GeminiClient, GeminiConfig, GenerateResponse, NarrativeBackend, NarrativeRequest,
        fetch_food_history, parse_food_report,
    };
    use crate::error::{AtlasError, AtlasResult};

    const REPORT: &str = r#"{
        "foodName": "Paella",
        "origin": {
            "location": "Valencia",
            "era": "18th century",
            "coordinates": { "lat": 39.47, "lng": -0.38 },
            "summary": "Rice dish from the Albufera lagoon."
        },
        "evolutionSteps": [],
        "consumptionHubs": [
            { "country": "Spain", "percentage": 70, "coordinates": { "lat": 40.4, "lng": -3.7 } }
        ],
        "ingredientEvolution": [],
        "flavorProfile": { "sweet": 1, "savory": 9, "spicy": 2, "sour": 1, "bitter": 0 },
        "culturalSignificance": [],
        "regionalVariations": []
    }"#;

    struct Canned {
        reply: AtlasResult<Option<String>>,
        seen: RefCell<Vec<String>>,
    }

    impl NarrativeBackend for Canned {
        fn generate(&self, request: &NarrativeRequest) -> AtlasResult<Option<String>> {
            self.seen.borrow_mut().push(request.prompt.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(AtlasError::Network(err.to_string())),
            }
        }
    }

    fn canned(reply: AtlasResult<Option<String>>) -> Canned {
        Canned {
            reply,
            seen: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn fetch_trims_and_parses() {
        let backend = canned(Ok(Some(format!("\n  {REPORT}  \n"))));
        let report = fetch_food_history(&backend, "Paella").expect("report");
        assert_eq!(report.food_name, "Paella");
        assert_eq!(backend.seen.borrow().len(), 1);
        assert!(backend.seen.borrow()[0].contains("\"Paella\""));
    }

    #[test]
    fn blank_or_missing_text_is_empty_response() {
        for reply in [None, Some("   ".to_owned())] {
            let backend = canned(Ok(reply));
            assert!(matches!(
                fetch_food_history(&backend, "Paella"),
                Err(AtlasError::EmptyResponse)
            ));
        }
    }

    #[test]
    fn parse_distinguishes_syntax_from_shape_errors() {
        assert!(matches!(parse_food_report("{ not json"), Err(AtlasError::Parse(_))));
        assert!(matches!(
            parse_food_report(r#"{ "foodName": "Paella" }"#),
            Err(AtlasError::SchemaMismatch(_))
        ));
        let out_of_range = REPORT.replace("\"lat\": 39.47", "\"lat\": 139.47");
        assert!(matches!(
            parse_food_report(&out_of_range),
            Err(AtlasError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn backend_errors_propagate() {
        let backend = canned(Err(AtlasError::Network("offline".to_owned())));
        let err = fetch_food_history(&backend, "Paella").expect_err("fails");
        assert!(err.is_narrative_failure());
    }

    #[test]
    fn envelope_text_concatenates_parts() {
        let envelope: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ] } } ] }"#,
        )
        .expect("envelope");
        assert_eq!(envelope.text().as_deref(), Some("{\"a\":1}"));

        let empty: GenerateResponse = serde_json::from_str("{}").expect("envelope");
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn config_builds_url_and_rejects_blank_key() {
        let config = GeminiConfig::new("k").with_endpoint("https://example.test/v1/");
        assert_eq!(
            config.generate_url(),
            "https://example.test/v1/models/gemini-3-flash-preview:generateContent"
        );
        assert!(matches!(
            GeminiClient::new(GeminiConfig::new("  ")),
            Err(AtlasError::MissingCredential)
        ));
    }
}
