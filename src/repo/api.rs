//! Wikibase action-API client
//!
//! Speaks the MediaWiki action API (`wbgetentities`, `wbcreateclaim`,
//! `wbsetlabel`, `wbsetsitelink`, `wbsearchentities`). Reads are anonymous;
//! writes fetch a CSRF token first and log in when credentials are present.

use super::item::{ClaimValue, Coordinate, Item, ItemId};
use super::traits::{ItemRepository, RepoError, RepoResult, SubmitOutcome};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

const DEFAULT_USER_AGENT: &str = "artsync/0.1 (+https://github.com/nrgforge/artsync)";

/// Reference globe for submitted coordinates
const GLOBE_EARTH: &str = "http://www.wikidata.org/entity/Q2";

/// API error codes treated as per-fact rejections rather than run failures.
/// Unsupported-globe and other bad-value refusals surface as `invalid-snak`
/// or `modification-failed`; a sitelink to a page the target wiki does not
/// have comes back as `no-external-page`.
const RECOVERABLE_ERRORS: &[&str] = &["invalid-snak", "modification-failed", "no-external-page"];

/// Error codes meaning the requested item is absent or unaddressable.
/// `fetch_item` maps these to `None` so the caller skips the row.
const MISSING_ENTITY_ERRORS: &[&str] = &["no-such-entity", "invalid-entity-id"];

/// Bot credentials for authenticated editing
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Wikibase action-API repository
///
/// One HTTP client with a cookie store for the whole run; the CSRF token is
/// fetched lazily before the first write and cached for the session.
pub struct ApiRepository {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    csrf_token: Mutex<Option<String>>,
}

impl ApiRepository {
    /// Create a client for the given action-API endpoint
    pub fn new(endpoint: impl Into<String>) -> RepoResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials: None,
            csrf_token: Mutex::new(None),
        })
    }

    /// Attach bot credentials; without them writes are attempted anonymously
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn get(&self, params: &[(&str, &str)]) -> RepoResult<Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json")])
            .query(params)
            .send()?
            .error_for_status()?;
        let value: Value = response.json()?;
        if let Some(error) = value.get("error") {
            return Err(api_error(error));
        }
        Ok(value)
    }

    /// POST a form without interpreting API errors; callers classify them
    fn post(&self, params: &[(&str, String)]) -> RepoResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("format", "json")])
            .form(params)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Return the session CSRF token, logging in first when credentials are
    /// present. MediaWiki hands anonymous sessions a placeholder token, so
    /// this succeeds either way; the API rejects the edit later if anonymous
    /// editing is off.
    fn ensure_token(&self) -> RepoResult<String> {
        if let Some(token) = self.csrf_token.lock().unwrap().as_ref() {
            return Ok(token.clone());
        }
        if let Some(credentials) = &self.credentials {
            self.login(credentials)?;
        }
        let value = self.get(&[("action", "query"), ("meta", "tokens"), ("type", "csrf")])?;
        let token = value
            .pointer("/query/tokens/csrftoken")
            .and_then(Value::as_str)
            .ok_or_else(|| RepoError::Malformed("token response missing csrftoken".into()))?
            .to_string();
        *self.csrf_token.lock().unwrap() = Some(token.clone());
        Ok(token)
    }

    /// Two-step bot login: fetch a login token, then post the credentials
    fn login(&self, credentials: &Credentials) -> RepoResult<()> {
        let value = self.get(&[("action", "query"), ("meta", "tokens"), ("type", "login")])?;
        let login_token = value
            .pointer("/query/tokens/logintoken")
            .and_then(Value::as_str)
            .ok_or_else(|| RepoError::Malformed("token response missing logintoken".into()))?
            .to_string();
        let params = [
            ("action", "login".to_string()),
            ("lgname", credentials.username.clone()),
            ("lgpassword", credentials.password.clone()),
            ("lgtoken", login_token),
        ];
        let value = self.post(&params)?;
        match value.pointer("/login/result").and_then(Value::as_str) {
            Some("Success") => {
                info!(user = %credentials.username, "logged in to knowledge base");
                Ok(())
            }
            Some(other) => Err(RepoError::Auth(format!("login failed: {other}"))),
            None => Err(RepoError::Auth("login response missing result".into())),
        }
    }
}

impl ItemRepository for ApiRepository {
    fn fetch_item(&self, id: &ItemId) -> RepoResult<Option<Item>> {
        let value = match self.get(&[
            ("action", "wbgetentities"),
            ("ids", id.as_str()),
            ("props", "claims|labels|sitelinks"),
            ("redirects", "yes"),
        ]) {
            Ok(value) => value,
            Err(RepoError::Api { code, .. })
                if MISSING_ENTITY_ERRORS.contains(&code.as_str()) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };
        let response: EntitiesResponse = serde_json::from_value(value)?;
        let Some(payload) = response.entities.into_values().next() else {
            return Ok(None);
        };
        if payload.missing.is_some() {
            return Ok(None);
        }
        Ok(Some(payload.into_item(id)))
    }

    fn add_claim(
        &self,
        id: &ItemId,
        property: &str,
        value: &ClaimValue,
    ) -> RepoResult<SubmitOutcome> {
        let token = self.ensure_token()?;
        let params = [
            ("action", "wbcreateclaim".to_string()),
            ("entity", id.as_str().to_string()),
            ("property", property.to_string()),
            ("snaktype", "value".to_string()),
            ("value", claim_json(value).to_string()),
            ("summary", format!("Add {property} claim")),
            ("token", token),
        ];
        classify(&self.post(&params)?)
    }

    fn set_label(&self, id: &ItemId, language: &str, text: &str) -> RepoResult<SubmitOutcome> {
        let token = self.ensure_token()?;
        let params = [
            ("action", "wbsetlabel".to_string()),
            ("id", id.as_str().to_string()),
            ("language", language.to_string()),
            ("value", text.to_string()),
            ("summary", format!("Add {language} label")),
            ("token", token),
        ];
        classify(&self.post(&params)?)
    }

    fn set_sitelink(&self, id: &ItemId, site: &str, title: &str) -> RepoResult<SubmitOutcome> {
        let token = self.ensure_token()?;
        let params = [
            ("action", "wbsetsitelink".to_string()),
            ("id", id.as_str().to_string()),
            ("linksite", site.to_string()),
            ("linktitle", title.to_string()),
            ("summary", "Set sitelink".to_string()),
            ("token", token),
        ];
        classify(&self.post(&params)?)
    }

    fn search_items(
        &self,
        query: &str,
        language: &str,
        limit: usize,
    ) -> RepoResult<Vec<ItemId>> {
        let limit = limit.to_string();
        let value = self.get(&[
            ("action", "wbsearchentities"),
            ("search", query),
            ("language", language),
            ("type", "item"),
            ("limit", limit.as_str()),
        ])?;
        let response: SearchResponse = serde_json::from_value(value)?;
        Ok(response.search.into_iter().map(|hit| ItemId::new(hit.id)).collect())
    }
}

fn api_error(error: &Value) -> RepoError {
    RepoError::Api {
        code: error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        info: error
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}

/// Split a mutation response into added / rejected / fatal
fn classify(value: &Value) -> RepoResult<SubmitOutcome> {
    let Some(error) = value.get("error") else {
        return Ok(SubmitOutcome::Added);
    };
    let code = error.get("code").and_then(Value::as_str).unwrap_or("unknown");
    if RECOVERABLE_ERRORS.contains(&code) {
        let info = error.get("info").and_then(Value::as_str).unwrap_or(code);
        Ok(SubmitOutcome::Rejected(info.to_string()))
    } else {
        Err(api_error(error))
    }
}

/// Wire form of a claim value for `wbcreateclaim`
fn claim_json(value: &ClaimValue) -> Value {
    match value {
        ClaimValue::Item(id) => json!({ "entity-type": "item", "id": id.as_str() }),
        ClaimValue::Coordinate(c) => json!({
            "latitude": c.latitude,
            "longitude": c.longitude,
            "precision": c.precision,
            "globe": GLOBE_EARTH,
        }),
        ClaimValue::Text(text) => json!(text),
        ClaimValue::Time(time) => json!({
            "time": time,
            "timezone": 0,
            "before": 0,
            "after": 0,
            "precision": 11,
            "calendarmodel": "http://www.wikidata.org/entity/Q1985727",
        }),
    }
}

// --- response payloads -----------------------------------------------------

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, EntityPayload>,
}

#[derive(Deserialize)]
struct EntityPayload {
    id: Option<String>,
    /// Present (as an empty string) when the item does not exist
    missing: Option<String>,
    #[serde(default)]
    claims: HashMap<String, Vec<StatementPayload>>,
    #[serde(default)]
    labels: HashMap<String, TermPayload>,
    #[serde(default)]
    sitelinks: HashMap<String, SitelinkPayload>,
}

impl EntityPayload {
    fn into_item(self, requested: &ItemId) -> Item {
        let id = self.id.map(ItemId::new).unwrap_or_else(|| requested.clone());
        let mut item = Item::new(id);
        for (property, statements) in self.claims {
            // Insert the key even when no statement value is modeled below:
            // an unmodeled value kind still marks the property as populated.
            let values = item.claims.entry(property).or_default();
            for statement in statements {
                if let Some(value) = statement.mainsnak.claim_value() {
                    values.push(value);
                }
            }
        }
        for (language, term) in self.labels {
            item.labels.insert(language, term.value);
        }
        for (site, link) in self.sitelinks {
            item.sitelinks.insert(site, link.title);
        }
        item
    }
}

#[derive(Deserialize)]
struct StatementPayload {
    mainsnak: SnakPayload,
}

#[derive(Deserialize)]
struct SnakPayload {
    /// Absent for novalue/somevalue snaks
    datavalue: Option<DataValuePayload>,
}

impl SnakPayload {
    fn claim_value(&self) -> Option<ClaimValue> {
        let datavalue = self.datavalue.as_ref()?;
        match datavalue.kind.as_str() {
            "wikibase-entityid" => datavalue
                .value
                .get("id")
                .and_then(Value::as_str)
                .map(|id| ClaimValue::Item(ItemId::new(id))),
            "globecoordinate" => {
                let latitude = datavalue.value.get("latitude")?.as_f64()?;
                let longitude = datavalue.value.get("longitude")?.as_f64()?;
                let precision = datavalue
                    .value
                    .get("precision")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                Some(ClaimValue::Coordinate(Coordinate {
                    latitude,
                    longitude,
                    precision,
                }))
            }
            "string" => datavalue
                .value
                .as_str()
                .map(|s| ClaimValue::Text(s.to_string())),
            "time" => datavalue
                .value
                .get("time")
                .and_then(Value::as_str)
                .map(|t| ClaimValue::Time(t.to_string())),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct DataValuePayload {
    #[serde(rename = "type")]
    kind: String,
    value: Value,
}

#[derive(Deserialize)]
struct TermPayload {
    value: String,
}

#[derive(Deserialize)]
struct SitelinkPayload {
    title: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: String,
}
