use crate::http::Request;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// JSON document returned for every echoed request
///
/// Field order on the wire follows declaration order. `body_json` is skipped
/// entirely when `None`; `Some(Value::Null)` serializes as `"bodyJson": null`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoPayload {
    pub ok: bool,
    pub method: String,
    pub path: String,
    pub query: String,
    /// Milliseconds since the Unix epoch when the request was handled
    pub ts: i64,
    pub headers: EchoHeaders,
    pub body_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_json: Option<Value>,
}

impl EchoPayload {
    /// Describes `request` as seen at `ts`
    pub fn from_request(request: &Request, ts: i64) -> Self {
        let body_text = String::from_utf8_lossy(&request.body).into_owned();
        let body_json = looks_like_json(request.content_type(), &body_text)
            .then(|| parse_body_json(&body_text));

        Self {
            ok: true,
            method: request.method.as_str().to_string(),
            path: request.path.clone(),
            query: request.query.clone().unwrap_or_default(),
            ts,
            headers: EchoHeaders::from_pairs(&request.headers),
            body_text,
            body_json,
        }
    }
}

/// Whether the body should also be reported as parsed JSON
pub fn looks_like_json(content_type: Option<&str>, body_text: &str) -> bool {
    let declared = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    let trimmed = body_text.trim();
    declared || trimmed.starts_with('{') || trimmed.starts_with('[')
}

/// Best-effort parse; blank or invalid input becomes `null`
pub fn parse_body_json(body_text: &str) -> Value {
    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Body is not valid JSON");
            Value::Null
        }
    }
}

/// Request headers as a JSON object
///
/// Names keep their received casing and order. A name repeated with the exact
/// same spelling keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoHeaders(Vec<(String, String)>);

impl EchoHeaders {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut out: Vec<(String, String)> = Vec::with_capacity(pairs.len());
        for (name, value) in pairs {
            match out.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value.clone(),
                None => out.push((name.clone(), value.clone())),
            }
        }
        Self(out)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EchoHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
