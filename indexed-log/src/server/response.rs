//! HTTP response types for the query server.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Record;

/// Response body for range queries.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// `"OK"` on success.
    pub status: String,
    /// Server time when the response was built.
    pub time: DateTime<Utc>,
    /// Matching records, sorted by timestamp.
    pub body: Vec<Record>,
}

impl QueryResponse {
    /// Builds a success response.
    pub fn ok(time: DateTime<Utc>, body: Vec<Record>) -> Self {
        Self {
            status: "OK".to_string(),
            time,
            body,
        }
    }
}

/// Response body for health probes.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"OK"` when the service is up.
    pub status: String,
    /// Server time when the probe was answered.
    pub time: DateTime<Utc>,
}

impl HealthResponse {
    /// Builds a healthy response.
    pub fn ok(time: DateTime<Utc>) -> Self {
        Self {
            status: "OK".to_string(),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_empty_query_response() {
        // given
        let response = QueryResponse::ok(Utc::now(), Vec::new());

        // when
        let json = serde_json::to_string(&response).unwrap();

        // then
        assert!(json.contains(r#""status":"OK""#));
        assert!(json.contains(r#""body":[]"#));
    }

    #[test]
    fn should_serialize_health_response() {
        // given
        let response = HealthResponse::ok(Utc::now());

        // when
        let json = serde_json::to_string(&response).unwrap();

        // then
        assert!(json.contains(r#""status":"OK""#));
        assert!(json.contains(r#""time":"#));
    }
}
