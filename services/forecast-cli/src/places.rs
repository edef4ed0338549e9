//! Nearby named places through the Overpass API.

use std::collections::HashMap;

use forecast_common::{NamedPlace, QueryPoint};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{LookupError, LookupResult};

const SERVICE: &str = "Overpass";

/// Upper bound on places returned by one lookup.
pub const MAX_PLACES: usize = 10;

const PLACE_KINDS: [&str; 4] = ["city", "town", "village", "hamlet"];

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Client for the Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl OverpassClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    /// Named settlements within `radius_m` metres of `center`.
    #[instrument(skip(self), fields(lat = center.latitude, lon = center.longitude))]
    pub async fn nearby(&self, center: QueryPoint, radius_m: u32) -> LookupResult<Vec<NamedPlace>> {
        let query = overpass_query(center, radius_m, self.timeout_secs);
        debug!(url = %self.base_url, radius_m, "Querying nearby places");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let places = parse_places(&body)?;
        info!(count = places.len(), "Found nearby places");
        Ok(places)
    }
}

/// Overpass QL selecting settlement nodes around a point.
pub fn overpass_query(center: QueryPoint, radius_m: u32, timeout_secs: u64) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_secs);
    for kind in PLACE_KINDS {
        query.push_str(&format!(
            "  node[\"place\"=\"{}\"](around:{},{},{});\n",
            kind, radius_m, center.latitude, center.longitude
        ));
    }
    query.push_str(");\nout body;\n");
    query
}

/// Named nodes from an Overpass JSON response, in response order, at most
/// [`MAX_PLACES`].
pub fn parse_places(body: &str) -> LookupResult<Vec<NamedPlace>> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|source| LookupError::Decode {
            service: SERVICE,
            source,
        })?;

    let places = response
        .elements
        .into_iter()
        .filter_map(|element| {
            let name = element.tags.get("name")?.trim();
            if name.is_empty() {
                return None;
            }
            Some(NamedPlace::new(name, element.lat?, element.lon?))
        })
        .take(MAX_PLACES)
        .collect();

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_lists_every_place_kind() {
        let query = overpass_query(QueryPoint::new(27.458, 89.637), 10_000, 25);
        assert!(query.starts_with("[out:json][timeout:25];"));
        for kind in PLACE_KINDS {
            assert!(query.contains(&format!(
                "node[\"place\"=\"{}\"](around:10000,27.458,89.637);",
                kind
            )));
        }
        assert!(query.trim_end().ends_with("out body;"));
    }

    #[test]
    fn test_parse_keeps_named_nodes() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 27.47, "lon": 89.64, "tags": {"name": "Thimphu", "place": "city"}},
                {"type": "node", "id": 2, "lat": 27.45, "lon": 89.62, "tags": {"place": "hamlet"}},
                {"type": "node", "id": 3, "lat": 27.44, "lon": 89.66},
                {"type": "node", "id": 4, "lat": 27.50, "lon": 89.70, "tags": {"name": "Dechencholing", "place": "village"}}
            ]
        }"#;

        let places = parse_places(body).unwrap();
        assert_eq!(
            places,
            vec![
                NamedPlace::new("Thimphu", 27.47, 89.64),
                NamedPlace::new("Dechencholing", 27.50, 89.70),
            ]
        );
    }

    #[test]
    fn test_parse_truncates() {
        let elements: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"type": "node", "lat": 27.{0}, "lon": 89.{0}, "tags": {{"name": "Place {0}"}}}}"#,
                    i + 10
                )
            })
            .collect();
        let body = format!(r#"{{"elements": [{}]}}"#, elements.join(","));

        let places = parse_places(&body).unwrap();
        assert_eq!(places.len(), MAX_PLACES);
        assert_eq!(places[0].name, "Place 10");
        assert_eq!(places[9].name, "Place 19");
    }

    #[test]
    fn test_parse_without_elements() {
        assert!(parse_places("{}").unwrap().is_empty());
        assert!(matches!(
            parse_places("not json").unwrap_err(),
            LookupError::Decode { .. }
        ));
    }
}
