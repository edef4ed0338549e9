//! Locality geocoding through Nominatim.

use forecast_common::QueryPoint;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{LookupError, LookupResult};

const SERVICE: &str = "Nominatim";

/// A Bhutanese address: locality within a gewog or thromde within a dzongkhag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub locality: String,
    pub gewog_or_thromde: String,
    pub dzongkhag: String,
}

impl LocationQuery {
    pub fn new(
        locality: impl Into<String>,
        gewog_or_thromde: impl Into<String>,
        dzongkhag: impl Into<String>,
    ) -> Self {
        Self {
            locality: locality.into(),
            gewog_or_thromde: gewog_or_thromde.into(),
            dzongkhag: dzongkhag.into(),
        }
    }

    /// Free-text search string sent to Nominatim.
    pub fn search_text(&self) -> String {
        format!(
            "{}, {}, {}, Bhutan",
            self.locality.trim(),
            self.gewog_or_thromde.trim(),
            self.dzongkhag.trim()
        )
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.locality, self.gewog_or_thromde, self.dzongkhag
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Client for the Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Resolve a location to coordinates. `Ok(None)` when nothing matches.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &LocationQuery) -> LookupResult<Option<QueryPoint>> {
        let text = query.search_text();
        debug!(url = %self.base_url, q = %text, "Geocoding location");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", text.as_str()), ("format", "json")])
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
        let point = parse_search_response(&body)?;

        match point {
            Some(p) => info!(lat = p.latitude, lon = p.longitude, "Location resolved"),
            None => info!("Location not found"),
        }

        Ok(point)
    }
}

/// Take the first hit of a Nominatim JSON response.
pub fn parse_search_response(body: &str) -> LookupResult<Option<QueryPoint>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|source| LookupError::Decode {
        service: SERVICE,
        source,
    })?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let latitude = parse_coordinate(&hit.lat)?;
    let longitude = parse_coordinate(&hit.lon)?;
    Ok(Some(QueryPoint::new(latitude, longitude)))
}

fn parse_coordinate(raw: &str) -> LookupResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LookupError::InvalidCoordinate {
            service: SERVICE,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text() {
        let query = LocationQuery::new("Changzamtog", " Thimphu Thromde ", "Thimphu");
        assert_eq!(
            query.search_text(),
            "Changzamtog, Thimphu Thromde, Thimphu, Bhutan"
        );
    }

    #[test]
    fn test_parse_first_hit() {
        let body = r#"[
            {"place_id": 1, "lat": "27.4580", "lon": "89.6370", "display_name": "Changzamtog"},
            {"place_id": 2, "lat": "27.0", "lon": "89.0", "display_name": "Elsewhere"}
        ]"#;
        let point = parse_search_response(body).unwrap().unwrap();
        assert_eq!(point, QueryPoint::new(27.4580, 89.6370));
    }

    #[test]
    fn test_parse_no_hits() {
        assert_eq!(parse_search_response("[]").unwrap(), None);
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_search_response("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode { .. }));
    }

    #[test]
    fn test_parse_bad_coordinate() {
        let err = parse_search_response(r#"[{"lat": "north", "lon": "89.6"}]"#).unwrap_err();
        assert!(matches!(err, LookupError::InvalidCoordinate { value, .. } if value == "north"));
    }
}
