//! Read-only client for the public game-deals API (CheapShark-compatible).

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use utoipa::ToSchema;

/// Base URL used when `DEALS_API_URL` is not set.
pub const DEFAULT_DEALS_API_URL: &str = "https://www.cheapshark.com/api/1.0";

/// Result alias for deals API calls.
pub type DealsResult<T> = Result<T, DealsError>;

/// Failures talking to the deals API.
#[derive(Debug, Error)]
pub enum DealsError {
    /// The HTTP client could not be constructed.
    #[error("failed to build deals API client")]
    ClientBuilder {
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },
    /// The request never produced a response.
    #[error("failed to reach deals API at `{path}`")]
    Request {
        /// Request path relative to the base URL.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a non-success status.
    #[error("deals API returned status {status} for `{path}`")]
    Status {
        /// Request path relative to the base URL.
        path: String,
        /// Status code returned by the API.
        status: StatusCode,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode deals API response for `{path}`")]
    Decode {
        /// Request path relative to the base URL.
        path: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// Lookup for a game id the API does not know.
    #[error("deals API has no game with id `{0}`")]
    UnknownGame(String),
}

/// One entry of `GET /deals`. Prices are decimal strings, as the API sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    /// Game title.
    pub title: String,
    /// Deals API game identifier.
    #[serde(rename = "gameID")]
    pub game_id: String,
    /// Deal identifier.
    #[serde(rename = "dealID", default)]
    pub deal_id: String,
    /// Store identifier.
    #[serde(rename = "storeID", default)]
    pub store_id: String,
    /// Current price.
    pub sale_price: String,
    /// Price before the discount.
    pub normal_price: String,
    /// Discount percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
    /// Metacritic score, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metacritic_score: Option<String>,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Optional filters forwarded to `GET /deals`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealsQuery {
    /// Title substring filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Maximum sale price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_price: Option<f64>,
    /// Number of deals per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GameLookup {
    info: GameLookupInfo,
    #[serde(default)]
    deals: Vec<GameLookupDeal>,
}

#[derive(Debug, Deserialize)]
struct GameLookupInfo {
    title: String,
    #[serde(default)]
    thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameLookupDeal {
    #[serde(rename = "dealID", default)]
    deal_id: String,
    #[serde(rename = "storeID", default)]
    store_id: String,
    price: String,
    retail_price: String,
    #[serde(default)]
    savings: Option<String>,
}

impl GameLookup {
    /// Flatten a lookup into the shape of a deal row, using its cheapest listed deal.
    fn into_deal(self, game_id: &str) -> DealRecord {
        let best = self.deals.into_iter().min_by(|a, b| {
            let price = |deal: &GameLookupDeal| deal.price.parse::<f64>().unwrap_or(f64::MAX);
            price(a).total_cmp(&price(b))
        });
        let (deal_id, store_id, sale_price, normal_price, savings) = match best {
            Some(deal) => (
                deal.deal_id,
                deal.store_id,
                deal.price,
                deal.retail_price,
                deal.savings,
            ),
            None => (String::new(), String::new(), "0.00".into(), "0.00".into(), None),
        };

        DealRecord {
            title: self.info.title,
            game_id: game_id.to_owned(),
            deal_id,
            store_id,
            sale_price,
            normal_price,
            savings,
            metacritic_score: None,
            thumb: self.info.thumb,
        }
    }
}

/// HTTP client for the deals API, cheap to clone.
#[derive(Clone)]
pub struct DealsClient {
    client: Client,
    base_url: Arc<str>,
}

impl DealsClient {
    /// Build a client rooted at `base_url`; a trailing slash is ignored.
    pub fn new(base_url: &str) -> DealsResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| DealsError::ClientBuilder { source })?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Current deals matching `query`.
    pub async fn list_deals(&self, query: &DealsQuery) -> DealsResult<Vec<DealRecord>> {
        let path = "deals";
        let response = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .send()
            .await
            .map_err(|source| DealsError::Request {
                path: path.into(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DealsError::Status {
                path: path.into(),
                status,
            });
        }

        let deals = response
            .json::<Vec<DealRecord>>()
            .await
            .map_err(|source| DealsError::Decode {
                path: path.into(),
                source,
            })?;
        debug!(count = deals.len(), "fetched deals");
        Ok(deals)
    }

    /// Look a single game up by its deals-API id.
    pub async fn find_game(&self, game_id: &str) -> DealsResult<DealRecord> {
        let path = format!("games?id={game_id}");
        let response = self
            .client
            .get(format!("{}/games", self.base_url))
            .query(&[("id", game_id)])
            .send()
            .await
            .map_err(|source| DealsError::Request {
                path: path.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(DealsError::UnknownGame(game_id.to_owned())),
            status if !status.is_success() => {
                return Err(DealsError::Status { path, status });
            }
            _ => {}
        }

        // The API answers an unknown id with `[]` rather than a 404.
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|source| DealsError::Decode {
                path: path.clone(),
                source,
            })?;
        let lookup: GameLookup = serde_json::from_value(body)
            .map_err(|_| DealsError::UnknownGame(game_id.to_owned()))?;
        Ok(lookup.into_deal(game_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_deal_row() {
        let raw = json!({
            "internalName": "HADES",
            "title": "Hades",
            "dealID": "abc",
            "storeID": "1",
            "gameID": "1234",
            "salePrice": "9.99",
            "normalPrice": "24.99",
            "isOnSale": "1",
            "savings": "60.02",
            "metacriticScore": "93",
            "thumb": "https://img.example/hades.jpg"
        });
        let deal: DealRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(deal.game_id, "1234");
        assert_eq!(deal.sale_price, "9.99");
        assert_eq!(deal.thumb.as_deref(), Some("https://img.example/hades.jpg"));
    }

    #[test]
    fn lookup_uses_cheapest_deal() {
        let lookup: GameLookup = serde_json::from_value(json!({
            "info": { "title": "Celeste", "thumb": "celeste.jpg" },
            "deals": [
                { "storeID": "1", "dealID": "a", "price": "12.00", "retailPrice": "19.99" },
                { "storeID": "7", "dealID": "b", "price": "4.99", "retailPrice": "19.99" }
            ]
        }))
        .unwrap();
        let deal = lookup.into_deal("77");
        assert_eq!(deal.title, "Celeste");
        assert_eq!(deal.game_id, "77");
        assert_eq!(deal.deal_id, "b");
        assert_eq!(deal.sale_price, "4.99");
        assert_eq!(deal.normal_price, "19.99");
    }

    #[test]
    fn query_omits_unset_filters() {
        let query = DealsQuery {
            title: Some("portal".into()),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded, json!({ "title": "portal" }));
    }
}
