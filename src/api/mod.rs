//! HTTP client for the remote recipe service.
//!
//! All endpoints are read-only GETs returning a JSON envelope whose payload
//! is either a list of records or null when there are no results. A null or
//! absent payload decodes to zero results, never an error.

use std::time::Duration;

use serde::Deserialize;

use crate::models::{Category, Meal};

#[derive(Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<Meal>>,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

/// Client for the remote recipe API.
pub struct RecipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecipeClient {
    /// Creates a client against `base_url` with a bounded request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Fetches one random meal.
    pub async fn random_meal(&self) -> Result<Meal, ApiError> {
        let envelope: MealsEnvelope = self.get_json("random.php".to_string()).await?;
        envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(ApiError::EmptyReply)
    }

    /// Looks up a meal by id. Returns `None` when the id is unknown.
    pub async fn lookup(&self, id: &str) -> Result<Option<Meal>, ApiError> {
        let path = format!("lookup.php?i={}", urlencoding::encode(id));
        let envelope: MealsEnvelope = self.get_json(path).await?;
        Ok(envelope.meals.unwrap_or_default().into_iter().next())
    }

    /// Searches meals by name.
    pub async fn search(&self, term: &str) -> Result<Vec<Meal>, ApiError> {
        let path = format!("search.php?s={}", urlencoding::encode(term));
        let envelope: MealsEnvelope = self.get_json(path).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    /// Lists all categories.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: CategoriesEnvelope = self.get_json("categories.php".to_string()).await?;
        Ok(envelope.categories.unwrap_or_default())
    }

    /// Lists the abbreviated meal records in a category.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Meal>, ApiError> {
        let path = format!("filter.php?c={}", urlencoding::encode(category));
        let envelope: MealsEnvelope = self.get_json(path).await?;
        Ok(envelope.meals.unwrap_or_default())
    }

    /// Issues a GET, retrying once on a transport failure.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path_and_query: String,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path_and_query);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(first) => {
                tracing::debug!("Retrying {} after transport error: {}", url, first);
                self.http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Errors from remote recipe service calls.
#[derive(Debug)]
pub enum ApiError {
    /// Failed to construct the HTTP client.
    Client(String),
    /// Network-level failure, after the retry.
    Transport(String),
    /// Server answered with a non-success status.
    Status(u16),
    /// Response body did not match the expected envelope.
    Decode(String),
    /// An endpoint that must return a record returned none.
    EmptyReply,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Client(e) => write!(f, "Failed to build HTTP client: {}", e),
            ApiError::Transport(e) => write!(f, "Network error: {}", e),
            ApiError::Status(code) => write!(f, "Recipe service returned status {}", code),
            ApiError::Decode(e) => write!(f, "Unexpected response from recipe service: {}", e),
            ApiError::EmptyReply => write!(f, "Recipe service returned no record"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_meals_payload_is_zero_results() {
        let envelope: MealsEnvelope = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_absent_meals_payload_is_zero_results() {
        let envelope: MealsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.meals.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_meals_envelope_decodes_records() {
        let envelope: MealsEnvelope = serde_json::from_str(
            r#"{"meals": [
                {"idMeal": "52772", "strMeal": "Teriyaki Chicken Casserole",
                 "strMealThumb": "https://example.com/teriyaki.jpg",
                 "strIngredient1": "soy sauce", "strMeasure1": "3/4 cup"}
            ]}"#,
        )
        .unwrap();

        let meals = envelope.meals.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");
        assert_eq!(meals[0].ingredients().len(), 1);
    }

    #[test]
    fn test_categories_envelope_decodes_records() {
        let envelope: CategoriesEnvelope = serde_json::from_str(
            r#"{"categories": [
                {"idCategory": "1", "strCategory": "Beef",
                 "strCategoryThumb": "https://example.com/beef.png"}
            ]}"#,
        )
        .unwrap();

        let categories = envelope.categories.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Beef");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RecipeClient::new("https://example.com/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://example.com/api");
    }
}
