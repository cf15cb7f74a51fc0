//! Durable favorites list backed by the local key-value store.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::KvStore;
use crate::models::Meal;

/// Storage key holding the entire favorites list.
const FAVORITES_KEY: &str = "favorite_meals";

/// Version of the persisted favorites record.
const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct FavoritesRecord {
    version: u32,
    meals: Vec<Meal>,
}

/// Owns the persisted favorites list: unique by meal id, insertion-ordered.
///
/// Mutations run as a full read-modify-write over the whole list and are
/// serialized through an in-process lock, so overlapping calls apply in
/// arrival order. Each effective mutation is exactly one durable write;
/// reads never write. Unreadable or missing records degrade to an empty
/// list rather than an error.
pub struct FavoritesStore {
    kv: KvStore,
    mutation_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(kv: KvStore) -> Self {
        Self {
            kv,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Returns the favorites list in insertion order.
    pub async fn list(&self) -> Vec<Meal> {
        self.load().await
    }

    /// Membership test by meal id. An empty id is never a favorite.
    pub async fn is_favorite(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.load().await.iter().any(|m| m.id == id)
    }

    /// Appends `meal` unless its id is already present.
    ///
    /// Returns `Ok(true)` when the list changed and `Ok(false)` for the
    /// idempotent no-op on an already-favorited id, which leaves the
    /// existing entry and its position untouched.
    pub async fn add(&self, meal: &Meal) -> Result<bool, FavoritesError> {
        if meal.id.is_empty() {
            return Err(FavoritesError::EmptyMealId);
        }

        let _guard = self.mutation_lock.lock().await;
        let mut meals = self.load().await;
        if meals.iter().any(|m| m.id == meal.id) {
            return Ok(false);
        }
        meals.push(meal.clone());
        self.store(meals).await?;
        Ok(true)
    }

    /// Removes the entry with `id`, if any.
    ///
    /// Returns `Ok(false)` for the idempotent no-op on an absent id.
    pub async fn remove(&self, id: &str) -> Result<bool, FavoritesError> {
        if id.is_empty() {
            return Err(FavoritesError::EmptyMealId);
        }

        let _guard = self.mutation_lock.lock().await;
        let mut meals = self.load().await;
        let before = meals.len();
        meals.retain(|m| m.id != id);
        if meals.len() == before {
            return Ok(false);
        }
        self.store(meals).await?;
        Ok(true)
    }

    /// Flips membership for `meal` and returns the resulting state.
    ///
    /// The membership check and the mutation happen under the same lock
    /// acquisition, so rapid repeated toggles apply strictly in order.
    pub async fn toggle(&self, meal: &Meal) -> Result<bool, FavoritesError> {
        if meal.id.is_empty() {
            return Err(FavoritesError::EmptyMealId);
        }

        let _guard = self.mutation_lock.lock().await;
        let mut meals = self.load().await;
        match meals.iter().position(|m| m.id == meal.id) {
            Some(pos) => {
                meals.remove(pos);
                self.store(meals).await?;
                Ok(false)
            }
            None => {
                meals.push(meal.clone());
                self.store(meals).await?;
                Ok(true)
            }
        }
    }

    async fn load(&self) -> Vec<Meal> {
        let raw = match self.kv.get(FAVORITES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites record: {}", e);
                return Vec::new();
            }
        };

        decode_record(&raw).unwrap_or_else(|e| {
            tracing::warn!("Unreadable favorites record, treating as empty: {}", e);
            Vec::new()
        })
    }

    async fn store(&self, meals: Vec<Meal>) -> Result<(), FavoritesError> {
        let record = FavoritesRecord {
            version: SCHEMA_VERSION,
            meals,
        };
        let encoded = serde_json::to_string(&record).map_err(FavoritesError::Encode)?;
        self.kv
            .set(FAVORITES_KEY, &encoded)
            .await
            .map_err(FavoritesError::Storage)
    }
}

/// Decodes a persisted favorites record.
///
/// Accepts the versioned envelope and, for records written before the
/// envelope existed, a bare array of meals.
fn decode_record(raw: &str) -> Result<Vec<Meal>, serde_json::Error> {
    match serde_json::from_str::<FavoritesRecord>(raw) {
        Ok(record) => Ok(record.meals),
        Err(_) => serde_json::from_str::<Vec<Meal>>(raw),
    }
}

/// Errors from favorites mutations. Reads never surface errors.
#[derive(Debug)]
pub enum FavoritesError {
    /// Meal identifier was empty.
    EmptyMealId,
    /// The underlying key-value store failed; prior state is unchanged.
    Storage(sqlx::Error),
    /// Failed to encode the favorites record.
    Encode(serde_json::Error),
}

impl std::fmt::Display for FavoritesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoritesError::EmptyMealId => write!(f, "Meal id cannot be empty"),
            FavoritesError::Storage(e) => write!(f, "Favorites storage error: {}", e),
            FavoritesError::Encode(e) => write!(f, "Failed to encode favorites: {}", e),
        }
    }
}

impl std::error::Error for FavoritesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FavoritesError::EmptyMealId => None,
            FavoritesError::Storage(e) => Some(e),
            FavoritesError::Encode(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        store: FavoritesStore,
        kv: KvStore,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_store() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(db_path).await.unwrap();
        let kv = KvStore::new(pool);
        TestContext {
            store: FavoritesStore::new(kv.clone()),
            kv,
            _temp_dir: temp_dir,
        }
    }

    fn meal(id: &str, name: &str) -> Meal {
        Meal::new(id, name).with_thumbnail(format!("https://example.com/{}.jpg", id))
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let ctx = setup_store().await;
        assert!(ctx.store.list().await.is_empty());
        assert!(!ctx.store.is_favorite("52772").await);
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let ctx = setup_store().await;

        let added = ctx
            .store
            .add(&meal("52772", "Teriyaki Chicken Casserole"))
            .await
            .unwrap();
        assert!(added);

        let meals = ctx.store.list().await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");
        assert!(ctx.store.is_favorite("52772").await);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let ctx = setup_store().await;
        let m = meal("52772", "Teriyaki Chicken Casserole");

        assert!(ctx.store.add(&m).await.unwrap());
        assert!(!ctx.store.add(&m).await.unwrap());

        let meals = ctx.store.list().await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let ctx = setup_store().await;
        ctx.store.add(&meal("1", "Soup")).await.unwrap();

        assert!(!ctx.store.remove("999").await.unwrap());
        assert_eq!(ctx.store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_remove_scenario() {
        let ctx = setup_store().await;
        let m = meal("52772", "Teriyaki Chicken Casserole");

        assert!(ctx.store.list().await.is_empty());

        ctx.store.add(&m).await.unwrap();
        assert_eq!(ctx.store.list().await.len(), 1);

        ctx.store.add(&m).await.unwrap();
        let meals = ctx.store.list().await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");

        assert!(ctx.store.remove("52772").await.unwrap());
        assert!(ctx.store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let ctx = setup_store().await;

        ctx.store.add(&meal("1", "First")).await.unwrap();
        ctx.store.add(&meal("2", "Second")).await.unwrap();
        ctx.store.add(&meal("3", "Third")).await.unwrap();
        ctx.store.remove("2").await.unwrap();
        ctx.store.add(&meal("4", "Fourth")).await.unwrap();

        let meals = ctx.store.list().await;
        let ids: Vec<&str> = meals.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[tokio::test]
    async fn test_no_duplicate_ids() {
        let ctx = setup_store().await;

        ctx.store.add(&meal("1", "A")).await.unwrap();
        ctx.store.add(&meal("2", "B")).await.unwrap();
        ctx.store.add(&meal("1", "A again")).await.unwrap();
        ctx.store.toggle(&meal("2", "B")).await.unwrap();
        ctx.store.toggle(&meal("2", "B")).await.unwrap();

        let meals = ctx.store.list().await;
        let mut ids: Vec<&str> = meals.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), meals.len());
    }

    #[tokio::test]
    async fn test_toggle_twice() {
        let ctx = setup_store().await;
        let m = meal("52772", "Teriyaki Chicken Casserole");

        assert!(ctx.store.toggle(&m).await.unwrap());
        assert!(ctx.store.is_favorite("52772").await);

        assert!(!ctx.store.toggle(&m).await.unwrap());
        assert!(!ctx.store.is_favorite("52772").await);
    }

    #[tokio::test]
    async fn test_toggle_on_existing_favorite() {
        let ctx = setup_store().await;
        let m = meal("52772", "Teriyaki Chicken Casserole");

        ctx.store.add(&m).await.unwrap();
        assert!(!ctx.store.toggle(&m).await.unwrap());
        assert!(ctx.store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_toggles_do_not_corrupt() {
        let ctx = setup_store().await;
        let m = meal("52772", "Teriyaki Chicken Casserole");

        let (first, second) = tokio::join!(ctx.store.toggle(&m), ctx.store.toggle(&m));
        let first = first.unwrap();
        let second = second.unwrap();

        // Two completed toggles from empty: one adds, one removes.
        assert_ne!(first, second);
        assert!(ctx.store.list().await.is_empty());
        assert!(!ctx.store.is_favorite("52772").await);
    }

    #[tokio::test]
    async fn test_empty_id_rejected() {
        let ctx = setup_store().await;

        assert!(matches!(
            ctx.store.add(&meal("", "Nameless")).await,
            Err(FavoritesError::EmptyMealId)
        ));
        assert!(matches!(
            ctx.store.remove("").await,
            Err(FavoritesError::EmptyMealId)
        ));
        assert!(!ctx.store.is_favorite("").await);
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_empty() {
        let ctx = setup_store().await;
        ctx.kv.set("favorite_meals", "not valid json{{").await.unwrap();

        assert!(ctx.store.list().await.is_empty());
        assert!(!ctx.store.is_favorite("52772").await);

        // The store recovers on the next write.
        ctx.store.add(&meal("1", "Fresh start")).await.unwrap();
        assert_eq!(ctx.store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_legacy_bare_array_record() {
        let ctx = setup_store().await;
        ctx.kv
            .set(
                "favorite_meals",
                r#"[{"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole","strMealThumb":null}]"#,
            )
            .await
            .unwrap();

        let meals = ctx.store.list().await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52772");
    }

    #[tokio::test]
    async fn test_versioned_envelope_written() {
        let ctx = setup_store().await;
        ctx.store.add(&meal("1", "Soup")).await.unwrap();

        let raw = ctx.kv.get("favorite_meals").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["meals"].is_array());
    }

    #[tokio::test]
    async fn test_failed_write_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(db_path).await.unwrap();
        let store = FavoritesStore::new(KvStore::new(pool.clone()));

        store.add(&meal("1", "Kept")).await.unwrap();
        pool.close().await;

        // Writes surface the failure; reads degrade to empty.
        assert!(store.add(&meal("2", "Lost")).await.is_err());
        assert!(store.list().await.is_empty());
    }
}
