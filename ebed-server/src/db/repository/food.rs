//! Food Repository
//!
//! Catalog reads for the ordering UI plus admin create/update.

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{CATEGORY_MAIN_COURSE, Food, FoodCreate, FoodUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

/// Column list for `foods f`
pub(crate) const FOOD_COLUMNS: &str =
    "f.id, f.full_name, f.description, f.category, f.allergens, f.price, f.image_url, f.created_at";

pub const DEFAULT_FIRST_N: i64 = 8;
pub const MAX_FIRST_N: i64 = 100;
pub const SEARCH_LIMIT: i64 = 10;

/// Upper-case category, MAIN_COURSE when absent or blank
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_uppercase(),
        _ => CATEGORY_MAIN_COURSE.to_string(),
    }
}

/// Allergens are a set: trimmed, lower-cased, deduplicated, sorted
pub fn normalize_allergens(allergens: Vec<String>) -> Vec<String> {
    let mut set: Vec<String> = allergens
        .into_iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect();
    set.sort();
    set.dedup();
    set
}

/// Case folding used by the search columns
fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn check_price(price: i64) -> RepoResult<()> {
    if price < 0 {
        return Err(RepoError::business(ErrorCode::FoodInvalidPrice));
    }
    Ok(())
}

/// Insert a food on any executor (pool or open transaction).
///
/// `data.image_path` is stored as the final image URL.
pub async fn insert<'e, E>(exec: E, data: FoodCreate, now: i64) -> RepoResult<Food>
where
    E: SqliteExecutor<'e>,
{
    check_price(data.price)?;
    let id = shared::util::snowflake_id();
    let full_name = data.full_name.trim().to_string();
    let description = data.description.unwrap_or_default().trim().to_string();
    let category = normalize_category(data.category.as_deref());
    let allergens = normalize_allergens(data.allergens.unwrap_or_default());
    let allergens_json = serde_json::to_string(&allergens)
        .map_err(|e| RepoError::Validation(format!("Invalid allergens: {e}")))?;

    sqlx::query(
        "INSERT INTO foods (id, full_name, description, category, allergens, price, image_url, search_name, search_description, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(&full_name)
    .bind(&description)
    .bind(&category)
    .bind(&allergens_json)
    .bind(data.price)
    .bind(&data.image_path)
    .bind(fold(&full_name))
    .bind(fold(&description))
    .bind(now)
    .execute(exec)
    .await?;

    tracing::info!(food_id = id, name = %full_name, "Food created");

    Ok(Food {
        id,
        full_name,
        description,
        category,
        allergens,
        price: data.price,
        image_url: data.image_path,
        created_at: now,
    })
}

pub async fn create(pool: &SqlitePool, data: FoodCreate, now: i64) -> RepoResult<Food> {
    insert(pool, data, now).await
}

pub async fn find_by_id<'e, E>(exec: E, id: i64) -> RepoResult<Option<Food>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {FOOD_COLUMNS} FROM foods f WHERE f.id = ?");
    let row = sqlx::query_as::<_, Food>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Food> {
    find_by_id(pool, id).await?.ok_or_else(|| {
        RepoError::Business(ErrorCode::FoodNotFound, format!("Food {id} not found"))
    })
}

/// Partial update. Existing order items keep their frozen prices.
pub async fn update(pool: &SqlitePool, id: i64, data: FoodUpdate) -> RepoResult<Food> {
    if let Some(price) = data.price {
        check_price(price)?;
    }
    let full_name = data.full_name.map(|n| n.trim().to_string());
    let description = data.description.map(|d| d.trim().to_string());
    let category = data.category.map(|c| normalize_category(Some(&c)));
    let allergens_json = data
        .allergens
        .map(|a| serde_json::to_string(&normalize_allergens(a)))
        .transpose()
        .map_err(|e| RepoError::Validation(format!("Invalid allergens: {e}")))?;

    let rows = sqlx::query(
        "UPDATE foods SET full_name = COALESCE(?1, full_name), search_name = COALESCE(?2, search_name), description = COALESCE(?3, description), search_description = COALESCE(?4, search_description), category = COALESCE(?5, category), allergens = COALESCE(?6, allergens), price = COALESCE(?7, price), image_url = COALESCE(?8, image_url) WHERE id = ?9",
    )
    .bind(&full_name)
    .bind(full_name.as_deref().map(fold))
    .bind(&description)
    .bind(description.as_deref().map(fold))
    .bind(&category)
    .bind(&allergens_json)
    .bind(data.price)
    .bind(&data.image_path)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::FoodNotFound,
            format!("Food {id} not found"),
        ));
    }
    get(pool, id).await
}

/// First `n` foods in catalog order (n clamped to 1..=100)
pub async fn first_n(pool: &SqlitePool, n: i64) -> RepoResult<Vec<Food>> {
    let limit = n.clamp(1, MAX_FIRST_N);
    let sql = format!("SELECT {FOOD_COLUMNS} FROM foods f ORDER BY f.created_at, f.id LIMIT ?");
    let rows = sqlx::query_as::<_, Food>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Case-insensitive substring search over name and description.
///
/// Name matches rank ahead of description-only matches; at most 10 rows.
pub async fn search(pool: &SqlitePool, term: &str) -> RepoResult<Vec<Food>> {
    let pattern = format!("%{}%", escape_like(&fold(term)));
    let sql = format!(
        "SELECT {FOOD_COLUMNS} FROM foods f \
         WHERE f.search_name LIKE ?1 ESCAPE '\\' OR f.search_description LIKE ?1 ESCAPE '\\' \
         ORDER BY CASE WHEN f.search_name LIKE ?1 ESCAPE '\\' THEN 1 ELSE 2 END, f.full_name, f.id \
         LIMIT ?2"
    );
    let rows = sqlx::query_as::<_, Food>(&sql)
        .bind(&pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;

    pub(crate) async fn seed_food(pool: &SqlitePool, name: &str, category: &str, price: i64) -> Food {
        create(
            pool,
            FoodCreate {
                full_name: name.into(),
                category: Some(category.into()),
                price,
                ..Default::default()
            },
            shared::util::now_millis(),
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_normalize_allergens_is_a_set() {
        let out = normalize_allergens(vec![
            " Gluten".into(),
            "laktóz".into(),
            "gluten".into(),
            "".into(),
        ]);
        assert_eq!(out, vec!["gluten".to_string(), "laktóz".to_string()]);
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(Some("soup")), "SOUP");
        assert_eq!(normalize_category(Some("  ")), "MAIN_COURSE");
        assert_eq!(normalize_category(None), "MAIN_COURSE");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let food = create(
            &pool,
            FoodCreate {
                full_name: " Gulyásleves ".into(),
                description: Some("Marhahúsos leves".into()),
                category: Some("soup".into()),
                allergens: Some(vec!["Zeller".into(), "zeller".into()]),
                price: 1490,
                image_path: Some("https://cdn.example.com/gulyas.jpg".into()),
            },
            42,
        )
        .await
        .unwrap();

        let loaded = get(&pool, food.id).await.unwrap();
        assert_eq!(loaded, food);
        assert_eq!(loaded.full_name, "Gulyásleves");
        assert_eq!(loaded.category, "SOUP");
        assert_eq!(loaded.allergens, vec!["zeller".to_string()]);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let pool = test_pool().await;
        let err = create(
            &pool,
            FoodCreate {
                full_name: "Ingyen".into(),
                price: -1,
                ..Default::default()
            },
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::FoodInvalidPrice, _)));
    }

    #[tokio::test]
    async fn test_missing_food_is_not_found() {
        let pool = test_pool().await;
        assert!(find_by_id(&pool, 1).await.unwrap().is_none());
        let err = get(&pool, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::FoodNotFound, _)));
    }

    #[tokio::test]
    async fn test_first_n_in_creation_order() {
        let pool = test_pool().await;
        for i in 0..5 {
            seed_food(&pool, &format!("Étel {i}"), "MAIN_COURSE", 1000).await;
        }
        let foods = first_n(&pool, 3).await.unwrap();
        let names: Vec<_> = foods.iter().map(|f| f.full_name.as_str()).collect();
        assert_eq!(names, vec!["Étel 0", "Étel 1", "Étel 2"]);

        assert_eq!(first_n(&pool, 0).await.unwrap().len(), 1);
        assert_eq!(first_n(&pool, 1000).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_search_ranks_name_before_description() {
        let pool = test_pool().await;
        create(
            &pool,
            FoodCreate {
                full_name: "Rántott sajt".into(),
                description: Some("Tartármártással, csirke nélkül".into()),
                price: 1800,
                ..Default::default()
            },
            1,
        )
        .await
        .unwrap();
        seed_food(&pool, "Csirkepaprikás", "MAIN_COURSE", 2100).await;
        seed_food(&pool, "Bableves", "SOUP", 900).await;

        let results = search(&pool, "CSIRKE").await.unwrap();
        let names: Vec<_> = results.iter().map(|f| f.full_name.as_str()).collect();
        assert_eq!(names, vec!["Csirkepaprikás", "Rántott sajt"]);
    }

    #[tokio::test]
    async fn test_search_is_unicode_case_insensitive() {
        let pool = test_pool().await;
        seed_food(&pool, "Őszibarackos pite", "DESSERT", 700).await;
        let results = search(&pool, "őszibarack").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally_and_caps_results() {
        let pool = test_pool().await;
        for i in 0..12 {
            seed_food(&pool, &format!("Leves {i}"), "SOUP", 500).await;
        }
        assert!(search(&pool, "%").await.unwrap().is_empty());
        assert_eq!(search(&pool, "leves").await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let pool = test_pool().await;
        let food = seed_food(&pool, "Lecsó", "MAIN_COURSE", 1200).await;
        let updated = update(
            &pool,
            food.id,
            FoodUpdate {
                price: Some(1350),
                full_name: Some("Kolbászos lecsó".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price, 1350);
        assert_eq!(updated.category, "MAIN_COURSE");
        assert_eq!(search(&pool, "kolbász").await.unwrap().len(), 1);

        let err = update(&pool, 999, FoodUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::FoodNotFound, _)));
    }
}
