use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Rumor record - SQL persistence layer
///
/// Append-only: rows are never updated or deleted, and duplicate
/// submissions about the same subject are allowed. `name`, `surname` and
/// `city` hold lowercased values; see [`NewRumor::normalized`].
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct RumorRecord {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub city: String,
    pub age: i64,
    /// Messenger handle of the subject, if the submitter provided one.
    pub subject_username: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A completed submission, ready to persist.
#[derive(Debug, Clone)]
pub struct NewRumor {
    pub name: String,
    pub surname: String,
    pub city: String,
    pub age: i64,
    pub subject_username: Option<String>,
    pub text: String,
}

impl NewRumor {
    /// Lowercase the matching fields so lookups are case-insensitive.
    /// The rumor text and the subject username are kept as typed.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.to_lowercase();
        self.surname = self.surname.to_lowercase();
        self.city = self.city.to_lowercase();
        self
    }
}

impl RumorRecord {
    /// Insert a new rumor
    pub async fn insert(new: &NewRumor, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO rumors (name, surname, city, age, subject_username, text)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.surname)
        .bind(&new.city)
        .bind(new.age)
        .bind(&new.subject_username)
        .bind(&new.text)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Cities with at least one rumor for the given subject, deduplicated
    /// and sorted ascending for a reproducible keyboard layout.
    pub async fn distinct_cities(name: &str, surname: &str, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT city FROM rumors
             WHERE name = $1 AND surname = $2
             ORDER BY city ASC",
        )
        .bind(name)
        .bind(surname)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Ages with at least one rumor for the given subject and city,
    /// deduplicated and sorted ascending.
    pub async fn distinct_ages(
        name: &str,
        surname: &str,
        city: &str,
        pool: &PgPool,
    ) -> Result<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT age FROM rumors
             WHERE name = $1 AND surname = $2 AND city = $3
             ORDER BY age ASC",
        )
        .bind(name)
        .bind(surname)
        .bind(city)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// All rumor texts matching the fully fixed criteria, in submission
    /// order. Duplicate texts are preserved: distinct submissions may say
    /// the same thing.
    pub async fn texts(
        name: &str,
        surname: &str,
        city: &str,
        age: i64,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT text FROM rumors
             WHERE name = $1 AND surname = $2 AND city = $3 AND age = $4
             ORDER BY id ASC",
        )
        .bind(name)
        .bind(surname)
        .bind(city)
        .bind(age)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
