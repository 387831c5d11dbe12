use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::users::repo_types::{User, UserPatch, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} does not exist")]
    NotFound(String),

    #[error("user store failure")]
    Backend(#[source] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Persistence seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in store-native order.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    /// Replace only the fields present in `patch`.
    async fn update_fields(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError>;
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect the pool and apply embedded migrations.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migration failed; continuing");
        } else {
            info!("database migrations applied");
        }

        Ok(Self::new(db))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, latitude, longitude
            FROM users
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, firstname, lastname, latitude, longitude
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, firstname, lastname, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(Json(&user.latitude))
        .bind(Json(&user.longitude))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_fields(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET firstname = COALESCE($2, firstname),
                   lastname  = COALESCE($3, lastname),
                   latitude  = COALESCE($4, latitude),
                   longitude = COALESCE($5, longitude)
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.firstname.as_deref())
        .bind(patch.lastname.as_deref())
        .bind(patch.latitude.as_ref().map(Json))
        .bind(patch.longitude.as_ref().map(Json))
        .execute(&self.db)
        .await?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Runs against a live database:
/// `DATABASE_URL=postgres://... cargo test -- --ignored`
#[cfg(test)]
mod pg_tests {
    use super::*;
    use crate::users::repo_types::{Coordinate, UserFields};

    async fn store() -> PgUserStore {
        let cfg = DatabaseConfig {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: 2,
        };
        PgUserStore::connect(&cfg).await.expect("connect and migrate")
    }

    fn user(first: &str, lat: Coordinate) -> User {
        User::new(
            uuid::Uuid::new_v4().as_u128().to_string(),
            UserFields {
                firstname: first.into(),
                lastname: "Doe".into(),
                latitude: lat,
                longitude: "2.3".into(),
            },
        )
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn crud_roundtrip_keeps_order_and_patches_fields() {
        let store = store().await;
        let first = user("first", "51.5".into());
        let second = user("second", Coordinate::from(48.8));
        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let ids: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .filter(|id| *id == first.id || *id == second.id)
            .collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);

        let found = store.find_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(found, second);

        let patch = UserPatch {
            lastname: Some("Patched".into()),
            latitude: Some("10.5".into()),
            ..Default::default()
        };
        store.update_fields(&first.id, &patch).await.unwrap();
        let updated = store.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(updated.firstname, "first");
        assert_eq!(updated.lastname, "Patched");
        assert_eq!(updated.latitude, Coordinate::Text("10.5".into()));
        assert_eq!(updated.longitude, Coordinate::Text("2.3".into()));

        store.delete_by_id(&first.id).await.unwrap();
        store.delete_by_id(&second.id).await.unwrap();
        assert!(store.find_by_id(&first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn unknown_ids_report_not_found() {
        let store = store().await;
        let missing = uuid::Uuid::new_v4().as_u128().to_string();

        let err = store
            .update_fields(&missing, &UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if *id == missing));

        let err = store.delete_by_id(&missing).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
