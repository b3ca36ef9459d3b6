use async_trait::async_trait;
use sqlx::PgPool;

use testbed_core::error::Error;
use testbed_core::traits::EntityStore;
use testbed_core::types::{Entity, EntityId, SaveEntity};

/// Postgres-backed implementation of [`EntityStore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new `PgStore` with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, params: SaveEntity) -> Result<Entity, Error> {
        let row = sqlx::query_as::<_, EntityRow>(
            r"
            INSERT INTO entities (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            ",
        )
        .bind(&params.name)
        .bind(&params.description)
        .fetch_one(&self.pool)
        .await
        .map_err(database)?;

        tracing::debug!(id = row.id, "inserted entity");
        Ok(row.into())
    }

    async fn update(&self, id: EntityId, params: SaveEntity) -> Result<Entity, Error> {
        let row = sqlx::query_as::<_, EntityRow>(
            r"
            UPDATE entities
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description
            ",
        )
        .bind(id.0)
        .bind(&params.name)
        .bind(&params.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?
        .ok_or(Error::NotFound(id))?;

        tracing::debug!(%id, "updated entity");
        Ok(row.into())
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn count(&self) -> Result<u64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entities")
            .fetch_one(&self.pool)
            .await
            .map_err(database)?;

        u64::try_from(count).map_err(|e| Error::Internal(e.to_string()))
    }

    async fn save(&self, entity: SaveEntity) -> Result<Entity, Error> {
        match entity.id {
            Some(id) => self.update(id, entity).await,
            None => self.insert(entity).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<Entity>, Error> {
        let rows = sqlx::query_as::<_, EntityRow>(
            "SELECT id, name, description FROM entities ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, Error> {
        let row = sqlx::query_as::<_, EntityRow>(
            "SELECT id, name, description FROM entities WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database)?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_id(&self, id: EntityId) -> Result<bool, Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM entities WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(database)
    }

    async fn delete_by_id(&self, id: EntityId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database)?;

        tracing::debug!(%id, rows = result.rows_affected(), "deleted entity");
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Entity>, Error> {
        let rows = sqlx::query_as::<_, EntityRow>(
            "SELECT id, name, description FROM entities WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> Result<Vec<Entity>, Error> {
        let rows = sqlx::query_as::<_, EntityRow>(
            r"
            SELECT id, name, description
            FROM entities
            WHERE name ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY id
            ",
        )
        .bind(escape_like(fragment))
        .fetch_all(&self.pool)
        .await
        .map_err(database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

fn database(err: sqlx::Error) -> Error {
    Error::Database(err.to_string())
}

/// Escape LIKE metacharacters so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// --- Internal row types for sqlx ---

#[derive(sqlx::FromRow)]
struct EntityRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<EntityRow> for Entity {
    fn from(row: EntityRow) -> Self {
        Self {
            id: EntityId(row.id),
            name: row.name,
            description: row.description,
        }
    }
}
