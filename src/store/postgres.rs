use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{HeaderStyle, StoreError, TabularStore, column_widths};

/// Sheet emulated on top of Postgres. Several named sheets can share a database.
pub struct PgSheet {
    pool: PgPool,
    sheet_id: String,
}

impl PgSheet {
    pub fn new(pool: PgPool, sheet_id: impl Into<String>) -> Self {
        Self {
            pool,
            sheet_id: sheet_id.into(),
        }
    }

    /// Connect, apply migrations, and open `sheet_id`.
    pub async fn connect(database_url: &str, sheet_id: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::from(format!("Failed to run migrations: {e}")))?;

        tracing::info!("Migrations applied");

        Ok(Self::new(pool, sheet_id))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TabularStore for PgSheet {
    async fn header_row(&self) -> Result<Option<Vec<String>>, StoreError> {
        let cells = sqlx::query_scalar::<_, Json<Vec<String>>>(
            "SELECT cells FROM sheet_rows WHERE sheet_id = $1 AND row_index = 1",
        )
        .bind(&self.sheet_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cells.map(|Json(cells)| cells))
    }

    async fn write_header(&self, cells: &[String], style: &HeaderStyle) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sheet_rows (sheet_id, row_index, cells, style)
             VALUES ($1, 1, $2, $3)
             ON CONFLICT (sheet_id, row_index)
             DO UPDATE SET cells = EXCLUDED.cells, style = EXCLUDED.style",
        )
        .bind(&self.sheet_id)
        .bind(Json(cells))
        .bind(Json(style))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_row(&self, cells: Vec<String>) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Serialises appends to this sheet until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&self.sheet_id)
            .execute(&mut *tx)
            .await?;

        let index = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sheet_rows (sheet_id, row_index, cells)
             SELECT $1, COALESCE(MAX(row_index), 0) + 1, $2
             FROM sheet_rows WHERE sheet_id = $1
             RETURNING row_index",
        )
        .bind(&self.sheet_id)
        .bind(Json(&cells))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        u64::try_from(index).map_err(|_| StoreError::from(format!("Invalid row index {index}")))
    }

    async fn resize_columns(&self, first: usize, count: usize) -> Result<(), StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Vec<String>>>(
            "SELECT cells FROM sheet_rows WHERE sheet_id = $1",
        )
        .bind(&self.sheet_id)
        .fetch_all(&self.pool)
        .await?;

        let widths = column_widths(rows.iter().map(|Json(cells)| cells.as_slice()), first, count);

        for (offset, width) in widths.into_iter().enumerate() {
            sqlx::query(
                "INSERT INTO sheet_columns (sheet_id, column_index, width)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (sheet_id, column_index) DO UPDATE SET width = EXCLUDED.width",
            )
            .bind(&self.sheet_id)
            .bind((first + offset) as i32)
            .bind(width as i32)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
