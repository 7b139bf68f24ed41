//! Schema bootstrap
//!
//! The schema lives in a SQL file next to the binary (see `schema.sql`
//! at the repository root) and is executed on every startup. Statements
//! must be idempotent (`CREATE TABLE IF NOT EXISTS`).

use std::path::{Path, PathBuf};

use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("schema file {path:?} is empty")]
    Empty { path: PathBuf },

    #[error("failed to execute schema file {path:?}: {source}")]
    Execute { path: PathBuf, source: sqlx::Error },
}

/// Read a schema file, rejecting files without any statements.
pub async fn read_schema_file(path: &Path) -> Result<String, SchemaError> {
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if sql.trim().is_empty() {
        return Err(SchemaError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(sql)
}

/// Execute every statement in `path` as one batch.
pub async fn apply_schema_file(pool: &PgPool, path: &Path) -> Result<(), SchemaError> {
    let sql = read_schema_file(path).await?;

    tracing::info!(path = %path.display(), "applying schema");
    sqlx::raw_sql(&sql)
        .execute(pool)
        .await
        .map_err(|source| SchemaError::Execute {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_schema_file(&dir.path().join("nope.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::Read { .. }));
    }

    #[tokio::test]
    async fn blank_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let err = read_schema_file(file.path()).await.unwrap_err();
        assert!(matches!(err, SchemaError::Empty { .. }));
    }

    #[tokio::test]
    async fn reads_statements() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CREATE TABLE IF NOT EXISTS engine (id UUID PRIMARY KEY);").unwrap();

        let sql = read_schema_file(file.path()).await.unwrap();
        assert!(sql.contains("CREATE TABLE"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn repository_schema_applies_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../schema.sql");

        apply_schema_file(&pool, &path).await.unwrap();
        apply_schema_file(&pool, &path).await.unwrap();
    }
}
