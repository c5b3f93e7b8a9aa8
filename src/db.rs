use anyhow::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement, TransactionTrait, Value,
};
use std::path::PathBuf;
use tokio::fs;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

const MIGRATIONS_DIR: &str = "migrations";

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Borrow the sqlx pool that backs a SeaORM Postgres connection.
pub fn pool_from_orm(conn: &DatabaseConnection) -> DbPool {
    conn.get_postgres_connection_pool().clone()
}

/// Apply every `migrations/*.sql` file not yet recorded in `schema_migrations`,
/// in filename order, each inside its own transaction.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(
        backend,
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            filename TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ))
    .await?;

    let mut entries = fs::read_dir(MIGRATIONS_DIR).await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    for file in files {
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_applied(conn, backend, &filename).await? {
            continue;
        }

        tracing::info!(file = %filename, "applying migration");
        let sql = fs::read_to_string(&file).await?;
        let txn = conn.begin().await?;
        for statement in split_statements(&sql) {
            txn.execute(Statement::from_string(backend, statement)).await?;
        }
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (filename) VALUES ($1)",
            [Value::from(filename.clone())],
        ))
        .await?;
        txn.commit().await?;
    }

    Ok(())
}

async fn is_applied(conn: &DatabaseConnection, backend: DbBackend, filename: &str) -> Result<bool> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT 1 AS applied FROM schema_migrations WHERE filename = $1",
            [Value::from(filename.to_string())],
        ))
        .await?;
    Ok(row.is_some())
}

/// Postgres prepared statements cannot hold several commands, so a migration
/// file is run one statement at a time. Comment lines are dropped first.
fn split_statements(sql: &str) -> Vec<String> {
    let without_comments: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_statements;

    #[test]
    fn splits_on_semicolons_and_skips_comments() {
        let sql = "-- users\nCREATE TABLE a (id INT);\n\n-- index; with a semicolon\nCREATE INDEX i ON a(id);\n";
        assert_eq!(
            split_statements(sql),
            vec![
                "CREATE TABLE a (id INT);".to_string(),
                "CREATE INDEX i ON a(id);".to_string(),
            ]
        );
    }
}
