// Settings Module
//
// Named key-value slots in app_settings. Each slot holds one serialized
// value that is read once and rewritten wholesale.

use anyhow::Result;
use sqlx::SqlitePool;

/// Read a slot, `None` when it was never written
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM app_settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(value)
}

/// Replace the slot contents
pub async fn put_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO app_settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET
            value = ?,
            updated_at = CURRENT_TIMESTAMP
        "#
    )
    .bind(key)
    .bind(value)
    .bind(value) // for UPDATE
    .execute(pool)
    .await?;

    log::debug!("Saved setting {} ({} bytes)", key, value.len());

    Ok(())
}

pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM app_settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}
