//! Schema migration runner for the `documents` table.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply
//!
//! The database URL is read from `DATABASE_URL`, falling back to the
//! server's `TAXBOOK__STORE__URL`.

use sea_orm_migration::MigratorTrait;
use taxbook_db::SeaOrmStore;
use taxbook_db::migration::Migrator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("TAXBOOK__STORE__URL"))
        .map_err(|_| "set DATABASE_URL or TAXBOOK__STORE__URL")?;
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let store = SeaOrmStore::connect(&url, 1).await?;
    let db = store.connection();

    match command.as_str() {
        "up" => Migrator::up(db, None).await?,
        "down" => Migrator::down(db, Some(1)).await?,
        "status" => Migrator::status(db).await?,
        "fresh" => Migrator::fresh(db).await?,
        other => return Err(format!("unknown command: {other}").into()),
    }
    Ok(())
}
