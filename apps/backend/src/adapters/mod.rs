//! Store implementations: in-memory and SeaORM (Postgres or SQLite).

pub mod memory;
pub mod posts_sea;
pub mod users_sea;

use sea_orm::DatabaseConnection;

pub use memory::MemoryStore;

/// SeaORM-backed implementation of `UserStore` and `PostStore`.
#[derive(Debug, Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
