//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_catalog::db::{DbPool, establish_connection_pool};
use pushkind_catalog::schema::categories;
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Insert a category and return its id.
    pub fn seed_category(&self, name: &str) -> i32 {
        let mut conn = self.pool.get().expect("should acquire DB connection");
        diesel::insert_into(categories::table)
            .values(categories::name.eq(name))
            .returning(categories::id)
            .get_result(&mut conn)
            .expect("should insert category")
    }
}
