//! SQLite connection pool shared by the repositories.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

/// Pool of SQLite connections; cheap to clone.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
/// A connection checked out of [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Milliseconds a writer waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

diesel::define_sql_function! {
    /// Unicode-aware lowercase; SQLite's built-in `lower` only folds ASCII.
    /// Registered on every pooled connection.
    fn unicode_lower(x: Text) -> Text;
}

/// Applied to every new pooled connection so concurrent workers queue on
/// the write lock instead of failing with `database is locked`.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))
            .map_err(diesel::r2d2::Error::QueryError)?;
        unicode_lower_utils::register_impl(conn, |x: String| x.to_lowercase())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Build an r2d2 pool for the SQLite database at `database_url`.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .connection_timeout(Duration::from_secs(30))
        .build(manager)
}
