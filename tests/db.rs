use diesel::prelude::*;
use diesel::sql_types::Integer;

mod common;

#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer)]
    timeout: i32,
}

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn pooled_connections_wait_on_locks() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("should acquire DB connection");

    let row = diesel::sql_query("PRAGMA busy_timeout")
        .get_result::<BusyTimeout>(&mut conn)
        .expect("should read busy_timeout");

    assert_eq!(row.timeout, 5000);
}
