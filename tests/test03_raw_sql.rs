use sql_admin::prelude::*;

async fn changes(gateway: &Gateway, sql: &str) -> Result<(ExecOutcome, bool), SqlAdminError> {
    match gateway.run_raw(sql).await? {
        RawOutcome::Changes {
            outcome,
            refresh_tables,
        } => Ok((outcome, refresh_tables)),
        RawOutcome::Rows(_) => panic!("{sql} should not return rows"),
    }
}

async fn rows(gateway: &Gateway, sql: &str) -> Result<ResultSet, SqlAdminError> {
    match gateway.run_raw(sql).await? {
        RawOutcome::Rows(rows) => Ok(rows),
        RawOutcome::Changes { .. } => panic!("{sql} should return rows"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn ddl_sets_refresh_and_reports_no_changes() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;

    let (outcome, refresh) = changes(&gateway, "CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)").await?;
    assert!(refresh);
    assert_eq!(outcome.rows_affected, 0);

    let (outcome, refresh) = changes(&gateway, "  alter table t add column w INTEGER").await?;
    assert!(refresh);
    assert_eq!(outcome.rows_affected, 0);

    let (_, refresh) = changes(&gateway, "INSERT INTO t (v) VALUES ('a'), ('b')").await?;
    assert!(!refresh);

    let (outcome, refresh) = changes(&gateway, "Drop Table t").await?;
    assert!(refresh);
    assert_eq!(outcome.rows_affected, 0);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn dml_reports_changes_and_last_insert_id() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    changes(&gateway, "CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)").await?;

    let (outcome, _) = changes(&gateway, "INSERT INTO t (v) VALUES ('a'), ('b'), ('c')").await?;
    assert_eq!(outcome.rows_affected, 3);
    assert_eq!(outcome.last_insert_id, 3);

    let (outcome, _) = changes(&gateway, "UPDATE t SET v = 'z' WHERE id > 1").await?;
    assert_eq!(outcome.rows_affected, 2);

    let (outcome, refresh) = changes(&gateway, "DELETE FROM t").await?;
    assert_eq!(outcome.rows_affected, 3);
    assert!(!refresh);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn select_in_any_case_returns_rows() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    changes(&gateway, "CREATE TABLE t (id INTEGER, v TEXT)").await?;
    changes(&gateway, "INSERT INTO t VALUES (1, 'one'), (2, 'two')").await?;

    for sql in ["SELECT * FROM t", "select id from t", "\n  SeLeCt v FROM t WHERE id = 2"] {
        let result = rows(&gateway, sql).await?;
        assert!(!result.is_empty(), "{sql}");
    }

    let result = rows(&gateway, "SELECT v FROM t WHERE id = 99").await?;
    assert!(result.is_empty());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn engine_errors_pass_through() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;

    for sql in ["SELEC 1", "SELECT * FROM nowhere", "INSERT INTO nowhere VALUES (1)"] {
        let err = gateway.run_raw(sql).await.expect_err(sql);
        assert!(matches!(err, SqlAdminError::SqliteError(_)), "{sql}: {err:?}");
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn query_one_returns_first_row_or_none() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    gateway
        .execute("CREATE TABLE t (id INTEGER, v TEXT)", &[])
        .await?;
    gateway
        .execute(
            "INSERT INTO t (id, v) VALUES (?1, ?2), (?3, ?4)",
            &[
                RowValues::Int(1),
                RowValues::Text("a".into()),
                RowValues::Int(2),
                RowValues::Null,
            ],
        )
        .await?;

    let row = gateway
        .query_one("SELECT v FROM t WHERE id = ?1", &[RowValues::Int(2)])
        .await?
        .expect("row for id 2");
    assert_eq!(row.get("v"), Some(&RowValues::Null));

    let none = gateway
        .query_one("SELECT v FROM t WHERE id = ?1", &[RowValues::Int(3)])
        .await?;
    assert!(none.is_none());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn in_memory_state_is_shared_across_calls() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    let other = gateway.clone();
    gateway.execute("CREATE TABLE t (id INTEGER)", &[]).await?;
    other.execute("INSERT INTO t VALUES (1)", &[]).await?;

    let rows = gateway.query("SELECT id FROM t", &[]).await?;
    assert_eq!(rows.len(), 1);
    Ok(())
}
