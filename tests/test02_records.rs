use sql_admin::prelude::*;

async fn setup() -> Result<(Gateway, RecordService), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    gateway
        .execute(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, a INTEGER, b TEXT, name TEXT NOT NULL DEFAULT 'anon')",
            &[],
        )
        .await?;
    let records = RecordService::new(gateway.clone());
    Ok((gateway, records))
}

#[tokio::test(flavor = "current_thread")]
async fn empty_string_is_stored_as_null() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;

    let outcome = records
        .insert_record("people", Record::new().with("a", 1).with("b", ""))
        .await?;
    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.last_insert_id, 1);

    let rows = records
        .query_records(
            "people",
            QueryOptions::default().filter(Record::new().with("a", 1)),
        )
        .await?;
    assert_eq!(rows.len(), 1);
    let row = &rows.results[0];
    assert_eq!(row.get("a"), Some(&RowValues::Int(1)));
    assert_eq!(row.get("b"), Some(&RowValues::Null));
    assert_eq!(row.get("name"), Some(&RowValues::Text("anon".to_string())));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn update_counts_only_matching_rows() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;
    for (a, name) in [(1, "x"), (1, "y"), (2, "z")] {
        records
            .insert_record("people", Record::new().with("a", a).with("name", name))
            .await?;
    }

    let outcome = records
        .update_records(
            "people",
            Record::new().with("b", "seen"),
            Record::new().with("a", 1),
        )
        .await?;
    assert_eq!(outcome.rows_affected, 2);

    let outcome = records
        .update_records(
            "people",
            Record::new().with("b", "never"),
            Record::new().with("a", 42),
        )
        .await?;
    assert_eq!(outcome.rows_affected, 0);

    let seen = records
        .query_records(
            "people",
            QueryOptions::default().filter(Record::new().with("b", "seen")),
        )
        .await?;
    assert_eq!(seen.len(), 2);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn update_with_empty_string_clears_the_column() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;
    records
        .insert_record("people", Record::new().with("a", 5).with("b", "old"))
        .await?;

    records
        .update_records(
            "people",
            Record::new().with("b", ""),
            Record::new().with("a", 5),
        )
        .await?;

    let row = records
        .query_records("people", QueryOptions::default())
        .await?
        .into_first()
        .expect("one row");
    assert!(row.get("b").is_some_and(RowValues::is_null));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn delete_with_filter_and_without() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;
    for a in [1, 2, 2, 3] {
        records
            .insert_record("people", Record::new().with("a", a))
            .await?;
    }

    let outcome = records
        .delete_records("people", Record::new().with("a", 2))
        .await?;
    assert_eq!(outcome.rows_affected, 2);

    let outcome = records.delete_records("people", Record::new()).await?;
    assert_eq!(outcome.rows_affected, 2);

    let rest = records
        .query_records("people", QueryOptions::default())
        .await?;
    assert!(rest.is_empty());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn query_projects_requested_columns_in_order() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;
    records
        .insert_record("people", Record::new().with("a", 9).with("name", "Ann"))
        .await?;

    let rows = records
        .query_records("people", QueryOptions::default().columns(["name", "a"]))
        .await?;
    let names = rows.get_column_names().expect("column names");
    assert_eq!(names.as_slice(), ["name".to_string(), "a".to_string()]);
    assert_eq!(
        rows.results[0].get_by_index(0),
        Some(&RowValues::Text("Ann".to_string()))
    );
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn filters_match_exactly_and_combine_with_and() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;
    records
        .insert_record("people", Record::new().with("a", 1).with("b", "p"))
        .await?;
    records
        .insert_record("people", Record::new().with("a", 1).with("b", "q"))
        .await?;

    let rows = records
        .query_records(
            "people",
            QueryOptions::default().filter(Record::new().with("a", 1).with("b", "q")),
        )
        .await?;
    assert_eq!(rows.len(), 1);

    let rows = records
        .query_records(
            "people",
            QueryOptions::default().filter(Record::new().with("b", "P")),
        )
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn constraint_violations_surface_the_engine_error() -> Result<(), SqlAdminError> {
    let (gateway, records) = setup().await?;
    records
        .insert_record("people", Record::new().with("id", 1))
        .await?;

    let err = records
        .insert_record("people", Record::new().with("id", 1))
        .await
        .expect_err("duplicate primary key");
    assert!(matches!(err, SqlAdminError::SqliteError(_)));

    let err = records
        .insert_record("people", Record::new().with("id", 2).with("name", ""))
        .await
        .expect_err("empty string becomes NULL and trips NOT NULL");
    assert!(matches!(err, SqlAdminError::SqliteError(_)));

    let count = gateway
        .query_one("SELECT COUNT(*) AS n FROM people", &[])
        .await?
        .expect("count row");
    assert_eq!(count.get("n"), Some(&RowValues::Int(1)));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_table_or_column_is_an_engine_error() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;

    let err = records
        .query_records("ghosts", QueryOptions::default())
        .await
        .expect_err("no such table");
    assert!(matches!(err, SqlAdminError::SqliteError(_)));

    let err = records
        .insert_record("people", Record::new().with("missing", 1))
        .await
        .expect_err("no such column");
    assert!(matches!(err, SqlAdminError::SqliteError(_)));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn identifiers_are_checked_before_any_sql_runs() -> Result<(), SqlAdminError> {
    let (_gateway, records) = setup().await?;

    let err = records
        .insert_record("people; DROP TABLE people", Record::new().with("a", 1))
        .await
        .expect_err("bad table");
    assert!(matches!(err, SqlAdminError::InvalidIdentifier(_)));

    let err = records
        .delete_records("people", Record::new().with("a = a OR 1", 1))
        .await
        .expect_err("bad filter column");
    assert!(matches!(err, SqlAdminError::InvalidIdentifier(_)));

    let err = records
        .insert_record("people", Record::new())
        .await
        .expect_err("nothing to insert");
    assert!(matches!(err, SqlAdminError::MissingField(_)));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn blobs_and_floats_round_trip_through_the_pool() -> Result<(), SqlAdminError> {
    let gateway = Gateway::connect(SqliteOptions::in_memory()).await?;
    gateway
        .execute("CREATE TABLE files (body BLOB, ratio REAL)", &[])
        .await?;
    let records = RecordService::new(gateway);
    records
        .insert_record(
            "files",
            Record::new()
                .with("body", vec![0_u8, 1, 255])
                .with("ratio", 0.5),
        )
        .await?;

    let row = records
        .query_records("files", QueryOptions::default())
        .await?
        .into_first()
        .expect("one row");
    assert_eq!(row.get("body").and_then(RowValues::as_blob), Some(&[0_u8, 1, 255][..]));
    assert_eq!(row.get("ratio").and_then(RowValues::as_float), Some(0.5));
    Ok(())
}
