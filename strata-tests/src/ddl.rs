use strata_core::{
    Action, Column, Driver, ForeignKey, Keyword, Query, Schema, SqlError, SqlWriter,
};

fn accounts() -> Schema {
    let mut schema = Schema::new("accounts");
    schema
        .add_column("id", Column::new("int").primary().ai(true))
        .add_column(
            "owner_id",
            Column::new("int").null(false).foreign(
                ForeignKey::new("owners.id")
                    .on_delete(Action::Cascade)
                    .on_update(Action::Restrict),
            ),
        )
        .add_column("email", Column::new("varchar").unique())
        .add_column("balance", Column::new("decimal").default(0))
        .add_column("note", Column::new("text"))
        .add_column("opened", Column::new("datetime").default_raw("CURRENT_TIMESTAMP"));
    schema
}

/// Checks the DDL statements every dialect must produce.
pub fn execute_ddl_tests<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    let grammar = writer.grammar();
    let schema = accounts();

    let create = Query::create_table(schema.clone());
    let prepared = driver
        .prepare(&create)
        .unwrap_or_else(|e| panic!("{} could not create the table: {e:#}", D::NAME));
    let sql = prepared.sql();
    assert!(prepared.binds().is_empty(), "DDL must not bind values: {sql}");
    assert!(sql.starts_with("CREATE TABLE "), "{sql}");
    assert!(sql.ends_with(';'), "{sql}");
    for (name, _) in schema.columns() {
        assert!(sql.contains(&writer.quote(name)), "Column `{name}` missing from: {sql}");
    }
    let not_null = grammar
        .keyword(Keyword::NotNull)
        .expect("The grammar must define NOT NULL");
    let id = sql
        .lines()
        .find(|v| v.starts_with(&writer.quote("id")))
        .unwrap_or_else(|| panic!("No line for the primary column in: {sql}"));
    assert!(id.contains(not_null), "The primary key must be NOT NULL: {id}");
    let note = sql
        .lines()
        .find(|v| v.starts_with(&writer.quote("note")))
        .unwrap_or_else(|| panic!("No line for the note column in: {sql}"));
    assert!(!note.contains(not_null), "Plain columns are nullable: {note}");
    let cascade = grammar
        .keyword(Keyword::Cascade)
        .expect("The grammar must define CASCADE");
    assert!(sql.contains(cascade), "{sql}");
    assert!(sql.contains(&writer.quote("owners")), "{sql}");

    let mut create = Query::create_table(schema.clone());
    create.if_not_exists(true);
    let sql = writer
        .render(&create)
        .unwrap_or_else(|e| panic!("{} could not create the table: {e:#}", D::NAME));
    if grammar.has_keyword(Keyword::IfNotExists) {
        let if_not_exists = grammar.keyword(Keyword::IfNotExists).unwrap_or_default();
        assert!(sql.contains(if_not_exists), "{sql}");
    }

    let mut drop = Query::drop_table("accounts");
    drop.if_exists(true);
    let sql = writer
        .render(&drop)
        .unwrap_or_else(|e| panic!("{} could not drop the table: {e:#}", D::NAME));
    assert!(sql.starts_with("DROP TABLE"), "{sql}");
    assert!(sql.contains(&writer.quote("accounts")), "{sql}");

    let mut index = Query::create_index("accounts", "idx_accounts_owner");
    index.fields(["owner_id", "opened"]);
    let sql = writer
        .render(&index)
        .unwrap_or_else(|e| panic!("{} could not create the index: {e:#}", D::NAME));
    assert!(sql.contains(&writer.quote("idx_accounts_owner")), "{sql}");
    assert!(
        sql.contains(&writer.quote_list(&["owner_id".to_string(), "opened".to_string()])),
        "{sql}"
    );
    let sql = writer
        .render(&Query::drop_index("accounts", "idx_accounts_owner"))
        .unwrap_or_else(|e| panic!("{} could not drop the index: {e:#}", D::NAME));
    assert!(sql.starts_with("DROP INDEX"), "{sql}");

    let sql = writer
        .render(&Query::truncate("accounts"))
        .unwrap_or_else(|e| panic!("{} could not truncate: {e:#}", D::NAME));
    assert!(sql.contains(&writer.quote("accounts")), "{sql}");

    let mut broken = Schema::new("broken");
    broken.add_column("shape", Column::new("geometry"));
    let error = writer
        .render(&Query::create_table(broken))
        .expect_err("Unknown column types must fail");
    assert_eq!(
        error.downcast_ref::<SqlError>(),
        Some(&SqlError::MissingType("geometry".into()))
    );

    let error = writer
        .render(&Query::create_table(Schema::new("empty")))
        .expect_err("Tables without columns must fail");
    assert!(matches!(
        error.downcast_ref::<SqlError>(),
        Some(SqlError::InvalidSchema(..))
    ));
}
