#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Action, Column, Driver, ForeignKey, Join, Operand, Query, Schema, SqlError, SqlWriter,
        Value,
    };
    use strata_sqlite::SqliteDriver;
    use strata_tests::{
        RecordingConnection, execute_alignment_tests, execute_ddl_tests,
        execute_transaction_tests, init_logs,
    };

    #[test]
    fn alignment() {
        init_logs();
        execute_alignment_tests(&SqliteDriver::new());
    }

    #[test]
    fn ddl() {
        init_logs();
        execute_ddl_tests(&SqliteDriver::new());
    }

    #[tokio::test]
    async fn transactions() {
        init_logs();
        execute_transaction_tests(RecordingConnection::new(SqliteDriver::new())).await;
    }

    #[test]
    fn or_ignore() {
        let writer = SqliteDriver::new().sql_writer().clone();
        let mut query = Query::insert("tags");
        query
            .ignore(true)
            .data([("name", Operand::from("rust"))])
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"INSERT OR IGNORE INTO "tags" ("name") VALUES (?);"#
        );

        let mut query = Query::update("tags");
        query
            .ignore(true)
            .data([("name", Operand::from("go"))])
            .unwrap()
            .where_(|p| {
                p.eq("id", 2);
            })
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"UPDATE OR IGNORE "tags" SET "name" = ? WHERE "id" = ?;"#
        );
    }

    #[test]
    fn truncate_is_a_delete() {
        assert_eq!(
            SqliteDriver::new()
                .sql_writer()
                .render(&Query::truncate("logs"))
                .unwrap(),
            r#"DELETE FROM "logs";"#
        );
    }

    #[test]
    fn missing_features() {
        let writer = SqliteDriver::new().sql_writer().clone();
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.rlike("name", "^a");
            })
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"SELECT * FROM "users" WHERE "name" RLIKE ?;"#
        );

        let mut query = Query::select("flags");
        query
            .xor_where(|p| {
                p.eq("a", true).eq("b", true);
            })
            .unwrap();
        let error = writer.render(&query).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::Unsupported(..))
        ));

        let mut query = Query::delete("sessions");
        query
            .set_alias("s")
            .join(Join::inner("users").alias("u").on("s.user_id", "u.id"))
            .unwrap();
        let error = writer.render(&query).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::Unsupported(..))
        ));
    }

    #[test]
    fn create_table() {
        let mut schema = Schema::new("notes");
        schema
            .add_column("id", Column::new("int").primary().ai(true))
            .add_column("title", Column::new("varchar").comment("headline"))
            .add_column("slug", Column::new("varchar").null(false).unique())
            .add_column("weight", Column::new("double").default(1.5))
            .add_column("created", Column::new("datetime").default_raw("CURRENT_TIMESTAMP"))
            .add_column(
                "tag_id",
                Column::new("int")
                    .unsigned(true)
                    .index()
                    .foreign(ForeignKey::new("tags.id").on_delete(Action::Cascade)),
            )
            .add_options([("engine", "InnoDB")]);
        let mut query = Query::create_table(schema);
        query.if_not_exists(true);
        assert_eq!(
            SqliteDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS "notes" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "title" TEXT NULL,
                "slug" TEXT NOT NULL,
                "weight" REAL NULL DEFAULT 1.5,
                "created" TEXT NULL DEFAULT CURRENT_TIMESTAMP,
                "tag_id" INTEGER NULL,
                UNIQUE ("slug"),
                FOREIGN KEY ("tag_id") REFERENCES "tags"("id") ON DELETE CASCADE
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn composite_primary_key() {
        let mut schema = Schema::new("memberships");
        schema
            .add_column("user_id", Column::new("int").primary())
            .add_column("group_id", Column::new("int").primary());
        assert_eq!(
            SqliteDriver::new()
                .sql_writer()
                .render(&Query::create_table(schema))
                .unwrap(),
            indoc! {r#"
                CREATE TABLE "memberships" (
                "user_id" INTEGER NOT NULL,
                "group_id" INTEGER NOT NULL,
                PRIMARY KEY ("user_id", "group_id")
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn indexes() {
        let writer = SqliteDriver::new().sql_writer().clone();
        let mut query = Query::drop_index("notes", "idx_title");
        query.if_exists(true);
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"DROP INDEX IF EXISTS "idx_title";"#
        );
        let mut query = Query::create_index("notes", "idx_title");
        query.if_not_exists(true).fields(["title", "created"]);
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"CREATE INDEX IF NOT EXISTS "idx_title" ON "notes" ("title", "created");"#
        );
    }

    #[test]
    fn literals() {
        let driver = SqliteDriver::new();
        assert_eq!(driver.escape(&Value::from(f64::INFINITY)), "1.0e+10000");
        assert_eq!(driver.escape(&Value::from(f32::NEG_INFINITY)), "-1.0e+10000");
        assert_eq!(driver.escape(&Value::from(f64::NAN)), "NULL");
        assert_eq!(driver.escape(&Value::from("o'clock")), "'o''clock'");
    }
}
