#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Action, Column, Driver, ForeignKey, Join, Operand, Order, Query, Schema, SqlError,
        SqlWriter, Value,
    };
    use strata_postgres::PostgresDriver;
    use strata_tests::{
        RecordingConnection, execute_alignment_tests, execute_ddl_tests,
        execute_transaction_tests, init_logs, silent_logs,
    };

    #[test]
    fn alignment() {
        init_logs();
        execute_alignment_tests(&PostgresDriver::new());
    }

    #[test]
    fn ddl() {
        init_logs();
        execute_ddl_tests(&PostgresDriver::new());
    }

    #[tokio::test]
    async fn transactions() {
        init_logs();
        execute_transaction_tests(RecordingConnection::new(PostgresDriver::new())).await;
    }

    #[test]
    fn regexp_and_outer_join() {
        let driver = PostgresDriver::new();
        let mut query = Query::select("users");
        query
            .set_alias("u")
            .fields(["id"])
            .join(Join::outer("roles").alias("r").on("u.role_id", "r.id"))
            .unwrap()
            .where_(|p| {
                p.regexp("u.name", "^a").not_regexp("r.name", "z$");
            })
            .unwrap();
        let prepared = driver.prepare(&query).unwrap();
        assert_eq!(
            prepared.sql(),
            r#"SELECT "u"."id" FROM "users" AS "u" FULL OUTER JOIN "roles" AS "r" ON "u"."role_id" = "r"."id" WHERE "u"."name" ~ ? AND "r"."name" !~ ?;"#
        );
        assert_eq!(prepared.binds().len(), 2);
    }

    #[test]
    fn missing_features() {
        let writer = PostgresDriver::new().sql_writer().clone();
        let mut query = Query::select("flags");
        query
            .xor_where(|p| {
                p.eq("a", true).eq("b", true);
            })
            .unwrap();
        let error = writer.render(&query).unwrap_err();
        let error = error.downcast_ref::<SqlError>().unwrap();
        assert!(matches!(error, SqlError::Unsupported(..)));
        assert!(!error.is_configuration());

        let mut query = Query::update("users");
        query
            .data([("active", Operand::from(false))])
            .unwrap()
            .order_by("id", Order::Asc)
            .unwrap()
            .limit(10);
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
        silent_logs! {
            let error = PostgresDriver::new().prepare(&query).unwrap_err();
            assert!(matches!(
                error.downcast_ref::<SqlError>(),
                Some(SqlError::Unsupported(..))
            ));
        }
    }

    #[test]
    fn operators_without_a_template() {
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.rlike("name", "^a").like("email", "%@x.org");
            })
            .unwrap();
        let prepared = PostgresDriver::new().prepare(&query).unwrap();
        assert_eq!(
            prepared.sql(),
            r#"SELECT * FROM "users" WHERE "name" RLIKE ? AND "email" LIKE ?;"#
        );
        assert_eq!(prepared.binds().len(), 2);
    }

    #[test]
    fn insert_ignore() {
        let mut query = Query::multi_insert("tags");
        query
            .ignore(true)
            .rows([
                [("name", Operand::from("a"))],
                [("name", Operand::from("b"))],
            ])
            .unwrap();
        assert_eq!(
            PostgresDriver::new().sql_writer().render(&query).unwrap(),
            r#"INSERT INTO "tags" ("name") VALUES (?), (?) ON CONFLICT DO NOTHING;"#
        );
    }

    #[test]
    fn create_table() {
        let mut schema = Schema::new("posts");
        schema
            .add_column("id", Column::new("serial").primary_constraint("pk_posts"))
            .add_column("seq", Column::new("int").ai(true).unique_index("seq_key"))
            .add_column(
                "author_id",
                Column::new("int").unsigned(true).length(11).foreign(
                    ForeignKey::new("authors.id")
                        .constraint("fk_author")
                        .on_delete(Action::SetNull),
                ),
            )
            .add_column("slug", Column::new("varchar").length(80).collate("C").index())
            .add_column("rating", Column::new("double").comment("stars"))
            .add_column("payload", Column::new("blob"))
            .add_column("published", Column::new("boolean").default(false))
            .add_options([("engine", "InnoDB")]);
        let mut query = Query::create_table(schema);
        query.temporary(true);
        assert_eq!(
            PostgresDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {r#"
                CREATE TEMPORARY TABLE "posts" (
                "id" BIGSERIAL NOT NULL,
                "seq" SERIAL NOT NULL,
                "author_id" INTEGER NULL,
                "slug" VARCHAR(80) COLLATE C NULL,
                "rating" DOUBLE PRECISION NULL,
                "payload" BYTEA NULL,
                "published" BOOLEAN NULL DEFAULT FALSE,
                CONSTRAINT "pk_posts" PRIMARY KEY ("id"),
                CONSTRAINT "seq_key" UNIQUE ("seq"),
                CONSTRAINT "fk_author" FOREIGN KEY ("author_id") REFERENCES "authors"("id") ON DELETE SET NULL
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn indexes() {
        let writer = PostgresDriver::new().sql_writer().clone();
        let mut query = Query::drop_index("posts", "idx_slug");
        query.if_exists(true);
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"DROP INDEX IF EXISTS "idx_slug";"#
        );
        let mut query = Query::create_index("posts", "idx_slug");
        query.fields(["slug"]);
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"CREATE INDEX "idx_slug" ON "posts" ("slug");"#
        );
    }

    #[test]
    fn literals() {
        let driver = PostgresDriver::new();
        assert_eq!(driver.escape(&Value::from(true)), "TRUE");
        assert_eq!(driver.escape(&Value::from(f64::INFINITY)), "'Infinity'::FLOAT8");
        assert_eq!(
            driver.escape(&Value::from(f32::NEG_INFINITY)),
            "'-Infinity'::FLOAT8"
        );
        assert_eq!(driver.escape(&Value::from(f64::NAN)), "'NaN'::FLOAT8");
        assert_eq!(
            driver.escape(&Value::from(&[0xDE_u8, 0xAD, 0x01][..])),
            r"'\xDEAD01'::BYTEA"
        );
    }

    #[test]
    fn binds_use_postgres_types() {
        let mut schema = Schema::new("posts");
        schema
            .add_column("id", Column::new("int"))
            .add_column("payload", Column::new("bytea"));
        let mut query = Query::insert("posts");
        query
            .schema(schema)
            .data([("id", Operand::from("12")), ("payload", Operand::from("raw"))])
            .unwrap();
        let binds = PostgresDriver::new().resolve_params(&query).unwrap();
        assert_eq!(binds[0].value, Value::Int64(Some(12)));
        assert_eq!(binds[1].value, Value::from(&b"raw"[..]));
    }
}
