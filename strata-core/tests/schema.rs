#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Action, Column, DefaultValue, ForeignKey, GenericSqlWriter, Query, Schema, SqlError,
        SqlWriter, Value,
    };

    fn posts() -> Schema {
        let mut schema = Schema::new("posts");
        schema
            .add_column("id", Column::new("int").primary_constraint("pk_posts").ai(true))
            .add_column(
                "user_id",
                Column::new("int")
                    .unsigned(true)
                    .foreign(ForeignKey::new("users.id").on_delete(Action::Cascade))
                    .index(),
            )
            .add_column(
                "slug",
                Column::new("varchar")
                    .length(100)
                    .charset("utf8mb4")
                    .collate("utf8mb4_bin")
                    .unique_index("slug_lang"),
            )
            .add_column("lang", Column::new("char").length(2).unique_index("slug_lang"))
            .add_column("body", Column::new("text").comment("body"))
            .add_options([("engine", "InnoDB"), ("comment", "Posts")]);
        schema
    }

    #[test]
    fn null_forcing() {
        let mut schema = Schema::new("t");
        schema
            .add_column("a", Column::new("int").primary().null(true))
            .add_column("b", Column::new("int").ai(true))
            .add_column("c", Column::new("int"))
            .add_column("d", Column::new("int").null(false));
        let nulls: Vec<_> = schema.columns().iter().map(|v| v.1.null).collect();
        assert_eq!(nulls, [false, false, true, false]);
    }

    #[test]
    fn keys() {
        let schema = posts();
        let primary = schema.primary_key().unwrap();
        assert_eq!(primary.columns, ["id"]);
        assert_eq!(primary.constraint.as_deref(), Some("pk_posts"));
        assert_eq!(schema.unique_keys().len(), 1);
        assert_eq!(schema.unique_keys()[0].0, "slug_lang");
        assert_eq!(schema.unique_keys()[0].1.columns, ["slug", "lang"]);
        assert_eq!(schema.foreign_keys()[0].1.target(), Some(("users", "id")));
        assert_eq!(
            schema.indexes(),
            &[("user_id".to_string(), vec!["user_id".to_string()])]
        );
        assert!(schema.has_column("posts.slug"));
        assert!(!schema.has_column("title"));
    }

    #[test]
    fn replacing_a_column() {
        let mut schema = Schema::new("t");
        schema
            .add_column("a", Column::new("int"))
            .add_column("b", Column::new("int"))
            .add_column("a", Column::new("text").default("x"));
        assert_eq!(schema.columns().len(), 2);
        let column = schema.column("a").unwrap();
        assert_eq!(column.type_name, "text");
        assert_eq!(column.default, Some(DefaultValue::Value(Value::from("x"))));
    }

    #[test]
    fn create_table_with_keys_and_options() {
        let mut query = Query::create_table(posts());
        query.temporary(true).if_not_exists(true);
        assert_eq!(
            GenericSqlWriter::new().render(&query).unwrap(),
            indoc! {r#"
                CREATE TEMPORARY TABLE IF NOT EXISTS "posts" (
                "id" INT NOT NULL AUTO_INCREMENT,
                "user_id" INT UNSIGNED NULL,
                "slug" VARCHAR(100) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NULL,
                "lang" CHAR(2) NULL,
                "body" TEXT NULL COMMENT 'body',
                CONSTRAINT "pk_posts" PRIMARY KEY ("id"),
                UNIQUE KEY "slug_lang" ("slug", "lang"),
                FOREIGN KEY ("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
                KEY "user_id" ("user_id")
                ) ENGINE=InnoDB COMMENT='Posts';
            "#}
            .trim()
        );
    }

    #[test]
    fn invalid_foreign_reference() {
        let mut schema = Schema::new("t");
        schema.add_column("a", Column::new("int").foreign(ForeignKey::new("users")));
        let error = GenericSqlWriter::new()
            .render(&Query::create_table(schema))
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::InvalidSchema(..))
        ));
    }

    #[test]
    fn unknown_column_type() {
        let mut schema = Schema::new("t");
        schema.add_column("a", Column::new("geometry"));
        let error = GenericSqlWriter::new()
            .render(&Query::create_table(schema))
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<SqlError>(),
            Some(&SqlError::MissingType("geometry".into()))
        );
    }

    #[test]
    fn empty_schema() {
        let error = GenericSqlWriter::new()
            .render(&Query::create_table(Schema::new("t")))
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::InvalidSchema(..))
        ));

        let mut schema = Schema::new("");
        schema.add_column("id", Column::new("int"));
        let error = GenericSqlWriter::new()
            .render(&Query::create_table(schema))
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::InvalidQuery(..))
        ));
    }
}
