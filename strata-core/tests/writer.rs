#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Attribute, Clause, Column, CompoundFlag, Field, Filter, GenericSqlWriter, Grammar, Join,
        Keyword, Operand, Operator, Order, Query, QueryType, Schema, SqlError, SqlWriter,
        SubQuery, Value,
    };

    fn render(query: &Query) -> String {
        GenericSqlWriter::new()
            .render(query)
            .expect("Could not render the query")
    }

    fn render_error(query: &Query) -> SqlError {
        GenericSqlWriter::new()
            .render(query)
            .expect_err("Rendering should have failed")
            .downcast_ref::<SqlError>()
            .expect("Expected a SqlError")
            .clone()
    }

    #[test]
    fn select_all() {
        assert_eq!(render(&Query::select("users")), r#"SELECT * FROM "users";"#);
        let mut query = Query::select("users");
        query.distinct(true);
        assert_eq!(render(&query), r#"SELECT DISTINCT * FROM "users";"#);
    }

    #[test]
    fn select_where_order_limit() {
        let mut query = Query::select("users");
        query
            .fields(["id", "name"])
            .where_(|p| {
                p.eq("status", 1).gte("age", 18);
            })
            .unwrap()
            .order_by("name", Order::Asc)
            .unwrap()
            .order_by("id", "desc")
            .unwrap()
            .limit(10)
            .offset(20);
        assert_eq!(
            render(&query),
            r#"SELECT "id", "name" FROM "users" WHERE "status" = ? AND "age" >= ? ORDER BY "name" ASC, "id" DESC LIMIT 10 OFFSET 20;"#
        );
    }

    #[test]
    fn offset_requires_limit() {
        let mut query = Query::select("users");
        query.offset(5);
        assert_eq!(render(&query), r#"SELECT * FROM "users";"#);
    }

    #[test]
    fn predicate_operators() {
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.in_("id", [1, 2, 3])
                    .not_in("role", vec!["guest"])
                    .between("age", 18, 65)
                    .like("name", "%foo%")
                    .not_eq("country", "IT")
                    .eq("deleted_at", Value::Null)
                    .not_eq("email", None::<String>)
                    .regexp("code", "^[A-Z]+$");
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "users" WHERE "id" IN (?, ?, ?) AND "role" NOT IN (?) AND "age" BETWEEN ? AND ? AND "name" LIKE ? AND "country" != ? AND "deleted_at" IS NULL AND "email" IS NOT NULL AND "code" REGEXP ?;"#
        );
    }

    #[test]
    fn scalar_eq_on_list_becomes_in() {
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.eq("id", vec![4, 5]).not_eq("id", [6]);
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "users" WHERE "id" IN (?, ?) AND "id" NOT IN (?);"#
        );
    }

    #[test]
    fn nested_predicates() {
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.eq("a", 1)
                    .either(|p| {
                        p.eq("b", 2).eq("c", 3);
                    })
                    .neither(|p| {
                        p.eq("d", 4).eq("e", 5);
                    })
                    .also(|_| {});
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "users" WHERE "a" = ? AND ("b" = ? OR "c" = ?) AND (NOT ("d" = ? OR "e" = ?));"#
        );
        assert_eq!(query.bindings().len(), 5);
    }

    #[test]
    fn xor_where() {
        let mut query = Query::select("flags");
        query
            .xor_where(|p| {
                p.eq("a", true).eq("b", true);
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "flags" WHERE "a" = ? XOR "b" = ?;"#
        );
    }

    #[test]
    fn expression_operands() {
        let mut query = Query::select("events");
        query
            .where_(|p| {
                p.add(Query::func("LOWER").field("email"), Operator::Eq, "a@b.c")
                    .add("created", Operator::Gt, Query::raw("NOW()"))
                    .add("starts", Operator::Lte, Operand::column("ends"))
                    .add(Query::raw("\"total\" % 2"), Operator::Eq, 0);
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "events" WHERE LOWER("email") = ? AND "created" > NOW() AND "starts" <= "ends" AND "total" % 2 = ?;"#
        );
        assert_eq!(query.bindings().len(), 2);
    }

    #[test]
    fn functions() {
        let mut query = Query::select("users");
        query.fields([
            Field::from(Query::func("SUBSTRING").field("name").arg(1).arg(3).alias("short")),
            Field::from(Query::func("CONCAT").field("first").arg(" ").field("last")),
            Field::from(
                Query::func("CAST")
                    .field("price")
                    .literal("DECIMAL(10,2)")
                    .separator(" AS "),
            ),
            Field::from("email AS contact"),
        ]);
        assert_eq!(
            render(&query),
            r#"SELECT SUBSTRING("name", 1, 3) AS "short", CONCAT("first", ' ', "last"), CAST("price" AS DECIMAL(10,2)), "email" AS "contact" FROM "users";"#
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn joins() {
        let mut query = Query::select("users");
        query
            .set_alias("u")
            .fields(["id", "name"])
            .join(
                Join::left("profiles")
                    .alias("p")
                    .on("u.id", "p.user_id")
                    .fields(["bio"]),
            )
            .unwrap()
            .join(Join::inner("countries").on("u.country_id", "countries.id"))
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT "u"."id", "u"."name", "p"."bio" FROM "users" AS "u" LEFT JOIN "profiles" AS "p" ON "u"."id" = "p"."user_id" INNER JOIN "countries" ON "u"."country_id" = "countries"."id";"#
        );
    }

    #[test]
    fn alias_without_joins_is_ignored() {
        let mut query = Query::select("users");
        query.set_alias("u").fields(["id"]);
        assert_eq!(query.alias(), None);
        assert_eq!(render(&query), r#"SELECT "id" FROM "users";"#);
    }

    #[test]
    fn group_by_having() {
        let mut query = Query::select("users");
        query
            .fields([
                Field::from(Query::func("COUNT").field("id").alias("total")),
                Field::from("role"),
            ])
            .group_by(["role"])
            .having(|p| {
                p.gt("total", 5);
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT COUNT("id") AS "total", "role" FROM "users" GROUP BY "role" HAVING "total" > ?;"#
        );
    }

    #[test]
    fn sub_queries() {
        let mut profiles = Query::select("profiles");
        profiles
            .fields(["user_id"])
            .where_(|p| {
                p.eq("active", true);
            })
            .unwrap();
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.in_("id", SubQuery::new(profiles.clone()))
                    .not_in("id", SubQuery::new(profiles.clone()));
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "users" WHERE "id" IN (SELECT "user_id" FROM "profiles" WHERE "active" = ?) AND "id" NOT IN (SELECT "user_id" FROM "profiles" WHERE "active" = ?);"#
        );

        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.exists(SubQuery::new(Query::select("profiles")))
                    .not_exists(SubQuery::new(Query::select("bans")));
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "users" WHERE EXISTS (SELECT * FROM "profiles") AND NOT EXISTS (SELECT * FROM "bans");"#
        );

        let mut scores = Query::select("scores");
        scores.fields(["score"]);
        let mut query = Query::select("players");
        query
            .where_(|p| {
                p.gt("score", SubQuery::new(scores).with_filter(Filter::Any));
            })
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT * FROM "players" WHERE "score" > ANY (SELECT "score" FROM "scores");"#
        );
    }

    #[test]
    fn sub_query_field() {
        let mut orders = Query::select("orders");
        orders
            .set_alias("o")
            .fields([Query::func("COUNT").literal("*")]);
        let mut query = Query::select("users");
        query.fields([Field::from("id"), Field::from(SubQuery::new(orders))]);
        assert_eq!(
            render(&query),
            r#"SELECT "id", (SELECT COUNT(*) FROM "orders" AS "o") AS "o" FROM "users";"#
        );
    }

    #[test]
    fn compounds() {
        let mut first = Query::select("users");
        first
            .fields(["name"])
            .where_(|p| {
                p.like("name", "%foo%");
            })
            .unwrap();
        let mut second = Query::select("admins");
        second
            .fields(["name"])
            .where_(|p| {
                p.like("name", "%bar%");
            })
            .unwrap();
        let mut query = first.clone();
        query.union(second.clone(), None).unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT "name" FROM "users" WHERE "name" LIKE ? UNION SELECT "name" FROM "admins" WHERE "name" LIKE ?;"#
        );
        let mut query = first;
        query
            .union(second.clone(), Some(CompoundFlag::All))
            .unwrap()
            .except(second, None)
            .unwrap();
        assert_eq!(
            render(&query),
            r#"SELECT "name" FROM "users" WHERE "name" LIKE ? UNION ALL SELECT "name" FROM "admins" WHERE "name" LIKE ? EXCEPT SELECT "name" FROM "admins" WHERE "name" LIKE ?;"#
        );
    }

    #[test]
    fn insert() {
        let mut query = Query::insert("users");
        query
            .data([
                ("name", Operand::from("Alice")),
                ("age", Operand::from(30)),
                ("deleted_at", Operand::from(Value::Null)),
            ])
            .unwrap();
        assert_eq!(
            render(&query),
            r#"INSERT INTO "users" ("name", "age", "deleted_at") VALUES (?, ?, ?);"#
        );
        assert_eq!(query.bindings().len(), 3);
    }

    #[test]
    fn multi_insert() {
        let mut query = Query::multi_insert("users");
        query
            .rows([
                [("name", Operand::from("a")), ("age", Operand::from(1))],
                [("name", Operand::from("b")), ("age", Operand::from(2))],
                [("name", Operand::from("c")), ("age", Operand::from(3))],
            ])
            .unwrap();
        assert_eq!(
            render(&query),
            r#"INSERT INTO "users" ("name", "age") VALUES (?, ?), (?, ?), (?, ?);"#
        );
        assert_eq!(query.bindings().len(), 6);
    }

    #[test]
    fn update_delete_truncate() {
        let mut query = Query::update("users");
        query
            .data([("name", Operand::from("Bob")), ("visits", Operand::from(Query::raw("\"visits\" + 1")))])
            .unwrap()
            .where_(|p| {
                p.eq("id", 7);
            })
            .unwrap()
            .limit(1)
            .offset(3);
        assert_eq!(
            render(&query),
            r#"UPDATE "users" SET "name" = ?, "visits" = "visits" + 1 WHERE "id" = ? LIMIT 1;"#
        );

        let mut query = Query::delete("users");
        query
            .where_(|p| {
                p.eq("id", 7);
            })
            .unwrap()
            .order_by("id", Order::Desc)
            .unwrap();
        assert_eq!(
            render(&query),
            r#"DELETE FROM "users" WHERE "id" = ? ORDER BY "id" DESC;"#
        );

        assert_eq!(render(&Query::truncate("users")), r#"TRUNCATE "users";"#);
    }

    #[test]
    fn create_table() {
        let mut schema = Schema::new("users");
        schema
            .add_column("id", Column::new("int").primary().ai(true))
            .add_column("email", Column::new("varchar").unique())
            .add_column("score", Column::new("decimal").default(0))
            .add_column("created", Column::new("datetime").default_raw("CURRENT_TIMESTAMP"));
        let query = Query::create_table(schema);
        assert_eq!(
            render(&query),
            indoc! {r#"
                CREATE TABLE "users" (
                "id" INT NOT NULL AUTO_INCREMENT,
                "email" VARCHAR(255) NULL,
                "score" DECIMAL(8,2) NULL DEFAULT 0,
                "created" DATETIME NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY ("id"),
                UNIQUE KEY "email" ("email")
                );
            "#}
            .trim()
        );
    }

    #[test]
    fn create_table_without_schema() {
        let query = Query::new(QueryType::CreateTable, "users");
        assert!(matches!(render_error(&query), SqlError::InvalidSchema(..)));
    }

    #[test]
    fn drop_and_indexes() {
        let mut query = Query::drop_table("users");
        query.if_exists(true);
        assert_eq!(render(&query), r#"DROP TABLE IF EXISTS "users";"#);

        let mut query = Query::create_index("users", "idx_email");
        query.fields(["email"]);
        assert_eq!(
            render(&query),
            r#"CREATE INDEX "idx_email" ON "users" ("email");"#
        );
        query.attribute(Attribute::IndexType, Keyword::Unique);
        assert_eq!(
            render(&query),
            r#"CREATE UNIQUE INDEX "idx_email" ON "users" ("email");"#
        );

        assert_eq!(
            render(&Query::drop_index("users", "idx_email")),
            r#"DROP INDEX "idx_email" ON "users";"#
        );
    }

    #[test]
    fn quoting() {
        let writer = GenericSqlWriter::new();
        assert_eq!(writer.quote("users"), r#""users""#);
        assert_eq!(writer.quote(r#""users""#), r#""users""#);
        assert_eq!(writer.quote(&writer.quote("users.id")), r#""users"."id""#);
        assert_eq!(writer.quote("users.*"), r#""users".*"#);
        assert_eq!(writer.quote("*"), "*");
    }

    #[test]
    fn invalid_shapes() {
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.in_("id", Vec::<i32>::new());
            })
            .unwrap();
        assert!(matches!(render_error(&query), SqlError::InvalidQuery(..)));

        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.add("age", Operator::Between, [1, 2, 3]);
            })
            .unwrap();
        assert!(matches!(render_error(&query), SqlError::InvalidQuery(..)));

        assert!(matches!(
            render_error(&Query::insert("users")),
            SqlError::InvalidQuery(..)
        ));
        assert!(matches!(
            render_error(&Query::select("")),
            SqlError::InvalidQuery(..)
        ));
    }

    #[test]
    fn missing_grammar_entries() {
        let mut grammar = Grammar::standard();
        grammar.remove_clause(Clause::Like);
        let writer = GenericSqlWriter::with_grammar(grammar);
        let mut query = Query::select("users");
        query
            .where_(|p| {
                p.like("name", "a%");
            })
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"SELECT * FROM "users" WHERE "name" LIKE ?;"#
        );

        let mut grammar = Grammar::standard();
        grammar.remove_clause(Clause::Where);
        let writer = GenericSqlWriter::with_grammar(grammar);
        let error = writer.render(&query).unwrap_err();
        let error = error.downcast_ref::<SqlError>().unwrap();
        assert_eq!(*error, SqlError::MissingClause(Clause::Where));
        assert!(error.is_configuration());

        let mut grammar = Grammar::standard();
        grammar.remove_statement(QueryType::Select);
        let writer = GenericSqlWriter::with_grammar(grammar);
        let error = writer.render(&Query::select("users")).unwrap_err();
        assert_eq!(
            error.downcast_ref::<SqlError>(),
            Some(&SqlError::MissingStatement(QueryType::Select))
        );
        let mut query = Query::delete("users");
        query
            .where_(|p| {
                p.in_("id", SubQuery::new(Query::select("bans")));
            })
            .unwrap();
        let error = writer.render(&query).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::Unsupported(..))
        ));
    }

    #[test]
    fn statement_slots() {
        let mut query = Query::insert("users");
        query
            .ignore(true)
            .data([("name", Operand::from("Alice"))])
            .unwrap();
        assert_eq!(
            render(&query),
            r#"INSERT INTO "users" ("name") VALUES (?);"#
        );

        let mut grammar = Grammar::standard();
        grammar.add_statement(QueryType::Update, "UPDATE {table} SET {fields} {where}");
        let writer = GenericSqlWriter::with_grammar(grammar);
        let mut query = Query::update("users");
        query
            .data([("name", Operand::from("Bob"))])
            .unwrap()
            .limit(1);
        let error = writer.render(&query).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::Unsupported(..))
        ));
        query.limit(0);
        assert_eq!(
            writer.render(&query).unwrap(),
            r#"UPDATE "users" SET "name" = ?;"#
        );
    }
}
