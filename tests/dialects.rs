#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata::{Column, Driver, Operand, Query, Schema, SqlWriter, SubQuery, Value};
    use strata_mysql::MySqlDriver;
    use strata_postgres::PostgresDriver;
    use strata_sqlite::SqliteDriver;
    use strata_tests::{count_placeholders, init_logs};

    fn values<D: Driver>(driver: &D, query: &Query) -> (String, Vec<Value>) {
        let prepared = driver
            .prepare(query)
            .unwrap_or_else(|e| panic!("{} could not prepare: {e:#}", D::NAME));
        let quote = driver.sql_writer().quote_char();
        assert_eq!(
            count_placeholders(prepared.sql(), quote),
            prepared.binds().len(),
            "{}",
            prepared.sql()
        );
        let values = prepared.binds().iter().map(|v| v.value.clone()).collect();
        (prepared.sql, values)
    }

    fn union_binds<D: Driver>(driver: &D) {
        let mut first = Query::select("users");
        first
            .fields(["username"])
            .where_(|p| {
                p.like("username", "%foo%");
            })
            .unwrap();
        let mut second = Query::select("users");
        second
            .fields(["username"])
            .where_(|p| {
                p.like("username", "%bar%");
            })
            .unwrap();
        first.union(second, None).unwrap();
        let (sql, binds) = values(driver, &first);
        assert!(sql.contains(" UNION SELECT "), "{sql}");
        assert!(sql.find("LIKE ?").unwrap() < sql.find("UNION").unwrap(), "{sql}");
        assert_eq!(binds, [Value::from("%foo%"), Value::from("%bar%")]);
    }

    fn sub_query_binds<D: Driver>(driver: &D) {
        let mut profiles = Query::select("profiles");
        profiles
            .fields(["column2"])
            .where_(|p| {
                p.eq("status", 1);
            })
            .unwrap();
        let mut query = Query::select("accounts");
        query
            .where_(|p| {
                p.in_("column1", SubQuery::new(profiles));
            })
            .unwrap();
        let (sql, binds) = values(driver, &query);
        let writer = driver.sql_writer();
        assert!(
            sql.contains(&format!(
                "{} IN (SELECT {} FROM {} WHERE {} = ?)",
                writer.quote("column1"),
                writer.quote("column2"),
                writer.quote("profiles"),
                writer.quote("status"),
            )),
            "{sql}"
        );
        assert_eq!(binds, [Value::from(1)]);
    }

    fn multi_insert_binds<D: Driver>(driver: &D) {
        let mut query = Query::multi_insert("points");
        query
            .rows([
                [
                    ("x", Operand::from(1)),
                    ("y", Operand::from(2)),
                    ("label", Operand::from("a")),
                ],
                [
                    ("x", Operand::from(3)),
                    ("y", Operand::from(4)),
                    ("label", Operand::from("b")),
                ],
            ])
            .unwrap();
        let (sql, binds) = values(driver, &query);
        assert!(sql.contains("VALUES (?, ?, ?), (?, ?, ?)"), "{sql}");
        assert_eq!(
            binds,
            [
                Value::from(1),
                Value::from(2),
                Value::from("a"),
                Value::from(3),
                Value::from(4),
                Value::from("b"),
            ]
        );
    }

    fn scenarios<D: Driver>(driver: &D) {
        union_binds(driver);
        sub_query_binds(driver);
        multi_insert_binds(driver);
    }

    #[test]
    fn mysql() {
        init_logs();
        scenarios(&MySqlDriver::new());
    }

    #[test]
    fn postgres() {
        init_logs();
        scenarios(&PostgresDriver::new());
    }

    #[test]
    fn sqlite() {
        init_logs();
        scenarios(&SqliteDriver::new());
    }

    fn members() -> Schema {
        let mut schema = Schema::new("members");
        schema
            .add_column("id", Column::new("int").primary().ai(true).null(true))
            .add_column("name", Column::new("varchar").unique());
        schema
    }

    #[test]
    fn create_table_everywhere() {
        let query = Query::create_table(members());
        assert_eq!(
            MySqlDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {"
                CREATE TABLE `members` (
                `id` INT NOT NULL AUTO_INCREMENT,
                `name` VARCHAR(255) NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `name` (`name`)
                );
            "}
            .trim()
        );
        assert_eq!(
            PostgresDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {r#"
                CREATE TABLE "members" (
                "id" SERIAL NOT NULL,
                "name" VARCHAR(255) NULL,
                PRIMARY KEY ("id"),
                CONSTRAINT "name" UNIQUE ("name")
                );
            "#}
            .trim()
        );
        assert_eq!(
            SqliteDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {r#"
                CREATE TABLE "members" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "name" TEXT NULL,
                UNIQUE ("name")
                );
            "#}
            .trim()
        );
    }
}
