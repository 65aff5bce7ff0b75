#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Attribute, Column, Driver, Field, Join, Keyword, Operand, Order, Query, Schema, SqlError,
        SqlWriter, Value,
    };
    use strata_mysql::MySqlDriver;
    use strata_tests::{
        RecordingConnection, execute_alignment_tests, execute_ddl_tests,
        execute_transaction_tests, init_logs,
    };

    #[test]
    fn alignment() {
        init_logs();
        execute_alignment_tests(&MySqlDriver::new());
    }

    #[test]
    fn ddl() {
        init_logs();
        execute_ddl_tests(&MySqlDriver::new());
    }

    #[tokio::test]
    async fn transactions() {
        init_logs();
        execute_transaction_tests(RecordingConnection::new(MySqlDriver::new())).await;
    }

    #[test]
    fn select() {
        let driver = MySqlDriver::new();
        let mut query = Query::select("users");
        query
            .set_alias("u")
            .fields(["id", "name"])
            .join(Join::straight("roles").alias("r").on("u.role_id", "r.id"))
            .unwrap()
            .where_(|p| {
                p.rlike("u.name", "^a").eq("r.admin", true);
            })
            .unwrap()
            .order_by("u.name", Order::Asc)
            .unwrap()
            .limit(5);
        let prepared = driver.prepare(&query).unwrap();
        assert_eq!(
            prepared.sql(),
            "SELECT `u`.`id`, `u`.`name` FROM `users` AS `u` STRAIGHT_JOIN `roles` AS `r` ON `u`.`role_id` = `r`.`id` WHERE `u`.`name` RLIKE ? AND `r`.`admin` = ? ORDER BY `u`.`name` ASC LIMIT 5;"
        );
        assert_eq!(prepared.binds().len(), 2);
    }

    #[test]
    fn full_outer_join_is_missing() {
        let mut query = Query::select("a");
        query.join(Join::outer("b").on("a.id", "b.id")).unwrap();
        let error = MySqlDriver::new().sql_writer().render(&query).unwrap_err();
        assert!(error.downcast_ref::<SqlError>().unwrap().is_configuration());
    }

    #[test]
    fn modifiers() {
        let writer = MySqlDriver::new().sql_writer().clone();
        let mut query = Query::insert("users");
        query
            .attribute(Attribute::Priority, Keyword::LowPriority)
            .ignore(true)
            .data([("name", Operand::from("Alice"))])
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            "INSERT LOW_PRIORITY IGNORE INTO `users` (`name`) VALUES (?);"
        );

        let mut query = Query::update("users");
        query
            .ignore(true)
            .data([("name", Operand::from("Bob"))])
            .unwrap()
            .where_(|p| {
                p.eq("id", 3);
            })
            .unwrap()
            .order_by("id", Order::Desc)
            .unwrap()
            .limit(1);
        assert_eq!(
            writer.render(&query).unwrap(),
            "UPDATE IGNORE `users` SET `name` = ? WHERE `id` = ? ORDER BY `id` DESC LIMIT 1;"
        );

        let mut query = Query::delete("sessions");
        query
            .attribute(Attribute::Quick, true)
            .where_(|p| {
                p.lt("expires", 100);
            })
            .unwrap();
        assert_eq!(
            writer.render(&query).unwrap(),
            "DELETE QUICK FROM `sessions` WHERE `expires` < ?;"
        );

        assert_eq!(
            writer.render(&Query::truncate("sessions")).unwrap(),
            "TRUNCATE TABLE `sessions`;"
        );
    }

    #[test]
    fn create_table() {
        let mut schema = Schema::new("articles");
        schema
            .add_column("id", Column::new("serial").primary())
            .add_column("title", Column::new("varchar").length(200))
            .add_column("body", Column::new("longtext"))
            .add_column("meta", Column::new("json"))
            .add_column("views", Column::new("mediumint").unsigned(true).zerofill(true))
            .add_options([("engine", "InnoDB"), ("charset", "utf8mb4")]);
        let mut query = Query::create_table(schema);
        query.if_not_exists(true);
        assert_eq!(
            MySqlDriver::new().sql_writer().render(&query).unwrap(),
            indoc! {"
                CREATE TABLE IF NOT EXISTS `articles` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                `title` VARCHAR(200) NULL,
                `body` LONGTEXT NULL,
                `meta` JSON NULL,
                `views` MEDIUMINT UNSIGNED ZEROFILL NULL,
                PRIMARY KEY (`id`)
                ) ENGINE=InnoDB CHARACTER SET=utf8mb4;
            "}
            .trim()
        );
    }

    #[test]
    fn literals() {
        let driver = MySqlDriver::new();
        assert_eq!(driver.escape(&Value::from(f64::INFINITY)), "1.0e+10000");
        assert_eq!(driver.escape(&Value::from(f64::NEG_INFINITY)), "-1.0e+10000");
        assert_eq!(driver.escape(&Value::from(f32::NAN)), "NULL");
        assert_eq!(driver.escape(&Value::from("it's")), "'it''s'");
        assert_eq!(driver.escape(&Value::from(r"C:\temp")), r"'C:\\temp'");
        assert_eq!(driver.sql_writer().quote("db.users"), "`db`.`users`");
        assert_eq!(driver.sql_writer().quote("`users`"), "`users`");
    }

    #[test]
    fn inlined_strings_stay_literals() {
        let mut query = Query::select("users");
        query.fields([Field::from(
            Query::func("CONCAT").arg(r"\' OR 1=1 -- ").alias("x"),
        )]);
        let prepared = MySqlDriver::new().prepare(&query).unwrap();
        assert_eq!(
            prepared.sql(),
            r"SELECT CONCAT('\\'' OR 1=1 -- ') AS `x` FROM `users`;"
        );
        assert!(prepared.binds().is_empty());
    }
}
