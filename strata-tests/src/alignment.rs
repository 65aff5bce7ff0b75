use std::sync::Arc;
use strata_core::{
    Column, CompoundFlag, Driver, Field, Filter, Join, Operand, Operator, Order, Query, Schema,
    SqlError, SqlWriter, SubQuery, Value,
};
use time::macros::{date, datetime};
use uuid::Uuid;

/// Number of `?` outside string literals and quoted identifiers.
pub fn count_placeholders(sql: &str, quote: char) -> usize {
    let mut count = 0;
    let mut literal = false;
    let mut identifier = false;
    for c in sql.chars() {
        match c {
            '\'' if !identifier => literal = !literal,
            c if c == quote && !literal => identifier = !identifier,
            '?' if !literal && !identifier => count += 1,
            _ => {}
        }
    }
    count
}

fn users_schema() -> Arc<Schema> {
    let mut schema = Schema::new("users");
    schema
        .add_column("id", Column::new("int").primary().ai(true))
        .add_column("name", Column::new("varchar").length(60))
        .add_column("active", Column::new("boolean"))
        .add_column("born", Column::new("date"))
        .add_column("seen", Column::new("datetime"))
        .add_column("score", Column::new("decimal"));
    Arc::new(schema)
}

fn orders_schema() -> Arc<Schema> {
    let mut schema = Schema::new("orders");
    schema
        .add_column("id", Column::new("bigint").primary())
        .add_column("user_id", Column::new("int"))
        .add_column("total", Column::new("double"))
        .add_column("placed", Column::new("datetime"));
    Arc::new(schema)
}

fn paying_users() -> SubQuery {
    let mut orders = Query::select("orders");
    orders
        .schema(orders_schema())
        .fields(["user_id"])
        .where_(|p| {
            p.gt("total", 10.5).gte("placed", datetime!(2024-01-01 00:00:00));
        })
        .expect("Could not filter the orders");
    SubQuery::new(orders)
}

/// Queries whose placeholders must line up with the binds whatever the dialect.
pub fn alignment_shapes() -> Vec<(&'static str, Query)> {
    let mut shapes = Vec::new();

    shapes.push(("select all", Query::select("users")));

    let mut query = Query::select("users");
    query
        .schema(users_schema())
        .fields(["id", "name"])
        .where_(|p| {
            p.eq("id", 1)
                .not_eq("name", "it's")
                .in_("score", [1.5, 2.5])
                .not_in("id", vec![7, 8, 9])
                .between("born", date!(1990 - 01 - 01), date!(2000 - 12 - 31))
                .not_between("id", 100, 200)
                .like("name", "%?%")
                .not_like("name", "x%")
                .null("seen")
                .not_null("born")
                .eq("active", true);
        })
        .expect("Could not build the filter");
    shapes.push(("select operators", query));

    let mut query = Query::select("users");
    query
        .where_(|p| {
            p.eq("a", 1)
                .either(|p| {
                    p.eq("b", "x").also(|p| {
                        p.eq("c", 3).lt("d", 4);
                    });
                })
                .neither(|p| {
                    p.eq("e", Value::Null).eq("f", None::<i32>).eq("g", 5);
                })
                .maybe(|_| {})
                .either(|p| {
                    p.eq("h", vec!["one", "two"]);
                });
        })
        .expect("Could not build the filter");
    shapes.push(("nested groups", query));

    let mut query = Query::select("flags");
    query
        .xor_where(|p| {
            p.eq("a", true).eq("b", false);
        })
        .expect("Could not build the filter");
    shapes.push(("xor", query));

    let mut query = Query::select("users");
    query
        .where_(|p| {
            p.regexp("name", "^a").not_regexp("name", "z$").rlike("name", "b+");
        })
        .expect("Could not build the filter");
    shapes.push(("regexp", query));

    let mut query = Query::select("events");
    query
        .where_(|p| {
            p.add(Query::func("LOWER").field("email"), Operator::Eq, "a@b.c")
                .add("created", Operator::Gt, Query::raw("CURRENT_TIMESTAMP"))
                .add("starts", Operator::Lte, Operand::column("ends"))
                .add(
                    "visits",
                    Operator::Gt,
                    Query::expr("base", Operator::Add, 10),
                )
                .add(
                    "code",
                    Operator::In,
                    Query::func("COALESCE").field("fallback").arg(SubQuery::new({
                        let mut codes = Query::select("codes");
                        codes
                            .fields(["code"])
                            .where_(|p| {
                                p.eq("kind", "promo");
                            })
                            .expect("Could not filter the codes");
                        codes
                    })),
                );
        })
        .expect("Could not build the filter");
    shapes.push(("expressions", query));

    let mut query = Query::select("users");
    query
        .schema(users_schema())
        .set_alias("u")
        .fields([
            Field::from("id"),
            Field::from(Query::func("UPPER").field("name").alias("upper_name")),
            Field::from({
                let mut counts = Query::select("orders");
                counts
                    .set_alias("c")
                    .fields([Query::func("COUNT").literal("*")])
                    .where_(|p| {
                        p.gt("total", 100);
                    })
                    .expect("Could not filter the orders");
                SubQuery::new(counts)
            }),
        ])
        .join(
            Join::left("orders")
                .alias("o")
                .on("u.id", "o.user_id")
                .fields(["total"]),
        )
        .expect("Could not join the orders")
        .where_(|p| {
            p.in_("u.id", paying_users())
                .exists(SubQuery::new(Query::select("admins")))
                .gt("o.total", SubQuery::new({
                    let mut totals = Query::select("orders");
                    totals
                        .fields(["total"])
                        .where_(|p| {
                            p.lt("total", 5);
                        })
                        .expect("Could not filter the totals");
                    totals
                })
                .with_filter(Filter::Any));
        })
        .expect("Could not build the filter")
        .group_by(["u.id"])
        .having(|p| {
            p.gt("o.total", 50).lt("o.total", 5000);
        })
        .expect("Could not build the having")
        .order_by_func(
            Query::func("FIELD").field("u.name").arg(SubQuery::new({
                let mut names = Query::select("vips");
                names
                    .fields(["name"])
                    .where_(|p| {
                        p.eq("level", 3);
                    })
                    .expect("Could not filter the vips");
                names
            })),
            Some(Order::Desc),
        )
        .order_by("u.id", Order::Asc)
        .expect("Could not order")
        .limit(20)
        .offset(40);
    shapes.push(("joins, sub-queries and grouping", query));

    let mut first = Query::select("users");
    first
        .fields(["name"])
        .where_(|p| {
            p.like("name", "%foo%");
        })
        .expect("Could not filter the users");
    let mut second = Query::select("admins");
    second
        .fields(["name"])
        .where_(|p| {
            p.like("name", "%bar%");
        })
        .expect("Could not filter the admins");
    let mut query = first.clone();
    query
        .union(second.clone(), None)
        .expect("Could not union")
        .intersect(second.clone(), Some(CompoundFlag::Distinct))
        .expect("Could not intersect")
        .except(second, Some(CompoundFlag::All))
        .expect("Could not except");
    shapes.push(("compounds", query));

    let mut query = Query::insert("users");
    query
        .schema(users_schema())
        .data([
            ("name", Operand::from("Alice")),
            ("active", Operand::from(1)),
            ("born", Operand::from(date!(1990 - 05 - 06))),
            ("seen", Operand::from(Query::raw("CURRENT_TIMESTAMP"))),
            ("score", Operand::from(None::<f64>)),
        ])
        .expect("Could not set the data");
    shapes.push(("insert", query));

    let mut query = Query::multi_insert("tags");
    query
        .rows((0..4).map(|i| {
            [
                ("id", Operand::from(Uuid::from_u128(i))),
                ("label", Operand::from(format!("tag {i}"))),
                ("weight", Operand::from(Query::func("ROUND").arg(i as f64 * 1.5))),
            ]
        }))
        .expect("Could not add the rows");
    shapes.push(("multi insert", query));

    let mut query = Query::update("users");
    query
        .schema(users_schema())
        .data([
            ("name", Operand::from("Bob")),
            (
                "score",
                Operand::from(Query::expr("score", Operator::Add, 1)),
            ),
        ])
        .expect("Could not set the data")
        .where_(|p| {
            p.eq("id", 7).in_("id", paying_users());
        })
        .expect("Could not build the filter");
    shapes.push(("update", query));

    let mut query = Query::update("users");
    query
        .data([("active", Operand::from(false))])
        .expect("Could not set the data")
        .where_(|p| {
            p.lt("seen", datetime!(2020-01-01 00:00:00));
        })
        .expect("Could not build the filter")
        .order_by("seen", Order::Asc)
        .expect("Could not order")
        .limit(100);
    shapes.push(("update ordered and limited", query));

    let mut query = Query::delete("sessions");
    query
        .where_(|p| {
            p.lt("expires", 1_700_000_000_i64)
                .not_exists(SubQuery::new({
                    let mut users = Query::select("users");
                    users
                        .where_(|p| {
                            p.eq("active", true);
                        })
                        .expect("Could not filter the users");
                    users
                }));
        })
        .expect("Could not build the filter");
    shapes.push(("delete", query));

    let mut query = Query::delete("sessions");
    query
        .set_alias("s")
        .join(Join::inner("users").alias("u").on("s.user_id", "u.id"))
        .expect("Could not join the users")
        .where_(|p| {
            p.eq("u.active", false);
        })
        .expect("Could not build the filter");
    shapes.push(("delete with join", query));

    shapes.push(("truncate", Query::truncate("sessions")));

    shapes
}

/// Renders every shape through the driver and checks that text, binder and bindings agree.
///
/// Shapes the dialect does not support are skipped.
pub fn execute_alignment_tests<D: Driver>(driver: &D) {
    let writer = driver.sql_writer();
    for (name, query) in alignment_shapes() {
        if let Err(error) = writer.render(&query) {
            match error.downcast_ref::<SqlError>() {
                Some(e) if matches!(e, SqlError::Unsupported(..)) || e.is_configuration() => {
                    log::debug!("{} skips `{name}`: {error:#}", D::NAME);
                    continue;
                }
                _ => panic!("`{name}` could not be rendered by {}: {error:#}", D::NAME),
            }
        }
        let prepared = driver
            .prepare(&query)
            .unwrap_or_else(|e| panic!("`{name}` could not be prepared by {}: {e:#}", D::NAME));
        let placeholders = count_placeholders(prepared.sql(), writer.quote_char());
        assert_eq!(
            placeholders,
            prepared.binds().len(),
            "`{name}` binds do not match the placeholders of: {}",
            prepared.sql()
        );
        assert_eq!(
            placeholders,
            query.bindings().len(),
            "`{name}` bindings do not match the placeholders of: {}",
            prepared.sql()
        );
    }
}
