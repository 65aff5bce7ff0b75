use crate::{RecordingConnection, silent_logs};
use strata_core::{
    Connection, Driver, Executor, Operand, Query, QueryResult, RowLabeled, RowsAffected,
    SqlWriter, Transaction, Value, stream::TryStreamExt,
};

/// Nesting, emitted statements and result plumbing of transactions over a recording connection.
pub async fn execute_transaction_tests<D: Driver + Default>(connection: RecordingConnection<D>) {
    let writer = connection.driver().sql_writer();
    let mut begin = String::new();
    writer.write_transaction_begin(&mut begin);
    let mut commit = String::new();
    writer.write_transaction_commit(&mut commit);
    let mut rollback = String::new();
    writer.write_transaction_rollback(&mut rollback);

    let mut insert = Query::insert("audit");
    insert
        .data([("event", Operand::from("login")), ("at", Operand::from(1_700_000_000))])
        .expect("Could not set the audit data");
    let insert_sql = connection
        .driver()
        .prepare(&insert)
        .expect("Could not prepare the insert")
        .sql;

    // Commit
    let mut transaction = connection.begin().await.expect("Could not begin");
    assert_eq!(transaction.depth(), 1);
    transaction
        .begin()
        .await
        .expect("Could not begin a nested level");
    assert_eq!(transaction.depth(), 2);
    let affected = transaction
        .execute(&insert)
        .await
        .expect("Could not execute the insert");
    assert_eq!(affected.rows_affected, 0);
    transaction.commit().await.expect("Could not commit the nested level");
    assert_eq!(transaction.depth(), 1);
    assert!(transaction.in_transaction());
    transaction.commit().await.expect("Could not commit");
    assert!(!transaction.in_transaction());
    silent_logs! {
        assert!(transaction.commit().await.is_err());
        assert!(transaction.rollback().await.is_err());
    }
    let mut connection = transaction.into_inner();
    assert_eq!(
        connection.statements(),
        [begin.as_str(), insert_sql.as_str(), commit.as_str()]
    );
    connection.clear();

    // Rollback
    let mut transaction = Transaction::new(connection);
    transaction.begin().await.expect("Could not begin");
    transaction.begin().await.expect("Could not begin a nested level");
    transaction.executor().reply([QueryResult::from(RowsAffected {
        rows_affected: 3,
        last_affected_id: Some(9),
    })]);
    let affected = transaction
        .execute(&insert)
        .await
        .expect("Could not execute the insert");
    assert_eq!(affected.rows_affected, 3);
    assert_eq!(affected.last_affected_id, Some(9));
    transaction
        .rollback()
        .await
        .expect("Could not roll back the nested level");
    assert_eq!(transaction.depth(), 1);
    transaction.rollback().await.expect("Could not roll back");
    assert_eq!(transaction.depth(), 0);
    let mut connection = transaction.into_inner();
    assert_eq!(
        connection.statements(),
        [begin.as_str(), insert_sql.as_str(), rollback.as_str()]
    );
    connection.clear();

    // Rows
    connection.reply([
        RowLabeled::new(
            vec!["event".to_string(), "at".to_string()].into(),
            vec![Value::from("login"), Value::from(1_700_000_000)].into(),
        )
        .into(),
        QueryResult::from(RowsAffected::default()),
    ]);
    let mut select = Query::select("audit");
    select
        .where_(|p| {
            p.eq("event", "login");
        })
        .expect("Could not filter the audit");
    let rows: Vec<RowLabeled> = connection
        .fetch(&select)
        .try_collect()
        .await
        .expect("Could not fetch the audit");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_column("event"), Some(&Value::from("login")));
    assert_eq!(rows[0].get_column("missing"), None);
    assert_eq!(connection.executed()[0].binds().len(), 1);
}
