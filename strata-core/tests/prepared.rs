#[cfg(test)]
mod tests {
    use strata_core::{Bind, BindType, Prepared, SqlError, Value};

    #[test]
    fn bind_appends() {
        let mut prepared = Prepared::from("SELECT * FROM t WHERE a = ? AND b = ? AND c = ?");
        prepared
            .bind(42)
            .unwrap()
            .bind("hello")
            .unwrap()
            .bind(None::<f64>)
            .unwrap();
        assert_eq!(
            prepared.binds(),
            &[
                Bind::new(Value::Int32(Some(42)), BindType::Integer),
                Bind::new(Value::from("hello"), BindType::String),
                Bind::new(Value::Float64(None), BindType::Null),
            ]
        );
    }

    #[test]
    fn bind_index_replaces() {
        let mut prepared = Prepared::from("SELECT ?");
        prepared.bind(1).unwrap();
        prepared.bind_index(true, 0).unwrap();
        assert_eq!(
            prepared.binds()[0],
            Bind::new(Value::Boolean(Some(true)), BindType::Boolean)
        );
        let error = prepared.bind_index(2, 1).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<SqlError>(),
            Some(SqlError::InvalidQuery(..))
        ));
    }

    #[test]
    fn display_truncates() {
        let sql = format!("SELECT {} FROM t", "x, ".repeat(200));
        let prepared = Prepared::from(sql.clone());
        let shown = prepared.to_string();
        assert!(shown.len() < sql.len());
        assert!(shown.starts_with("SELECT x, "));
        assert_eq!(Prepared::from("SELECT 1").to_string(), "SELECT 1");
    }
}
