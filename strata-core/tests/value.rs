#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::sync::LazyLock;
    use strata_core::{AsValue, GenericSqlWriter, SqlWriter, Value, parse_strict_integer};
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    static WRITER: LazyLock<GenericSqlWriter> = LazyLock::new(GenericSqlWriter::new);

    macro_rules! test_literal {
        ($value:expr, $expected:literal) => {{
            let mut out = String::new();
            WRITER.write_value(&mut Default::default(), &mut out, &$value.as_value());
            assert_eq!(out, $expected);
        }};
    }

    #[test]
    fn numbers() {
        test_literal!(-5_i32, "-5");
        test_literal!(u64::MAX, "18446744073709551615");
        test_literal!(i8::MIN, "-128");
        test_literal!(1.5_f64, "1.5");
        test_literal!(0.25_f32, "0.25");
        test_literal!(f64::INFINITY, "'Infinity'");
        test_literal!(f64::NEG_INFINITY, "'-Infinity'");
        test_literal!(f32::NAN, "'NaN'");
        test_literal!(Decimal::new(1250, 2), "12.50");
    }

    #[test]
    fn strings() {
        test_literal!("hello", "'hello'");
        test_literal!("it's", "'it''s'");
        test_literal!("''", "''''''");
        test_literal!(String::from("naïve"), "'naïve'");
        test_literal!('x', "'x'");
    }

    #[test]
    fn nulls_and_booleans() {
        test_literal!(None::<i32>, "NULL");
        test_literal!(None::<String>, "NULL");
        test_literal!(Some(true), "true");
        test_literal!(false, "false");
        let mut out = String::new();
        WRITER.write_value(&mut Default::default(), &mut out, &Value::Null);
        assert_eq!(out, "NULL");
    }

    #[test]
    fn blobs() {
        test_literal!(&[0xDE_u8, 0xAD, 0x01][..], "X'DEAD01'");
        test_literal!(Box::<[u8]>::from([]), "X''");
    }

    #[test]
    fn temporal() {
        test_literal!(date!(2025 - 01 - 02), "'2025-01-02'");
        test_literal!(time!(10:20:30), "'10:20:30'");
        test_literal!(time!(10:20:30.5), "'10:20:30.5'");
        test_literal!(time!(23:59:59.000001), "'23:59:59.000001'");
        test_literal!(datetime!(2025-01-02 10:20:30), "'2025-01-02 10:20:30'");
        test_literal!(
            datetime!(2025-01-02 01:00:00 +2),
            "'2025-01-01 23:00:00'"
        );
    }

    #[test]
    fn uuids() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        test_literal!(uuid, "'67e55044-10b1-426f-9247-bb680e5fe0c8'");
    }

    #[test]
    fn strict_integers() {
        assert_eq!(parse_strict_integer("42"), Some(42));
        assert_eq!(parse_strict_integer("-7"), Some(-7));
        assert_eq!(parse_strict_integer("+7"), None);
        assert_eq!(parse_strict_integer(" 7"), None);
        assert_eq!(parse_strict_integer("4.2"), None);
        assert_eq!(parse_strict_integer(""), None);
        assert_eq!(parse_strict_integer("-"), None);
        assert_eq!(Value::from("12").as_integer(), Some(12));
        assert!(!Value::from("12").is_integer());
    }

    #[test]
    fn null_equality() {
        assert_eq!(Value::Int32(None), Value::Int32(None));
        assert_ne!(Value::Int32(None), Value::Int64(None));
        assert!(Value::Varchar(None).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::from(0).is_null());
    }
}
