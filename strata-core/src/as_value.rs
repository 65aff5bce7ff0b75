use crate::Value;
use rust_decimal::Decimal;
use std::borrow::Cow;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion of native Rust values into the dynamically typed [`Value`].
///
/// This is what the builder accepts wherever a bound value goes (comparisons, insert data,
/// function arguments). `Option<T>` maps `None` to the typed null of `T`.
///
/// ```rust
/// use strata_core::{AsValue, Value};
/// assert!(matches!(42i32.as_value(), Value::Int32(Some(42))));
/// assert!(None::<i32>.as_value().is_null());
/// ```
pub trait AsValue {
    /// Null variant carrying the type of `Self`.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self as _))
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean);
impl_as_value!(i8, Value::Int8);
impl_as_value!(i16, Value::Int16);
impl_as_value!(i32, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(isize, Value::Int64);
impl_as_value!(u8, Value::UInt8);
impl_as_value!(u16, Value::UInt16);
impl_as_value!(u32, Value::UInt32);
impl_as_value!(u64, Value::UInt64);
impl_as_value!(usize, Value::UInt64);
impl_as_value!(f32, Value::Float32);
impl_as_value!(f64, Value::Float64);

macro_rules! impl_as_value_into {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
        }
    };
}

impl_as_value_into!(String, Value::Varchar);
impl_as_value_into!(&str, Value::Varchar);
impl_as_value_into!(Cow<'_, str>, Value::Varchar);
impl_as_value_into!(Box<[u8]>, Value::Blob);
impl_as_value_into!(&[u8], Value::Blob);
impl_as_value_into!(Date, Value::Date);
impl_as_value_into!(Time, Value::Time);
impl_as_value_into!(PrimitiveDateTime, Value::Timestamp);
impl_as_value_into!(OffsetDateTime, Value::TimestampWithTimezone);
impl_as_value_into!(Uuid, Value::Uuid);

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_string()))
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        let scale = self.scale() as u8;
        Value::Decimal(Some(self), 0, scale)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
}
