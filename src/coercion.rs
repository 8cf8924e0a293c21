//! Turning raw environment variable strings into typed [`Value`]s.

use bytes::Bytes;

use crate::{
    error::{ConfigurationError, Result},
    value::{Value, ValueType},
};


/// Strings (compared case-insensitively) that mean `true`.
/// Anything else, including the empty string, means `false`.
const TRUTHY_STRINGS: [&str; 4] = ["true", "1", "yes", "y"];


/// Parses a boolean flag. Never fails.
pub fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    TRUTHY_STRINGS.contains(&value.as_str())
}


/// Coerces the raw value of the environment variable `env_key`
/// into the member's declared type.
///
/// Members without a declared type (or with a string-like one) keep
/// the raw string. Lists and mappings are parsed as JSON; their shape
/// is checked later by strict mode, not here.
pub fn coerce(declared_type: Option<ValueType>, env_key: &str, raw_value: &str) -> Result<Value> {
    let Some(declared_type) = declared_type else {
        return Ok(Value::String(raw_value.to_string()));
    };

    match declared_type {
        ValueType::Bool => Ok(Value::Bool(parse_bool(raw_value))),
        ValueType::Integer => raw_value
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|error| coercion_error(env_key, declared_type, error)),
        ValueType::Float => raw_value
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|error| coercion_error(env_key, declared_type, error)),
        ValueType::Bytes => Ok(Value::Bytes(Bytes::copy_from_slice(
            raw_value.as_bytes(),
        ))),
        ValueType::List | ValueType::Mapping => serde_json::from_str::<serde_json::Value>(raw_value)
            .map(Value::from)
            .map_err(|error| coercion_error(env_key, declared_type, error)),
        ValueType::String | ValueType::Path | ValueType::Any => {
            Ok(Value::String(raw_value.to_string()))
        }
    }
}

fn coercion_error<E>(env_key: &str, expected: ValueType, error: E) -> ConfigurationError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConfigurationError::CoercionError {
        env_key: env_key.to_string(),
        expected,
        source: Box::new(error),
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("1", true)]
    #[case("yes", true)]
    #[case("Y", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("on", false)]
    #[case("", false)]
    fn booleans(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(
            coerce(Some(ValueType::Bool), "APP_FLAG", raw).unwrap(),
            Value::Bool(expected)
        );
    }

    #[test]
    fn integers_and_floats() {
        assert_eq!(
            coerce(Some(ValueType::Integer), "APP_N", " 42 ").unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            coerce(Some(ValueType::Float), "APP_F", "0.4").unwrap(),
            Value::Float(0.4)
        );
    }

    #[rstest]
    #[case(ValueType::Integer, "forty-two")]
    #[case(ValueType::Integer, "")]
    #[case(ValueType::Float, "1,5")]
    fn malformed_numbers_fail(#[case] declared_type: ValueType, #[case] raw: &str) {
        let error = coerce(Some(declared_type), "APP_N", raw).unwrap_err();

        assert!(matches!(
            error,
            ConfigurationError::CoercionError { ref env_key, expected, .. }
                if env_key == "APP_N" && expected == declared_type
        ));
    }

    #[test]
    fn bytes_are_utf8_encoded() {
        assert_eq!(
            coerce(Some(ValueType::Bytes), "APP_B", "🐱").unwrap(),
            Value::Bytes(Bytes::from("🐱".as_bytes().to_vec()))
        );
    }

    #[test]
    fn lists_and_mappings_are_json() {
        let list = coerce(Some(ValueType::List), "APP_L", "[1,2,3]").unwrap();
        assert_eq!(list.as_list().map(<[Value]>::len), Some(3));

        let mapping = coerce(Some(ValueType::Mapping), "APP_M", r#"{"a": 1}"#).unwrap();
        assert_eq!(mapping.get("a"), Some(&Value::Integer(1)));

        let empty = coerce(Some(ValueType::List), "APP_L", "[]").unwrap();
        assert_eq!(empty, Value::List(vec![]));
    }

    #[test]
    fn malformed_json_mentions_the_key() {
        let error = coerce(Some(ValueType::Mapping), "APP_M", "{a: 1").unwrap_err();

        assert!(matches!(error, ConfigurationError::CoercionError { .. }));
        assert!(error.to_string().starts_with("Could not parse APP_M as mapping"));
    }

    #[rstest]
    #[case(Some(ValueType::String))]
    #[case(Some(ValueType::Path))]
    #[case(Some(ValueType::Any))]
    #[case(None)]
    fn everything_else_is_identity(#[case] declared_type: Option<ValueType>) {
        assert_eq!(
            coerce(declared_type, "APP_S", "blah").unwrap(),
            Value::from("blah")
        );
    }
}
