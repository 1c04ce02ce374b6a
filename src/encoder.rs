use crate::error::SerializationError;
use crate::models::{ProviderValue, Snapshot, ValueKind};
use serde_json::{Map, Number, Value};

type EncodeRule = fn(&ProviderValue) -> Option<Value>;

/// Encoding rules for kinds JSON has no native form for. Any kind that is
/// neither structural nor listed here is rejected.
const CUSTOM_RULES: &[(ValueKind, EncodeRule)] = &[(ValueKind::Timestamp, encode_timestamp)];

const ROOT_PATH: &str = "$";

fn encode_timestamp(value: &ProviderValue) -> Option<Value> {
    match value {
        ProviderValue::Timestamp(timestamp) => Some(Value::String(timestamp.to_iso8601())),
        _ => None,
    }
}

fn lookup_rule(kind: ValueKind) -> Option<EncodeRule> {
    CUSTOM_RULES
        .iter()
        .find(|(rule_kind, _)| *rule_kind == kind)
        .map(|(_, rule)| *rule)
}

/// Renders a snapshot as indented JSON text (2 spaces, trailing newline).
pub fn serialize(snapshot: &Snapshot) -> Result<String, SerializationError> {
    let document = encode_value(&snapshot.to_value())?;
    let mut text = serde_json::to_string_pretty(&document)?;
    text.push('\n');
    Ok(text)
}

pub fn encode_value(value: &ProviderValue) -> Result<Value, SerializationError> {
    encode_at(value, ROOT_PATH)
}

fn encode_at(value: &ProviderValue, path: &str) -> Result<Value, SerializationError> {
    match value {
        ProviderValue::Null => Ok(Value::Null),
        ProviderValue::Bool(flag) => Ok(Value::Bool(*flag)),
        ProviderValue::Integer(number) => Ok(Value::Number((*number).into())),
        ProviderValue::Float(number) => Number::from_f64(*number).map(Value::Number).ok_or_else(
            || SerializationError::NonFiniteFloat {
                value: *number,
                path: path.to_string(),
            },
        ),
        ProviderValue::Text(text) => Ok(Value::String(text.clone())),
        ProviderValue::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| encode_at(item, &format!("{}[{}]", path, index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ProviderValue::Mapping(fields) => {
            let mut object = Map::with_capacity(fields.len());
            for (key, field) in fields {
                let encoded = encode_at(field, &format!("{}.{}", path, key))?;
                object.insert(key.clone(), encoded);
            }
            Ok(Value::Object(object))
        }
        other => lookup_rule(other.kind())
            .and_then(|rule| rule(other))
            .ok_or_else(|| SerializationError::Unsupported {
                type_name: other.type_name().to_string(),
                path: path.to_string(),
            }),
    }
}
