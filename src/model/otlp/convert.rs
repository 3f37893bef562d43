//! Helpers shared by both translation directions: attribute flattening,
//! id encoding and the resource/scope identity copied onto every record.

use opentelemetry_proto::tonic::{
    common::v1::{AnyValue, InstrumentationScope, KeyValue, any_value},
    resource::v1::Resource,
};

use crate::error::TranslateError;
use crate::pdata::Attributes;

pub(super) const TRACE_ID_LEN: usize = 16;
pub(super) const SPAN_ID_LEN: usize = 8;

const SERVICE_NAME_KEY: &str = "service.name";
const UNKNOWN_SERVICE: &str = "unknown";

/// Resource and scope identity shared by all records of one scope block.
#[derive(Debug, Clone, Default)]
pub(super) struct Origin {
    pub service_name: String,
    pub resource_schema_url: String,
    pub resource_attributes: Attributes,
    pub scope_schema_url: String,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: Attributes,
}

impl Origin {
    pub fn resource(resource: Option<&Resource>, schema_url: &str) -> Self {
        let resource_attributes = resource
            .map(|r| convert_attributes(&r.attributes))
            .unwrap_or_default();
        let service_name = resource_attributes
            .get(SERVICE_NAME_KEY)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_SERVICE.to_string());

        Self {
            service_name,
            resource_schema_url: schema_url.to_string(),
            resource_attributes,
            ..Default::default()
        }
    }

    pub fn with_scope(&self, scope: Option<&InstrumentationScope>, schema_url: &str) -> Self {
        Self {
            scope_schema_url: schema_url.to_string(),
            scope_name: scope.map(|s| s.name.clone()).unwrap_or_default(),
            scope_version: scope.map(|s| s.version.clone()).unwrap_or_default(),
            scope_attributes: scope
                .map(|s| convert_attributes(&s.attributes))
                .unwrap_or_default(),
            ..self.clone()
        }
    }
}

/// Borrowed resource/scope identity of a pdata record, used to regroup
/// flattened records into resource and scope blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct OriginRef<'a> {
    pub resource_schema_url: &'a str,
    pub resource_attributes: &'a Attributes,
    pub scope_schema_url: &'a str,
    pub scope_name: &'a str,
    pub scope_version: &'a str,
    pub scope_attributes: &'a Attributes,
}

impl OriginRef<'_> {
    pub fn same_resource(&self, other: &Self) -> bool {
        self.resource_schema_url == other.resource_schema_url
            && self.resource_attributes == other.resource_attributes
    }

    pub fn resource(&self) -> Option<Resource> {
        Some(Resource {
            attributes: to_key_values(self.resource_attributes),
            ..Default::default()
        })
    }

    pub fn scope(&self) -> Option<InstrumentationScope> {
        Some(InstrumentationScope {
            name: self.scope_name.to_string(),
            version: self.scope_version.to_string(),
            attributes: to_key_values(self.scope_attributes),
            ..Default::default()
        })
    }
}

/// Convert OTLP attributes to HashMap
pub(super) fn convert_attributes(attrs: &[KeyValue]) -> Attributes {
    attrs
        .iter()
        .filter_map(|kv| {
            let value = kv.value.as_ref()?;
            let string_value = extract_string_value(value)?;
            Some((kv.key.clone(), string_value))
        })
        .collect()
}

fn extract_string_value(value: &AnyValue) -> Option<String> {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => Some(s.clone()),
        Some(any_value::Value::IntValue(i)) => Some(i.to_string()),
        Some(any_value::Value::DoubleValue(d)) => Some(d.to_string()),
        Some(any_value::Value::BoolValue(b)) => Some(b.to_string()),
        Some(any_value::Value::BytesValue(b)) => Some(hex::encode(b)),
        Some(any_value::Value::ArrayValue(arr)) => {
            let items: Vec<String> = arr
                .values
                .iter()
                .filter_map(extract_string_value)
                .collect();
            Some(format!("[{}]", items.join(", ")))
        }
        Some(any_value::Value::KvlistValue(kv)) => {
            let items: Vec<String> = kv
                .values
                .iter()
                .filter_map(|kv| {
                    let val = kv.value.as_ref().and_then(extract_string_value)?;
                    Some(format!("{}={}", kv.key, val))
                })
                .collect();
            Some(format!("{{{}}}", items.join(", ")))
        }
        None => None,
    }
}

pub(super) fn extract_body(body: Option<&AnyValue>) -> String {
    body.and_then(extract_string_value).unwrap_or_default()
}

pub(super) fn string_value(s: &str) -> AnyValue {
    AnyValue {
        value: Some(any_value::Value::StringValue(s.to_string())),
    }
}

/// Attributes back to OTLP key-values, sorted by key so output is stable.
pub(super) fn to_key_values(attrs: &Attributes) -> Vec<KeyValue> {
    let mut kvs: Vec<KeyValue> = attrs
        .iter()
        .map(|(k, v)| KeyValue {
            key: k.clone(),
            value: Some(string_value(v)),
        })
        .collect();
    kvs.sort_by(|a, b| a.key.cmp(&b.key));
    kvs
}

/// Hex-encode an id that must be exactly `expected` bytes long.
pub(super) fn encode_id(
    bytes: &[u8],
    field: &'static str,
    expected: usize,
) -> Result<String, TranslateError> {
    if bytes.len() != expected {
        return Err(TranslateError::InvalidIdLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(hex::encode(bytes))
}

/// Like `encode_id`, but an empty id maps to an empty string.
pub(super) fn encode_optional_id(
    bytes: &[u8],
    field: &'static str,
    expected: usize,
) -> Result<String, TranslateError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }
    encode_id(bytes, field, expected)
}

/// Decode a hex id; an empty string decodes to an empty id.
pub(super) fn decode_id(
    id: &str,
    field: &'static str,
    expected: usize,
) -> Result<Vec<u8>, TranslateError> {
    if id.is_empty() {
        return Ok(Vec::new());
    }
    let bytes = hex::decode(id).map_err(|source| TranslateError::InvalidHex { field, source })?;
    if bytes.len() != expected {
        return Err(TranslateError::InvalidIdLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Like `decode_id`, but an empty id is rejected.
pub(super) fn decode_required_id(
    id: &str,
    field: &'static str,
    expected: usize,
) -> Result<Vec<u8>, TranslateError> {
    if id.is_empty() {
        return Err(TranslateError::InvalidIdLength {
            field,
            expected,
            actual: 0,
        });
    }
    decode_id(id, field, expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{ArrayValue, KeyValueList};

    fn kv(key: &str, value: any_value::Value) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue { value: Some(value) }),
        }
    }

    #[test]
    fn test_encode_trace_id() {
        let bytes = vec![
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10,
        ];
        assert_eq!(
            encode_id(&bytes, "trace_id", TRACE_ID_LEN).unwrap(),
            "0102030405060708090a0b0c0d0e0f10"
        );
    }

    #[test]
    fn test_encode_id_rejects_wrong_length() {
        let err = encode_id(&[1, 2, 3], "span_id", SPAN_ID_LEN).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid span_id length: expected 8 bytes, got 3"
        );
        assert!(encode_id(&[], "trace_id", TRACE_ID_LEN).is_err());
    }

    #[test]
    fn test_encode_optional_id_allows_empty() {
        assert_eq!(
            encode_optional_id(&[], "parent_span_id", SPAN_ID_LEN).unwrap(),
            ""
        );
        assert!(encode_optional_id(&[1], "parent_span_id", SPAN_ID_LEN).is_err());
    }

    #[test]
    fn test_decode_id() {
        assert_eq!(
            decode_id("0102030405060708", "span_id", SPAN_ID_LEN).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert!(decode_id("", "span_id", SPAN_ID_LEN).unwrap().is_empty());
        assert!(matches!(
            decode_id("zz", "span_id", SPAN_ID_LEN),
            Err(TranslateError::InvalidHex { .. })
        ));
        assert!(matches!(
            decode_id("0102", "span_id", SPAN_ID_LEN),
            Err(TranslateError::InvalidIdLength { actual: 2, .. })
        ));
    }

    #[test]
    fn test_decode_required_id_rejects_empty() {
        assert_eq!(
            decode_required_id("", "trace_id", TRACE_ID_LEN)
                .unwrap_err()
                .to_string(),
            "invalid trace_id length: expected 16 bytes, got 0"
        );
        assert_eq!(
            decode_required_id("0102030405060708", "span_id", SPAN_ID_LEN).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_convert_attributes() {
        let attrs = vec![
            kv("string_key", any_value::Value::StringValue("hello".to_string())),
            kv("int_key", any_value::Value::IntValue(42)),
            kv("bool_key", any_value::Value::BoolValue(true)),
            kv("bytes_key", any_value::Value::BytesValue(vec![0xca, 0xfe])),
            KeyValue {
                key: "empty".to_string(),
                value: None,
            },
        ];

        let result = convert_attributes(&attrs);
        assert_eq!(result.get("string_key"), Some(&"hello".to_string()));
        assert_eq!(result.get("int_key"), Some(&"42".to_string()));
        assert_eq!(result.get("bool_key"), Some(&"true".to_string()));
        assert_eq!(result.get("bytes_key"), Some(&"cafe".to_string()));
        assert!(!result.contains_key("empty"));
    }

    #[test]
    fn test_convert_nested_attributes() {
        let attrs = vec![
            kv(
                "list",
                any_value::Value::ArrayValue(ArrayValue {
                    values: vec![
                        AnyValue {
                            value: Some(any_value::Value::IntValue(1)),
                        },
                        AnyValue {
                            value: Some(any_value::Value::IntValue(2)),
                        },
                    ],
                }),
            ),
            kv(
                "map",
                any_value::Value::KvlistValue(KeyValueList {
                    values: vec![kv("a", any_value::Value::StringValue("b".to_string()))],
                }),
            ),
        ];

        let result = convert_attributes(&attrs);
        assert_eq!(result.get("list"), Some(&"[1, 2]".to_string()));
        assert_eq!(result.get("map"), Some(&"{a=b}".to_string()));
    }

    #[test]
    fn test_origin_defaults_service_name() {
        let origin = Origin::resource(None, "");
        assert_eq!(origin.service_name, "unknown");

        let resource = Resource {
            attributes: vec![kv(
                "service.name",
                any_value::Value::StringValue("alt-frontend".to_string()),
            )],
            ..Default::default()
        };
        let origin = Origin::resource(Some(&resource), "https://opentelemetry.io/schemas/1.21.0");
        assert_eq!(origin.service_name, "alt-frontend");
        assert_eq!(
            origin.resource_schema_url,
            "https://opentelemetry.io/schemas/1.21.0"
        );
    }

    #[test]
    fn test_to_key_values_is_sorted() {
        let mut attrs = Attributes::new();
        attrs.insert("b".to_string(), "2".to_string());
        attrs.insert("a".to_string(), "1".to_string());

        let kvs = to_key_values(&attrs);
        let keys: Vec<&str> = kvs.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
