use serde_json::{Map, Value};

use crate::constants::SIGN_FIELD;
use crate::crypto::hash;

/// Request fields as sent to the provider.
pub type Fields = Map<String, Value>;

/// Signs outbound provider requests with a salted MD5 digest of the sorted fields.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    salt: String,
}

impl RequestSigner {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Builds `k1=v1&k2=v2...` over the fields in ascending key order.
    /// An existing `sign` field is not part of the signed text.
    pub fn canonical_string(fields: &Fields) -> String {
        let mut keys: Vec<&String> = fields.keys().filter(|k| k.as_str() != SIGN_FIELD).collect();
        keys.sort();

        keys.iter()
            .map(|key| format!("{}={}", key, field_text(&fields[key.as_str()])))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn signature(&self, fields: &Fields) -> String {
        let mut text = Self::canonical_string(fields);
        text.push_str(&self.salt);
        hash::hash_string(&text)
    }

    /// Returns a copy of `fields` with the `sign` field set. The input is left untouched.
    pub fn sign(&self, fields: &Fields) -> Fields {
        let signature = self.signature(fields);
        let mut signed = fields.clone();
        signed.insert(SIGN_FIELD.to_string(), Value::String(signature));
        signed
    }
}

/// Text form of a field value: strings verbatim, scalars in their display form,
/// objects, arrays and null as compact JSON.
///
/// Numbers are assumed integral (`fid`, `time`); a float such as `1.0` renders as
/// `1.0`, not `1`, and would not match a provider that signs it as `1`.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
