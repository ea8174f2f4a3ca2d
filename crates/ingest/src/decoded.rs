use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A decoded request body: field name to value.
///
/// Form bodies only ever hold [`Value::String`] values, json bodies keep
/// their nested structure. Keys are kept in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecodedBody {
    fields: Map<String, Value>,
}

impl DecodedBody {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.fields.get(key.as_ref())
    }

    /// Gets the field as a string slice, `None` if absent or not a string
    pub fn get_str(&self, key: impl AsRef<str>) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Inserts a field, replacing and returning any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.fields.contains_key(key.as_ref())
    }

    /// A field is present when it exists, is not null and is not an empty string.
    pub fn is_present(&self, key: impl AsRef<str>) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Returns the names in `keys` that are not present, in the given order.
    pub fn missing<'k>(&self, keys: &[&'k str]) -> Vec<&'k str> {
        keys.iter().copied().filter(|key| !self.is_present(key)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Deserializes the whole body into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for DecodedBody {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Later entries replace earlier ones with the same key.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DecodedBody {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut body = DecodedBody::new();
        for (key, value) in iter {
            body.insert(key, value);
        }
        body
    }
}

impl IntoIterator for DecodedBody {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
