use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use icu_collator::{Collator, CollatorError, CollatorOptions, Strength};
use icu_locid::locale;

/// Documented shape of a user. Stored records are kept as raw JSON
/// (see [`UserRecord`]) so extra fields survive a round trip.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[schema(example = json!({"name": "Alice", "age": 25}))]
pub struct User {
    /// The user's name (unique key, case-sensitive)
    pub name: String,
    /// The user's age
    pub age: i64,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Utenti eliminati : 1")]
    pub message: String,
}

/// One entry of the users file, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(pub Value);

impl UserRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn name(&self) -> Option<&Value> {
        self.0.get("name")
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.0.as_object().map_or(false, |obj| obj.contains_key(key))
    }

    /// Both `name` and `age` keys are present (values are not checked).
    pub fn has_required_fields(&self) -> bool {
        self.has_field("name") && self.has_field("age")
    }

    /// Exact, case-sensitive match against a path parameter.
    pub fn has_name(&self, name: &str) -> bool {
        matches!(self.name(), Some(Value::String(n)) if n == name)
    }

    /// Name equality between two records. Only scalar names compare equal;
    /// a missing name never matches.
    pub fn same_name_as(&self, other: &UserRecord) -> bool {
        match (self.name(), other.name()) {
            (Some(Value::Object(_)), _) | (_, Some(Value::Object(_))) => false,
            (Some(Value::Array(_)), _) | (_, Some(Value::Array(_))) => false,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Name as used in a resource path: strings as-is, anything else as JSON text.
    pub fn name_for_path(&self) -> String {
        match self.name() {
            Some(Value::String(n)) => n.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        }
    }

    /// Copy holding only the `name` and `age` keys that are present.
    /// Non-object entries have no keys to strip and are returned as-is.
    pub fn summary(&self) -> Value {
        let Some(obj) = self.0.as_object() else {
            return self.0.clone();
        };
        let mut out = Map::new();
        for key in ["name", "age"] {
            if let Some(v) = obj.get(key) {
                out.insert(key.to_string(), v.clone());
            }
        }
        Value::Object(out)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Collator for ordering user names, Italian tailoring at tertiary
/// strength: accents and case only break ties, lowercase sorts first.
pub fn name_collator() -> Result<Collator, CollatorError> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    Collator::try_new(&locale!("it").into(), options)
}
