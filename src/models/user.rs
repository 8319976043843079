use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Registro de usuário como exposto pela API (`GET /api/users`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// ObjectId em hex, atribuído pelo servidor
    #[schema(example = "65f1c2a9e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[schema(example = "Ann")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The mutable part of the record, as it would be resubmitted by a form.
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            age: self.age,
            address: self.address.clone(),
        }
    }
}

/// Campos mutáveis de um usuário. Entrada de `create` e `update` no store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
}

impl UserFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Returns the first missing required field, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else {
            None
        }
    }
}

/// Body de `POST /api/users` e `PUT /api/users/{id}`.
///
/// Decodificação tolerante: o formulário envia strings vazias para campos
/// opcionais e a idade como texto.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "Ann")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    #[schema(value_type = Option<i64>, example = 34)]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
}

impl From<UserPayload> for UserFields {
    fn from(p: UserPayload) -> Self {
        UserFields {
            name: p.name.unwrap_or_default(),
            email: p.email.unwrap_or_default(),
            phone: p.phone,
            age: p.age,
            address: p.address,
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(serde::de::Error::custom("age must be a whole number")),
                }
            }
        }
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("age must be a whole number, got '{}'", s))),
        _ => Err(serde::de::Error::custom("age must be a whole number")),
    }
}

/// Documento da collection "users" (layout compatível com o app original)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
}

impl UserDocument {
    pub fn new(id: ObjectId, fields: UserFields, created_at: bson::DateTime) -> Self {
        UserDocument {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            age: fields.age,
            address: fields.address,
            created_at,
        }
    }
}

impl From<UserDocument> for UserRecord {
    fn from(d: UserDocument) -> Self {
        UserRecord {
            id: d.id.to_hex(),
            name: d.name,
            email: d.email,
            phone: d.phone,
            age: d.age,
            address: d.address,
            created_at: DateTime::<Utc>::from_timestamp_millis(d.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// Millisecond precision, the resolution BSON datetimes keep.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_treats_blank_optionals_as_absent() {
        let payload: UserPayload = serde_json::from_str(
            r#"{"name":"Ann","email":"a@x.com","phone":"","age":"","address":"   "}"#,
        )
        .unwrap();
        let fields = UserFields::from(payload);
        assert_eq!(fields, UserFields::new("Ann", "a@x.com"));
    }

    #[test]
    fn payload_accepts_age_as_number_or_text() {
        let from_text: UserPayload = serde_json::from_str(r#"{"age":"42"}"#).unwrap();
        let from_int: UserPayload = serde_json::from_str(r#"{"age":42}"#).unwrap();
        let from_float: UserPayload = serde_json::from_str(r#"{"age":42.0}"#).unwrap();
        assert_eq!(from_text.age, Some(42));
        assert_eq!(from_int.age, Some(42));
        assert_eq!(from_float.age, Some(42));
    }

    #[test]
    fn payload_rejects_non_numeric_age() {
        let err = serde_json::from_str::<UserPayload>(r#"{"age":"forty"}"#).unwrap_err();
        assert!(err.to_string().contains("age must be a whole number"));
        assert!(serde_json::from_str::<UserPayload>(r#"{"age":4.5}"#).is_err());
    }

    #[test]
    fn missing_required_reports_name_before_email() {
        assert_eq!(UserFields::new("", "").missing_required(), Some("name"));
        assert_eq!(UserFields::new("Ann", " ").missing_required(), Some("email"));
        assert_eq!(UserFields::new("Ann", "a@x.com").missing_required(), None);
    }

    #[test]
    fn record_serializes_camel_case_and_skips_absent_fields() {
        let record = UserRecord {
            id: "65f1c2a9e4b0a1b2c3d4e5f6".into(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            phone: None,
            age: Some(30),
            address: None,
            created_at: DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20Z");
        assert_eq!(json["age"], 30);
        assert!(json.get("phone").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn document_converts_to_record_with_hex_id() {
        let oid = ObjectId::new();
        let created = bson::DateTime::from_millis(1_700_000_000_123);
        let doc = UserDocument::new(oid, UserFields::new("Ann", "a@x.com"), created);
        let record = UserRecord::from(doc);
        assert_eq!(record.id, oid.to_hex());
        assert_eq!(record.created_at.timestamp_millis(), 1_700_000_000_123);
    }
}
