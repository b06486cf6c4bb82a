use serde::{Deserialize, Serialize};

/// A persisted user record. `id` is server-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub weight: f64,
    pub smoker: bool,
}

/// Wire-input shape for create/replace. There is no `id` field: a
/// client-supplied id in the body is ignored, and updates are full
/// replacements, so a field left out of the body resets to its zero value.
/// Type-mismatched values are rejected by serde, never zeroed.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub weight: f64,
    pub smoker: bool,
}

impl UserPayload {
    pub fn into_record(self, id: String) -> UserRecord {
        UserRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            weight: self.weight,
            smoker: self.smoker,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero_values() {
        let payload: UserPayload = serde_json::from_str(r#"{"firstName":"Jane"}"#).unwrap();
        let record = payload.into_record("u-1".into());
        assert_eq!(record.first_name, "Jane");
        assert_eq!(record.last_name, "");
        assert_eq!(record.age, 0);
        assert_eq!(record.weight, 0.0);
        assert!(!record.smoker);
    }

    #[test]
    fn client_supplied_id_is_ignored() {
        let payload: UserPayload =
            serde_json::from_str(r#"{"id":"forged","firstName":"Jane"}"#).unwrap();
        let record = payload.into_record("server-assigned".into());
        assert_eq!(record.id, "server-assigned");
    }

    #[test]
    fn type_mismatch_is_rejected_not_zeroed() {
        let res = serde_json::from_str::<UserPayload>(r#"{"age":"thirty"}"#);
        assert!(res.is_err());
    }
}
