use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::OperationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(pub i64);

/// A resolved guest directory record. Identity is keyed by phone number;
/// name and city are overwritten on repeat contact, `created_at` never is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub created_at: NaiveDateTime,
}

/// Caller-supplied guest details for the upsert operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub phone: String,
    pub city: String,
}

impl NewGuest {
    pub fn validate(&self) -> Result<(), OperationError> {
        for (field, value) in
            [("name", &self.name), ("phone", &self.phone), ("city", &self.city)]
        {
            if value.trim().is_empty() {
                return Err(OperationError::Validation(format!(
                    "guest {field} must contain at least one non-whitespace character"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestUpsertOutcome {
    /// True when the upsert created the row, false when it refreshed an
    /// existing one.
    pub new_guest: bool,
    pub guest: Guest,
}

#[cfg(test)]
mod tests {
    use super::NewGuest;
    use crate::errors::OperationError;

    fn guest() -> NewGuest {
        NewGuest {
            name: "Asha Rao".to_string(),
            phone: "+91-9000000001".to_string(),
            city: "Bengaluru".to_string(),
        }
    }

    #[test]
    fn complete_details_pass_validation() {
        guest().validate().expect("valid guest");
    }

    #[test]
    fn whitespace_only_field_is_rejected() {
        let mut invalid = guest();
        invalid.city = "   ".to_string();
        let error = invalid.validate().expect_err("blank city should fail");
        assert!(matches!(error, OperationError::Validation(ref message) if message.contains("city")));
    }

    #[test]
    fn empty_phone_is_rejected() {
        let mut invalid = guest();
        invalid.phone = String::new();
        assert!(invalid.validate().is_err());
    }
}
