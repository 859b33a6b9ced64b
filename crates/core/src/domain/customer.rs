use serde::{Deserialize, Serialize};

/// Row id of a persisted customer. Assigned by the database on first save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A restaurant patron.
///
/// A customer is transient (`id == None`) until its first successful save,
/// after which `id` is set once and never changes. `notes` is always a
/// string; records built without notes carry the empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl Customer {
    /// Build a transient customer with empty notes.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Derived display name, never stored: `first_name` + space + `last_name`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Customer;

    #[test]
    fn new_customer_is_transient_with_empty_notes() {
        let customer = Customer::new("Ada", "Lovelace", "555-0100");
        assert!(!customer.is_persisted());
        assert_eq!(customer.notes, "");
    }

    #[test]
    fn full_name_joins_first_and_last() {
        let customer = Customer::new("Ada", "Lovelace", "555-0100");
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn notes_default_to_empty_string_when_deserialized_absent() {
        let raw = r#"
            first_name = "Ada"
            last_name = "Lovelace"
            phone = "555-0100"
        "#;
        let customer: Customer = toml::from_str(raw).expect("customer should deserialize");
        assert_eq!(customer.notes, "");
    }
}
