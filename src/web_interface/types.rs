/// Raw `application/x-www-form-urlencoded` pairs in submission order.
pub type FormPairs = Vec<(String, String)>;

// A field missing from the form reads as an empty string. When a field is
// repeated, the first occurrence is used.
fn first_value(pairs: &[(String, String)], key: &str) -> String {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

/// Body of `POST /create-todo`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateForm {
    pub title: String,
}

impl From<FormPairs> for CreateForm {
    fn from(pairs: FormPairs) -> Self {
        Self {
            title: first_value(&pairs, "title"),
        }
    }
}

/// Body of `POST /update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateForm {
    pub id: String,
    pub title: String,
}

impl From<FormPairs> for UpdateForm {
    fn from(pairs: FormPairs) -> Self {
        Self {
            id: first_value(&pairs, "id"),
            title: first_value(&pairs, "title"),
        }
    }
}

/// Body of `POST /delete`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteForm {
    pub id: String,
}

impl From<FormPairs> for DeleteForm {
    fn from(pairs: FormPairs) -> Self {
        Self {
            id: first_value(&pairs, "id"),
        }
    }
}
