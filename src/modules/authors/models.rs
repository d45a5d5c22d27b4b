use bookstore_http::{FieldError, FieldErrors, Validate};
use serde::{Deserialize, Serialize};

pub const FIRST_NAME_MAX: usize = 50;
pub const LAST_NAME_MAX: usize = 50;
pub const BIO_MAX: usize = 250;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    /// Optimistic concurrency token, bumped on every update
    pub version: i64,
}

/// Author about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Read-only representation returned by list and get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReadOnly {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Request body for `POST /api/Authors`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Request body for `PUT /api/Authors/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

fn validate_author_fields(first_name: &str, last_name: &str, bio: Option<&str>) -> Vec<FieldError> {
    let mut errors = FieldErrors::default();
    errors.required_text("firstName", first_name, FIRST_NAME_MAX);
    errors.required_text("lastName", last_name, LAST_NAME_MAX);
    errors.optional_text("bio", bio, BIO_MAX);
    errors.into_vec()
}

impl Validate for AuthorCreate {
    fn validate(&self) -> Vec<FieldError> {
        validate_author_fields(&self.first_name, &self.last_name, self.bio.as_deref())
    }
}

impl Validate for AuthorUpdate {
    fn validate(&self) -> Vec<FieldError> {
        validate_author_fields(&self.first_name, &self.last_name, self.bio.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(first_name: &str, last_name: &str, bio: Option<&str>) -> AuthorCreate {
        AuthorCreate {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            bio: bio.map(str::to_string),
        }
    }

    #[test]
    fn accepts_minimal_author() {
        assert!(create("Jane", "Austen", None).validate().is_empty());
    }

    #[test]
    fn rejects_first_name_over_fifty_characters() {
        let errors = create(&"J".repeat(51), "Austen", None).validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "firstName");
        assert_eq!(errors[0].message, "firstName cannot exceed 50 characters");
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = create("", " ", Some(&"b".repeat(251))).validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firstName", "lastName", "bio"]);
    }

    #[test]
    fn missing_names_deserialize_as_required_errors() {
        let dto: AuthorUpdate = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(dto.id, 3);
        let fields: Vec<&str> = dto.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firstName", "lastName"]);
    }
}
