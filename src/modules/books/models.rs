use bookstore_http::{FieldError, FieldErrors, Validate};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 50;
pub const ISBN_MAX: usize = 50;
pub const SUMMARY_MIN: usize = 10;
pub const SUMMARY_MAX: usize = 250;
pub const YEAR_MIN: i32 = 1000;

/// Persisted book row. Serialized as the body of `201 Created`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: i64,
    #[serde(skip)]
    pub version: i64,
}

/// Book about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: i64,
}

/// List row, projected straight from a join with the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookReadOnly {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: i64,
    pub author_name: String,
}

/// Single-book view, projected straight from a join with the author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: String,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: i64,
    pub author_name: String,
}

/// Request body for `POST /api/Books`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub author_id: i64,
}

/// Request body for `PUT /api/Books/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub author_id: i64,
}

struct BookFields<'a> {
    title: &'a str,
    year: i32,
    isbn: &'a str,
    summary: &'a str,
    price: f64,
    author_id: i64,
}

impl BookFields<'_> {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        errors.required_text("title", self.title, TITLE_MAX);
        errors.at_least("year", self.year, YEAR_MIN);
        errors.required_text("isbn", self.isbn, ISBN_MAX);
        if errors.required("summary", self.summary) {
            errors.chars_between("summary", self.summary, SUMMARY_MIN, SUMMARY_MAX);
        }
        errors.at_least("price", self.price, 0.0);
        if self.author_id <= 0 {
            errors.reject("authorId", "authorId is required");
        }
        errors.into_vec()
    }
}

impl Validate for BookCreate {
    fn validate(&self) -> Vec<FieldError> {
        BookFields {
            title: &self.title,
            year: self.year,
            isbn: &self.isbn,
            summary: &self.summary,
            price: self.price,
            author_id: self.author_id,
        }
        .validate()
    }
}

impl Validate for BookUpdate {
    fn validate(&self) -> Vec<FieldError> {
        BookFields {
            title: &self.title,
            year: self.year,
            isbn: &self.isbn,
            summary: &self.summary,
            price: self.price,
            author_id: self.author_id,
        }
        .validate()
    }
}
