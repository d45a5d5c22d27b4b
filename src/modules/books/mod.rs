pub mod mapping;
pub mod models;
pub mod repository;
pub mod routes;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;
use sqlx::SqlitePool;

use repository::BookRepository;

pub const MODULE_NAME: &str = "Books";

/// Books resource: CRUD over the `books` table, reads joined with authors
pub struct BooksModule {
    repo: BookRepository,
}

impl BooksModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: BookRepository::new(pool),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(ctx.db)
            .await
            .context("books table is not readable")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            stored,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repo.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let book_write_properties = json!({
            "title": { "type": "string", "maxLength": models::TITLE_MAX },
            "year": { "type": "integer", "minimum": models::YEAR_MIN },
            "isbn": { "type": "string", "maxLength": models::ISBN_MAX },
            "summary": {
                "type": "string",
                "minLength": models::SUMMARY_MIN,
                "maxLength": models::SUMMARY_MAX
            },
            "image": { "type": ["string", "null"] },
            "price": { "type": "number", "minimum": 0 },
            "authorId": { "type": "integer", "format": "int64" }
        });
        let mut book_update_properties = book_write_properties.clone();
        book_update_properties["id"] = json!({ "type": "integer", "format": "int64" });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books with author names",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/BookReadOnly" }
                                        }
                                    }
                                }
                            },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created; Location points at the new book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": { "description": "Validation error or unknown author", "content": error },
                            "409": { "description": "Duplicate ISBN", "content": error },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get book details",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Book details",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookDetails" }
                                    }
                                }
                            },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookUpdate" }
                                }
                            }
                        },
                        "responses": {
                            "204": { "description": "Book updated" },
                            "400": { "description": "Id mismatch, validation error, or unknown author", "content": error },
                            "404": { "description": "Book not found", "content": error },
                            "409": { "description": "Concurrent modification or duplicate ISBN", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Book deleted" },
                            "404": { "description": "Book not found", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "year": { "type": "integer" },
                            "isbn": { "type": "string" },
                            "summary": { "type": "string" },
                            "image": { "type": ["string", "null"] },
                            "price": { "type": "number" },
                            "authorId": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id", "title", "year", "isbn", "summary", "price", "authorId"]
                    },
                    "BookReadOnly": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "image": { "type": ["string", "null"] },
                            "price": { "type": "number" },
                            "authorId": { "type": "integer", "format": "int64" },
                            "authorName": { "type": "string" }
                        },
                        "required": ["id", "title", "price", "authorId", "authorName"]
                    },
                    "BookDetails": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "year": { "type": "integer" },
                            "isbn": { "type": "string" },
                            "summary": { "type": "string" },
                            "image": { "type": ["string", "null"] },
                            "price": { "type": "number" },
                            "authorId": { "type": "integer", "format": "int64" },
                            "authorName": { "type": "string" }
                        },
                        "required": ["id", "title", "year", "isbn", "summary", "price", "authorId", "authorName"]
                    },
                    "BookCreate": {
                        "type": "object",
                        "properties": book_write_properties,
                        "required": ["title", "year", "isbn", "summary", "price", "authorId"]
                    },
                    "BookUpdate": {
                        "type": "object",
                        "properties": book_update_properties,
                        "required": ["id", "title", "year", "isbn", "summary", "price", "authorId"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT    NOT NULL,
                    year      INTEGER NOT NULL,
                    isbn      TEXT    NOT NULL UNIQUE,
                    summary   TEXT    NOT NULL,
                    image     TEXT,
                    price     REAL    NOT NULL,
                    author_id INTEGER NOT NULL REFERENCES authors (id),
                    version   INTEGER NOT NULL DEFAULT 1
                );
                CREATE INDEX books_author_id_idx ON books (author_id);
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(pool: SqlitePool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(pool))
}
