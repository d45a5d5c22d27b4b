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

use repository::AuthorRepository;

pub const MODULE_NAME: &str = "Authors";

/// Authors resource: CRUD over the `authors` table
pub struct AuthorsModule {
    repo: AuthorRepository,
}

impl AuthorsModule {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: AuthorRepository::new(pool),
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(ctx.db)
            .await
            .context("authors table is not readable")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            stored,
            "authors module initialized"
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

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "List of authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/AuthorReadOnly" }
                                        }
                                    }
                                }
                            },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Author created; Location points at the new author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorReadOnly" }
                                    }
                                }
                            },
                            "400": { "description": "Validation error", "content": error },
                            "500": { "description": "Internal server error", "content": error }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorReadOnly" }
                                    }
                                }
                            },
                            "404": { "description": "Author not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Update an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorUpdate" }
                                }
                            }
                        },
                        "responses": {
                            "204": { "description": "Author updated" },
                            "400": { "description": "Id mismatch or validation error", "content": error },
                            "404": { "description": "Author not found", "content": error },
                            "409": { "description": "Concurrent modification", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Author deleted" },
                            "404": { "description": "Author not found", "content": error },
                            "409": { "description": "Author still has books", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "AuthorReadOnly": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" },
                            "bio": { "type": ["string", "null"] }
                        },
                        "required": ["id", "firstName", "lastName"]
                    },
                    "AuthorCreate": {
                        "type": "object",
                        "properties": {
                            "firstName": { "type": "string", "maxLength": models::FIRST_NAME_MAX },
                            "lastName": { "type": "string", "maxLength": models::LAST_NAME_MAX },
                            "bio": { "type": ["string", "null"], "maxLength": models::BIO_MAX }
                        },
                        "required": ["firstName", "lastName"]
                    },
                    "AuthorUpdate": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "firstName": { "type": "string", "maxLength": models::FIRST_NAME_MAX },
                            "lastName": { "type": "string", "maxLength": models::LAST_NAME_MAX },
                            "bio": { "type": ["string", "null"], "maxLength": models::BIO_MAX }
                        },
                        "required": ["id", "firstName", "lastName"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE authors (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT    NOT NULL CHECK (length(first_name) <= 50),
                    last_name  TEXT    NOT NULL CHECK (length(last_name) <= 50),
                    bio        TEXT             CHECK (length(bio) <= 250),
                    version    INTEGER NOT NULL DEFAULT 1
                );
                "#,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(pool: SqlitePool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(pool))
}
