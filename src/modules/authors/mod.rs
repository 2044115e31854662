pub mod mapper;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use service::AuthorService;
use store::AuthorGateway;

pub const MODULE_NAME: &str = "authors";

/// CRUD over the author catalogue, mounted at `/api/authors`
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(gateway: Arc<dyn AuthorGateway>) -> Self {
        Self {
            service: AuthorService::new(gateway),
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let author_body = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{}", schema) }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int32" }
        }]);
        let author_fields = json!({
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "bio": { "type": ["string", "null"] }
        });
        let mut with_id = author_fields.clone();
        with_id["id"] = json!({ "type": "integer", "format": "int32" });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/AuthorReadOnlyDto" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": author_body("AuthorCreateDto"),
                        "responses": {
                            "201": {
                                "description": "Author created; `Location` points at the new author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorReadOnlyDto" }
                                    }
                                }
                            },
                            "400": error("Malformed payload"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": {
                                "description": "The author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/AuthorReadOnlyDto" }
                                    }
                                }
                            },
                            "404": error("Author not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Replace an author",
                        "tags": ["Authors"],
                        "parameters": id_param.clone(),
                        "requestBody": author_body("AuthorUpdateDto"),
                        "responses": {
                            "204": { "description": "Author updated" },
                            "400": error("Path and payload ids differ"),
                            "404": error("Author not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Author deleted" },
                            "404": error("Author not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "AuthorCreateDto": {
                        "type": "object",
                        "properties": author_fields,
                        "required": ["firstName", "lastName"]
                    },
                    "AuthorUpdateDto": {
                        "type": "object",
                        "properties": with_id.clone(),
                        "required": ["id", "firstName", "lastName"]
                    },
                    "AuthorReadOnlyDto": {
                        "type": "object",
                        "properties": with_id,
                        "required": ["id", "firstName", "lastName", "bio"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: store::CREATE_AUTHORS_TABLE,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create the authors module backed by the given database pool
pub fn create_module(pool: sqlx::SqlitePool) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(Arc::new(store::SqlAuthorGateway::new(
        pool,
    ))))
}
