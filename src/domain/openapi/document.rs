//! Parsed OpenAPI document

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::payload::HttpMethod;
use crate::domain::DomainError;

/// Maximum depth when inlining local `$ref` pointers
const MAX_REF_DEPTH: usize = 8;

/// One operation declared under `paths`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSpec {
    pub operation_id: String,
    pub method: HttpMethod,
    /// Path template, e.g. `/tickets/{id}`
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Path-level and operation-level parameters with `$ref`s inlined
    pub parameters: Vec<Value>,
    /// JSON request body schema, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
}

/// Read-only view over an OpenAPI 3 or Swagger 2 document
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    raw: Value,
}

impl OpenApiDocument {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Parse JSON, falling back to YAML
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        if let Ok(raw) = serde_json::from_str::<Value>(text) {
            return Self::from_value(raw);
        }

        let raw: Value = serde_yaml::from_str(text).map_err(|e| {
            DomainError::specification(format!("Document is neither JSON nor YAML: {}", e))
        })?;

        Self::from_value(raw)
    }

    fn from_value(raw: Value) -> Result<Self, DomainError> {
        if !raw.get("paths").is_some_and(Value::is_object) {
            return Err(DomainError::specification("Document has no 'paths' object"));
        }

        Ok(Self::new(raw))
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn title(&self) -> Option<&str> {
        self.raw.pointer("/info/title").and_then(Value::as_str)
    }

    /// Base URLs declared by the document
    ///
    /// OpenAPI 3 lists them under `servers`; Swagger 2 splits them into
    /// `schemes`, `host` and `basePath`.
    pub fn servers(&self) -> Vec<String> {
        if let Some(servers) = self.raw.get("servers").and_then(Value::as_array) {
            return servers
                .iter()
                .filter_map(|s| s.get("url").and_then(Value::as_str))
                .map(|url| url.trim_end_matches('/').to_string())
                .collect();
        }

        let Some(host) = self.raw.get("host").and_then(Value::as_str) else {
            return Vec::new();
        };

        let base_path = self
            .raw
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim_end_matches('/');

        let schemes: Vec<&str> = self
            .raw
            .get("schemes")
            .and_then(Value::as_array)
            .map(|s| s.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let schemes = if schemes.is_empty() { vec!["https"] } else { schemes };

        schemes
            .into_iter()
            .map(|scheme| format!("{}://{}{}", scheme, host, base_path))
            .collect()
    }

    /// All operations, in document order
    pub fn operations(&self) -> Vec<OperationSpec> {
        let Some(paths) = self.raw.get("paths").and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut operations = Vec::new();

        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                continue;
            };

            let shared_params = item
                .get("parameters")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            for method in HttpMethod::ALL {
                let Some(operation) = item.get(method.openapi_key()).and_then(Value::as_object)
                else {
                    continue;
                };

                let Some(operation_id) = operation.get("operationId").and_then(Value::as_str)
                else {
                    continue;
                };

                operations.push(self.build_operation(
                    operation_id,
                    method,
                    path,
                    operation,
                    &shared_params,
                ));
            }
        }

        operations
    }

    /// Find an operation by its `operationId`
    pub fn find_operation(&self, operation_id: &str) -> Option<OperationSpec> {
        self.operations()
            .into_iter()
            .find(|op| op.operation_id == operation_id)
    }

    fn build_operation(
        &self,
        operation_id: &str,
        method: HttpMethod,
        path: &str,
        operation: &Map<String, Value>,
        shared_params: &[Value],
    ) -> OperationSpec {
        let own_params = operation
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut parameters = Vec::new();
        let mut body_param = None;

        for param in shared_params.iter().chain(own_params.iter()) {
            let param = self.inline_refs(param, 0);

            // Swagger 2 declares the body as a parameter
            if param.get("in").and_then(Value::as_str) == Some("body") {
                body_param = param.get("schema").cloned();
                continue;
            }

            parameters.push(param);
        }

        let request_body = operation
            .get("requestBody")
            .map(|body| self.inline_refs(body, 0))
            .and_then(|body| {
                body.pointer("/content/application~1json/schema")
                    .cloned()
                    .or_else(|| {
                        body.get("content")
                            .and_then(Value::as_object)
                            .and_then(|content| content.values().next())
                            .and_then(|media| media.get("schema"))
                            .cloned()
                    })
            })
            .or(body_param);

        OperationSpec {
            operation_id: operation_id.to_string(),
            method,
            path: path.to_string(),
            summary: operation
                .get("summary")
                .or_else(|| operation.get("description"))
                .and_then(Value::as_str)
                .map(String::from),
            parameters,
            request_body,
        }
    }

    /// Replace local `$ref` pointers with their targets
    fn inline_refs(&self, value: &Value, depth: usize) -> Value {
        if depth >= MAX_REF_DEPTH {
            return value.clone();
        }

        match value {
            Value::Object(map) => {
                if let Some(target) = map
                    .get("$ref")
                    .and_then(Value::as_str)
                    .and_then(|r| r.strip_prefix('#'))
                    .and_then(|pointer| self.raw.pointer(pointer))
                {
                    return self.inline_refs(target, depth + 1);
                }

                Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), self.inline_refs(v, depth + 1)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.inline_refs(v, depth + 1))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn openapi3() -> OpenApiDocument {
        OpenApiDocument::new(json!({
            "openapi": "3.0.0",
            "info": {"title": "Tickets", "version": "1"},
            "servers": [{"url": "https://api.example.com/v1/"}],
            "paths": {
                "/tickets": {
                    "post": {
                        "operationId": "create_ticket",
                        "summary": "Create a ticket",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/NewTicket"}
                                }
                            }
                        }
                    },
                    "get": {"operationId": "list_tickets"}
                },
                "/tickets/{id}/status": {
                    "parameters": [{"name": "id", "in": "path", "required": true}],
                    "get": {
                        "operationId": "get_ticket_status",
                        "parameters": [{"name": "verbose", "in": "query"}]
                    }
                }
            },
            "components": {
                "schemas": {
                    "NewTicket": {
                        "type": "object",
                        "properties": {"title": {"type": "string"}}
                    }
                }
            }
        }))
    }

    #[test]
    fn test_find_operation_with_request_body() {
        let doc = openapi3();
        let op = doc.find_operation("create_ticket").unwrap();

        assert_eq!(op.method, HttpMethod::POST);
        assert_eq!(op.path, "/tickets");
        assert_eq!(op.summary.as_deref(), Some("Create a ticket"));
        assert_eq!(
            op.request_body,
            Some(json!({"type": "object", "properties": {"title": {"type": "string"}}}))
        );
    }

    #[test]
    fn test_path_level_parameters_are_merged() {
        let doc = openapi3();
        let op = doc.find_operation("get_ticket_status").unwrap();

        let names: Vec<&str> = op
            .parameters
            .iter()
            .filter_map(|p| p.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["id", "verbose"]);
        assert!(op.request_body.is_none());
    }

    #[test]
    fn test_unknown_operation() {
        assert!(openapi3().find_operation("delete_ticket").is_none());
        assert_eq!(openapi3().operations().len(), 3);
    }

    #[test]
    fn test_openapi3_servers() {
        assert_eq!(openapi3().servers(), vec!["https://api.example.com/v1"]);
        assert_eq!(openapi3().title(), Some("Tickets"));
    }

    #[test]
    fn test_swagger2_servers_and_body_param() {
        let doc = OpenApiDocument::new(json!({
            "swagger": "2.0",
            "host": "petstore.example.com",
            "basePath": "/api",
            "schemes": ["https", "http"],
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "addPet",
                        "parameters": [
                            {"name": "body", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}
                        ]
                    }
                }
            },
            "definitions": {"Pet": {"type": "object"}}
        }));

        assert_eq!(
            doc.servers(),
            vec!["https://petstore.example.com/api", "http://petstore.example.com/api"]
        );

        let op = doc.find_operation("addPet").unwrap();
        assert!(op.parameters.is_empty());
        assert_eq!(op.request_body, Some(json!({"type": "object"})));
    }

    #[test]
    fn test_parse_yaml_document() {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Pets
  version: "1"
paths:
  /pets:
    get:
      operationId: listPets
"#;
        let doc = OpenApiDocument::parse(yaml).unwrap();
        assert!(doc.find_operation("listPets").is_some());
        assert!(doc.servers().is_empty());
    }

    #[test]
    fn test_parse_rejects_documents_without_paths() {
        assert!(OpenApiDocument::parse(r#"{"openapi": "3.0.0"}"#).is_err());
        assert!(OpenApiDocument::parse(": not [valid").is_err());
    }

    #[test]
    fn test_self_referencing_schema_terminates() {
        let doc = OpenApiDocument::new(json!({
            "paths": {
                "/nodes": {
                    "post": {
                        "operationId": "create_node",
                        "requestBody": {"content": {"application/json": {
                            "schema": {"$ref": "#/components/schemas/Node"}
                        }}}
                    }
                }
            },
            "components": {"schemas": {"Node": {
                "type": "object",
                "properties": {"child": {"$ref": "#/components/schemas/Node"}}
            }}}
        }));

        let op = doc.find_operation("create_node").unwrap();
        assert!(op.request_body.is_some());
    }
}
