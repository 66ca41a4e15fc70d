//! To-do handlers. Every route requires a bearer token.
//!
//! ```text
//! GET    /todos
//! GET    /todo/{id}
//! POST   /todo        {"text":"buy milk"}
//! PUT    /todo/{id}   {"text":"buy oat milk"}
//! DELETE /todo/{id}
//! ```
//!
//! Reads answer 201 rather than 200; existing clients depend on it.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Todo};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::SUCCESS;
use crate::inbound::http::validation::{TEXT, parse_todo_id, required_text, text_patch};

/// Wire form of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Uuid,
    #[schema(example = "buy milk")]
    pub text: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        Self {
            id: *todo.id().as_uuid(),
            text: todo.text().as_ref().to_owned(),
            user_id: *todo.owner().as_uuid(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

/// Body for create and update. Any other field, including an owner id, is
/// ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TodoRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    #[schema(example = "Success")]
    pub status: String,
    pub data: Vec<TodoResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoEnvelope {
    #[schema(example = "Success")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: TodoResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "Success")]
    pub status: String,
    #[schema(example = "Deleted")]
    pub message: String,
}

/// List the caller's items, oldest first.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 201, description = "Caller's items", body = TodoListResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let todos = state.todos_query.list(user.id()).await?;
    Ok(HttpResponse::Created().json(TodoListResponse {
        status: SUCCESS.to_owned(),
        data: todos.iter().map(TodoResponse::from).collect(),
    }))
}

/// Fetch one item. Items owned by someone else read as missing.
#[utoipa::path(
    get,
    path = "/todo/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 201, description = "The item", body = TodoResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "No such item for this caller", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todo/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(&path)?;
    let todo = state.todos_query.get(user.id(), &id).await?;
    Ok(HttpResponse::Created().json(TodoResponse::from(&todo)))
}

fn has_no_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return false;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .is_none_or(|len| len == 0)
}

fn rejected_body(err: &actix_web::Error) -> Error {
    err.as_error::<Error>()
        .cloned()
        .unwrap_or_else(|| Error::invalid_request("Request body is not valid JSON"))
}

/// Create an item owned by the caller.
#[utoipa::path(
    post,
    path = "/todo",
    request_body = TodoRequest,
    responses(
        (status = 201, description = "Item created", body = TodoEnvelope),
        (status = 400, description = "Text missing or blank", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todo")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: Result<web::Json<TodoRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let payload = match payload {
        Ok(json) => json.into_inner(),
        // An empty POST is a request without text, not a malformed one.
        Err(_) if has_no_body(&req) => TodoRequest::default(),
        Err(err) => return Err(rejected_body(&err)),
    };
    let text = required_text(payload.text.as_deref(), TEXT)?;
    let todo = state.todos.create(user.id(), text).await?;
    info!(todo_id = %todo.id(), owner = %todo.owner(), "todo created");
    Ok(HttpResponse::Created().json(TodoEnvelope {
        status: SUCCESS.to_owned(),
        message: Some("New Todo is successfully created".to_owned()),
        data: TodoResponse::from(&todo),
    }))
}

/// Edit the text of an item the caller owns.
#[utoipa::path(
    put,
    path = "/todo/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Updated item", body = TodoEnvelope),
        (status = 400, description = "Malformed identifier or blank text", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Item belongs to another user (explicit policy)", body = ErrorSchema),
        (status = 404, description = "No such item for this caller", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[put("/todo/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<TodoRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(&path)?;
    let patch = text_patch(payload.text.as_deref(), TEXT)?;
    let todo = state.todos.update(user.id(), &id, patch).await?;
    Ok(HttpResponse::Ok().json(TodoEnvelope {
        status: SUCCESS.to_owned(),
        message: None,
        data: TodoResponse::from(&todo),
    }))
}

/// Delete an item the caller owns.
#[utoipa::path(
    delete,
    path = "/todo/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item deleted", body = DeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Item belongs to another user (explicit policy)", body = ErrorSchema),
        (status = 404, description = "No such item for this caller", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todo/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(&path)?;
    state.todos.delete(user.id(), &id).await?;
    info!(todo_id = %id, "todo deleted");
    Ok(HttpResponse::Ok().json(DeletedResponse {
        status: SUCCESS.to_owned(),
        message: "Deleted".to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRequestAuthenticator, MockTodoCommand, MockTodoQuery};
    use crate::domain::{Error, TodoId, TodoText, UserId};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    const TOKEN: &str = "Bearer v1.test.sig";

    #[fixture]
    fn caller() -> UserId {
        UserId::random()
    }

    fn item(owner: UserId, text: &str) -> Todo {
        let created = Utc
            .with_ymd_and_hms(2026, 4, 1, 8, 30, 0)
            .single()
            .expect("valid timestamp");
        Todo::new(
            TodoId::random(),
            TodoText::new(text).expect("valid text"),
            owner,
            created,
        )
    }

    fn authenticating_as(user: UserId) -> MockRequestAuthenticator {
        let mut authenticator = MockRequestAuthenticator::new();
        authenticator
            .expect_authenticate()
            .returning(move |_| Ok(user));
        authenticator
    }

    async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .service(list_todos)
                .service(get_todo)
                .service(create_todo)
                .service(update_todo)
                .service(delete_todo),
        )
        .await;
        let request = request.insert_header((AUTHORIZATION, TOKEN)).to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[rstest]
    #[actix_web::test]
    async fn list_wraps_items_in_data(caller: UserId) {
        let items = vec![item(caller, "first"), item(caller, "second")];
        let mut query = MockTodoQuery::new();
        query
            .expect_list()
            .withf(move |user| *user == caller)
            .returning(move |_| Ok(items.clone()));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos_query: query,
            ..MockPorts::default()
        };

        let (status, body) = send(ports, actix_test::TestRequest::get().uri("/todos")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "Success");
        let data = body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["text"], "first");
        assert_eq!(data[0]["userId"], caller.to_string());
        assert!(data[0].get("user_id").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn get_returns_the_bare_item(caller: UserId) {
        let stored = item(caller, "read");
        let id = *stored.id();
        let mut query = MockTodoQuery::new();
        query
            .expect_get()
            .withf(move |_, wanted| *wanted == id)
            .returning(move |_, _| Ok(stored.clone()));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos_query: query,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::get().uri(&format!("/todo/{id}")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["createdAt"], "2026-04-01T08:30:00Z");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_ids_never_reach_the_service(caller: UserId) {
        let mut query = MockTodoQuery::new();
        query.expect_get().times(0);
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos_query: query,
            ..MockPorts::default()
        };

        let (status, body) =
            send(ports, actix_test::TestRequest::get().uri("/todo/abc123")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_id");
        assert_eq!(body["message"], "Invalid ID: abc123");
    }

    #[rstest]
    #[actix_web::test]
    async fn create_ignores_a_supplied_owner(caller: UserId) {
        let mut command = MockTodoCommand::new();
        command
            .expect_create()
            .withf(move |owner, text| *owner == caller && text.as_ref() == "buy milk")
            .times(1)
            .returning(|owner, text| {
                Ok(Todo::new(TodoId::random(), text, *owner, Utc::now()))
            });
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };
        let intruder = UserId::random();

        let (status, body) = send(
            ports,
            actix_test::TestRequest::post()
                .uri("/todo")
                .set_json(json!({"text": " buy milk ", "userId": intruder.to_string()})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "New Todo is successfully created");
        assert_eq!(body["data"]["userId"], caller.to_string());
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::blank(json!({"text": "   "}))]
    #[actix_web::test]
    async fn create_requires_text(caller: UserId, #[case] payload: Value) {
        let mut command = MockTodoCommand::new();
        command.expect_create().times(0);
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::post().uri("/todo").set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_field");
        assert_eq!(body["details"]["field"], "text");
    }

    #[rstest]
    #[actix_web::test]
    async fn create_without_a_body_asks_for_text(caller: UserId) {
        let mut command = MockTodoCommand::new();
        command.expect_create().times(0);
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(ports, actix_test::TestRequest::post().uri("/todo")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_field");
        assert_eq!(body["details"]["field"], "text");
    }

    #[rstest]
    #[actix_web::test]
    async fn create_with_broken_json_is_an_invalid_request(caller: UserId) {
        let mut command = MockTodoCommand::new();
        command.expect_create().times(0);
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::post()
                .uri("/todo")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{\"text\": "),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_answers_ok_with_the_new_record(caller: UserId) {
        let stored = item(caller, "old");
        let id = *stored.id();
        let mut command = MockTodoCommand::new();
        command
            .expect_update()
            .withf(move |_, wanted, patch| {
                *wanted == id && patch.text.as_ref().is_some_and(|text| text.as_ref() == "new")
            })
            .returning(move |_, _, patch| Ok(stored.clone().apply(patch, Utc::now())));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::put()
                .uri(&format!("/todo/{id}"))
                .set_json(json!({"text": "new"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Success");
        assert_eq!(body["data"]["text"], "new");
        assert!(body.get("message").is_none());
    }

    #[rstest]
    #[case::concealed(Error::not_found("Todo not found"), StatusCode::NOT_FOUND)]
    #[case::explicit(
        Error::forbidden("Not authorised to modify this todo"),
        StatusCode::FORBIDDEN
    )]
    #[actix_web::test]
    async fn foreign_updates_follow_the_service_verdict(
        caller: UserId,
        #[case] verdict: Error,
        #[case] expected: StatusCode,
    ) {
        let mut command = MockTodoCommand::new();
        command
            .expect_update()
            .returning(move |_, _, _| Err(verdict.clone()));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, _) = send(
            ports,
            actix_test::TestRequest::put()
                .uri(&format!("/todo/{}", TodoId::random()))
                .set_json(json!({"text": "mine now"})),
        )
        .await;

        assert_eq!(status, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_confirms_removal(caller: UserId) {
        let mut command = MockTodoCommand::new();
        command
            .expect_delete()
            .withf(move |requester, _| *requester == caller)
            .times(1)
            .returning(|_, _| Ok(()));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::delete().uri(&format!("/todo/{}", TodoId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "Success", "message": "Deleted"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_of_missing_item_is_not_found(caller: UserId) {
        let mut command = MockTodoCommand::new();
        command
            .expect_delete()
            .returning(|_, _| Err(Error::not_found("Todo not found")));
        let ports = MockPorts {
            authenticator: authenticating_as(caller),
            todos: command,
            ..MockPorts::default()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::delete().uri(&format!("/todo/{}", TodoId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[actix_web::test]
    async fn delete_requires_authentication() {
        let mut command = MockTodoCommand::new();
        command.expect_delete().times(0);
        let ports = MockPorts {
            todos: command,
            ..MockPorts::default()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .service(delete_todo),
        )
        .await;
        let request = actix_test::TestRequest::delete()
            .uri(&format!("/todo/{}", TodoId::random()))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
