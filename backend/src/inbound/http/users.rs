//! Account handlers.
//!
//! ```text
//! POST /register {"name":"Ada","email":"ada@example.com","password":"s3cret"}
//! POST /login    {"email":"ada@example.com","password":"s3cret"}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{CredentialValidationError, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Outcome marker carried by every success body.
pub(crate) const SUCCESS: &str = "Success";

/// Registration body. Absent fields deserialize as `None` so the domain can
/// name the missing one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.name.as_deref().unwrap_or_default(),
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Success")]
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[schema(example = "Success")]
    pub status: String,
    #[schema(example = "Login successful")]
    pub message: String,
    /// Bearer credential to send back as `Authorization`.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing field or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user_id = state.registration.register(&registration).await?;
    info!(%user_id, "user registered");
    Ok(HttpResponse::Created().json(MessageResponse {
        status: SUCCESS.to_owned(),
        message: "User is successfully registered".to_owned(),
    }))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing field or unknown email", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let issued = state.login.login(&credentials).await?;
    Ok(HttpResponse::Created().json(LoginResponse {
        status: SUCCESS.to_owned(),
        message: "Login successful".to_owned(),
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockLoginService, MockRegistrationService};
    use crate::domain::{Error, IssuedToken, UserId};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn post_json(ports: MockPorts, uri: &str, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .service(register)
                .service(login),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri(uri)
            .set_json(&body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    fn untouched_registration() -> MockRegistrationService {
        let mut registration = MockRegistrationService::new();
        registration.expect_register().times(0);
        registration
    }

    #[actix_web::test]
    async fn register_answers_created_without_echoing_secrets() {
        let mut registration = MockRegistrationService::new();
        registration
            .expect_register()
            .withf(|reg| reg.name().as_ref() == "Ada" && reg.password() == "s3cret")
            .times(1)
            .returning(|_| Ok(UserId::random()));
        let ports = MockPorts {
            registration,
            ..MockPorts::default()
        };

        let (status, body) = post_json(
            ports,
            "/register",
            json!({"name": "  Ada ", "email": "ada@example.com", "password": " s3cret "}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"status": "Success", "message": "User is successfully registered"})
        );
    }

    #[rstest]
    #[case::no_name(json!({"email": "ada@example.com", "password": "pw"}), "name")]
    #[case::blank_email(json!({"name": "Ada", "email": "   ", "password": "pw"}), "email")]
    #[case::null_password(json!({"name": "Ada", "email": "a@b.c", "password": null}), "password")]
    #[case::empty_body(json!({}), "name")]
    #[actix_web::test]
    async fn register_names_the_missing_field(#[case] payload: Value, #[case] field: &str) {
        let ports = MockPorts {
            registration: untouched_registration(),
            ..MockPorts::default()
        };
        let (status, body) = post_json(ports, "/register", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_field");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_bad_request() {
        let mut registration = MockRegistrationService::new();
        registration
            .expect_register()
            .returning(|_| Err(Error::duplicate_email()));
        let ports = MockPorts {
            registration,
            ..MockPorts::default()
        };
        let (status, body) = post_json(
            ports,
            "/register",
            json!({"name": "Ada", "email": "ada@example.com", "password": "pw"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "duplicate_email");
        assert_eq!(body["message"], "Email already exists");
    }

    #[actix_web::test]
    async fn login_returns_token_and_expiry() {
        let expires_at = Utc
            .with_ymd_and_hms(2026, 4, 2, 8, 30, 0)
            .single()
            .expect("valid timestamp");
        let mut login_service = MockLoginService::new();
        login_service
            .expect_login()
            .withf(|creds| creds.email().as_ref() == "ada@example.com")
            .times(1)
            .returning(move |_| {
                Ok(IssuedToken {
                    token: "v1.payload.sig".to_owned(),
                    expires_at,
                })
            });
        let ports = MockPorts {
            login: login_service,
            ..MockPorts::default()
        };

        let (status, body) = post_json(
            ports,
            "/login",
            json!({"email": "ada@example.com", "password": "s3cret"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "Success");
        assert_eq!(body["token"], "v1.payload.sig");
        assert_eq!(body["expiresAt"], "2026-04-02T08:30:00Z");
    }

    #[rstest]
    #[case::unknown_email(Error::user_not_found(), StatusCode::BAD_REQUEST, "user_not_found")]
    #[case::wrong_password(
        Error::invalid_credentials(),
        StatusCode::UNAUTHORIZED,
        "invalid_credentials"
    )]
    #[actix_web::test]
    async fn login_failures_map_to_statuses(
        #[case] failure: Error,
        #[case] expected_status: StatusCode,
        #[case] expected_code: &str,
    ) {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_login()
            .returning(move |_| Err(failure.clone()));
        let ports = MockPorts {
            login: login_service,
            ..MockPorts::default()
        };
        let (status, body) = post_json(
            ports,
            "/login",
            json!({"email": "ada@example.com", "password": "nope"}),
        )
        .await;
        assert_eq!(status, expected_status);
        assert_eq!(body["code"], expected_code);
    }

    #[actix_web::test]
    async fn login_requires_a_password() {
        let mut login_service = MockLoginService::new();
        login_service.expect_login().times(0);
        let ports = MockPorts {
            login: login_service,
            ..MockPorts::default()
        };
        let (status, body) =
            post_json(ports, "/login", json!({"email": "ada@example.com"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "password");
    }
}
