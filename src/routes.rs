// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{auth, quiz},
    models::{
        quiz::{OptionDto, QuestionDto, QuizDto, QuizSummary},
        user::{LoginRequest, RegisterRequest, TokenResponse},
    },
    state::AppState,
    utils::jwt::auth_middleware,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::list_quizzes,
        quiz::get_quiz,
        quiz::create_quiz,
        quiz::update_quiz,
        quiz::delete_quiz,
        auth::register,
        auth::login,
    ),
    components(schemas(
        QuizDto,
        QuestionDto,
        OptionDto,
        QuizSummary,
        RegisterRequest,
        LoginRequest,
        TokenResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "quizzes", description = "Quiz authoring"),
        (name = "auth", description = "Registration and login")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Assembles the main application router.
///
/// * `/auth/*` is public.
/// * `/quizzes*` sits behind the bearer-token guard.
/// * Swagger UI is served at `/swagger-ui`.
/// * Trace and CORS layers wrap everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LOCATION]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected quiz routes
    let quiz_routes = Router::new()
        .route("/quizzes", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/quizzes/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/auth", auth_routes)
        .merge(quiz_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
