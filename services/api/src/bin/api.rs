//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{JsonStoreAdapter, OpenAiLetterWriter, ResilientLetters, TemplateLetterWriter},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, register_handler},
        middleware::{require_admin, require_member},
        rest, state::AppState, ApiDoc,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use membership_core::ports::{LetterService, RecordStore};
use membership_core::{Lifecycle, SessionHolder};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Store & Reconcile the Administrator ---
    info!("Opening data directory {}...", config.data_dir.display());
    let store = Arc::new(JsonStoreAdapter::new(&config.data_dir).await?);
    store
        .reconcile_admin(&config.org, &config.admin_email, &config.admin_password)
        .await?;
    let store: Arc<dyn RecordStore> = store;

    // --- 3. Initialize the Letter Service ---
    let letters: Arc<dyn LetterService> = match &config.openai_api_key {
        Some(key) => {
            let client = Client::with_config(OpenAIConfig::new().with_api_key(key));
            Arc::new(ResilientLetters::new(
                OpenAiLetterWriter::new(client, config.letter_model.clone(), config.org.clone()),
                config.org.clone(),
            ))
        }
        None => {
            info!("OPENAI_API_KEY not set; appointment letters use the built-in template.");
            Arc::new(TemplateLetterWriter::new(config.org.clone()))
        }
    };

    // --- 4. Build the Shared AppState ---
    let lifecycle = Arc::new(Lifecycle::new(
        store.clone(),
        letters,
        config.org.code_prefix.clone(),
    ));
    let sessions = Arc::new(SessionHolder::new(store.clone()));
    let app_state = Arc::new(AppState {
        store,
        lifecycle,
        sessions,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/verify/{code}", get(rest::verify_handler))
        .route("/org", get(rest::org_handler))
        .route("/gallery", get(rest::gallery_handler))
        .route("/posts", get(rest::posts_handler));

    // Member routes (active session required)
    let member_routes = Router::new()
        .route("/me", get(rest::me_handler).put(rest::update_me_handler))
        .route("/me/gallery", post(rest::my_gallery_handler))
        .route("/me/links", get(rest::my_links_handler))
        .route("/me/card", get(rest::my_card_handler))
        .route("/me/card/share", post(rest::my_card_share_handler))
        .route("/me/letter", get(rest::my_letter_handler))
        .route("/me/application", get(rest::my_application_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_member,
        ));

    // Admin routes (active session holding the administrator role)
    let admin_routes = Router::new()
        .route("/members", get(rest::list_members_handler))
        .route(
            "/members/{id}",
            get(rest::get_member_handler).put(rest::update_member_handler),
        )
        .route("/members/{id}/approve", post(rest::approve_member_handler))
        .route("/members/{id}/reject", post(rest::reject_member_handler))
        .route(
            "/members/{id}/letter",
            post(rest::regenerate_letter_handler).get(rest::member_letter_handler),
        )
        .route(
            "/members/{id}/gallery/{media_id}/approve",
            post(rest::approve_media_handler),
        )
        .route("/members/{id}/card", get(rest::member_card_handler))
        .route(
            "/members/{id}/application",
            get(rest::member_application_handler),
        )
        .route("/org", axum::routing::put(rest::update_org_handler))
        .route("/posts", post(rest::create_post_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    // Combine API routes. Uploaded images travel inline as data URLs, so the
    // body limit is raised well above the axum default.
    let api_router = Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
