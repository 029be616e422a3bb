//! Router assembly.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{comments, reviews, terms, titles, users};
use crate::auth::{handlers as auth_handlers, middleware::identify};
use crate::infra::app_state::AppState;

/// Build the full application router. Identity resolution runs on every
/// request; reads stay open to anonymous callers and mutations are gated
/// per-handler by the policy.
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api/v1", create_v1_router(state.clone())).layer(
        TraceLayer::new_for_http(),
    )
    .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Signup and token exchange
        .route("/auth/signup", post(auth_handlers::signup))
        .route("/auth/token", post(auth_handlers::token))
        // Self profile; registered before the parameterized user routes
        .route("/users/me", get(users::me_get).patch(users::me_patch))
        // User administration
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Catalog terms
        .route(
            "/categories",
            get(terms::list_categories).post(terms::create_category),
        )
        .route("/categories/{slug}", delete(terms::delete_category))
        .route("/genres", get(terms::list_genres).post(terms::create_genre))
        .route("/genres/{slug}", delete(terms::delete_genre))
        // Titles
        .route("/titles", get(titles::list_titles).post(titles::create_title))
        .route(
            "/titles/{id}",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        // Reviews nested under titles
        .route(
            "/titles/{title_id}/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // Comments nested under reviews
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .layer(middleware::from_fn_with_state(state, identify))
        .layer(CorsLayer::permissive())
}
