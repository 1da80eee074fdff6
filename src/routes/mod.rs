use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, bookings, movies};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::create_public_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for unauthenticated routes
    let public_governor = create_public_governor();

    // Public routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Anonymous catalog browsing
    let public_routes = Router::new()
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie))
        .layer(public_governor);

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Catalog management
        .route("/movies", post(movies::create_movie))
        .route("/movies/{id}", put(movies::update_movie))
        .route("/movies/{id}", delete(movies::delete_movie))
        // Full booking list
        .route("/bookings", get(bookings::list_all_bookings))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Booking routes (any authenticated user; ownership rules are decided
    // per operation in the handlers)
    let booking_routes = Router::new()
        .route("/", get(bookings::my_bookings))
        .route("/", post(bookings::create_booking))
        .route("/new", get(bookings::new_booking))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}", put(bookings::update_booking))
        .route("/{id}", delete(bookings::delete_booking))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/bookings", booking_routes)
        .with_state(state)
}
