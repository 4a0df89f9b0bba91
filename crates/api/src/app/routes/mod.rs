use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod flat;
pub mod house;
pub mod system;

/// Endpoints that need no token.
pub fn public() -> Router {
    let router = Router::new()
        .route("/health", get(system::health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    #[cfg(feature = "dummy-login")]
    let router = router.route("/dummyLogin", get(auth::dummy_login));

    router
}

/// Endpoints open to any authenticated role.
pub fn authenticated() -> Router {
    Router::new()
        .route("/house/:id", get(house::list_flats))
        .route("/house/:id/subscribe", post(house::subscribe))
}

/// Endpoints restricted to moderators.
pub fn moderation() -> Router {
    Router::new()
        .route("/house/create", post(house::create))
        .route("/flat/create", post(flat::create))
        .route("/flat/update", post(flat::update))
}
