use axum::{routing::post, Router};
use registry::AppRegistry;

use crate::handler::auth::{change_password, login, logout, register};

pub fn build_auth_routers() -> Router<AppRegistry> {
    let auth_routers = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/change-password", post(change_password));

    Router::new().nest("/auth", auth_routers)
}
