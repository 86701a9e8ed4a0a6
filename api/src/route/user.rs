use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{
    change_role, get_current_user, get_user, list_users, update_current_user,
};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/:user_id", get(get_user))
        .route("/:user_id/role", put(change_role));

    Router::new().nest("/users", user_routers)
}
