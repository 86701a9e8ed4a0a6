use axum::{
    routing::{get, patch},
    Router,
};
use registry::AppRegistry;

use crate::handler::registration::{
    delete_registration, register_registration, show_registration, show_registration_list,
    show_user_registrations, update_registration, update_registration_status,
};

pub fn build_registration_routers() -> Router<AppRegistry> {
    let registration_routers = Router::new()
        .route("/", get(show_registration_list).post(register_registration))
        .route(
            "/:registration_id",
            get(show_registration)
                .put(update_registration)
                .delete(delete_registration),
        )
        .route("/:registration_id/status", patch(update_registration_status))
        .route("/user/:user_id", get(show_user_registrations));

    Router::new().nest("/trip-registrations", registration_routers)
}
