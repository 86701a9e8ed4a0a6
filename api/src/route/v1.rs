use super::{
    activity_log::build_activity_log_routers, auth::build_auth_routers,
    destination::build_destination_routers, guide::build_guide_routers,
    health::build_health_check_routers, registration::build_registration_routers,
    trip::build_trip_routers, user::build_user_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_destination_routers())
        .merge(build_guide_routers())
        .merge(build_trip_routers())
        .merge(build_registration_routers())
        .merge(build_activity_log_routers());
    Router::new().nest("/api/v1", router)
}
