use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::trip::{
    assign_guides, delete_trip, register_trip, search_trips, show_trip, show_trip_list,
    show_trip_registrations, update_trip,
};

pub fn build_trip_routers() -> Router<AppRegistry> {
    let trip_routers = Router::new()
        .route("/", get(show_trip_list).post(register_trip))
        .route("/search", get(search_trips))
        .route(
            "/:trip_id",
            get(show_trip).put(update_trip).delete(delete_trip),
        )
        .route("/:trip_id/guides", put(assign_guides))
        .route("/:trip_id/registrations", get(show_trip_registrations));

    Router::new().nest("/trips", trip_routers)
}
