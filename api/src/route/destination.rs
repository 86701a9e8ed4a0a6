use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::destination::{
    delete_destination, register_destination, show_destination, show_destination_list,
    update_destination,
};

pub fn build_destination_routers() -> Router<AppRegistry> {
    let destination_routers = Router::new()
        .route("/", get(show_destination_list).post(register_destination))
        .route(
            "/:destination_id",
            get(show_destination)
                .put(update_destination)
                .delete(delete_destination),
        );

    Router::new().nest("/destinations", destination_routers)
}
