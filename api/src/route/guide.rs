use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::guide::{delete_guide, register_guide, show_guide, show_guide_list, update_guide};

pub fn build_guide_routers() -> Router<AppRegistry> {
    let guide_routers = Router::new()
        .route("/", get(show_guide_list).post(register_guide))
        .route(
            "/:guide_id",
            get(show_guide).put(update_guide).delete(delete_guide),
        );

    Router::new().nest("/guides", guide_routers)
}
