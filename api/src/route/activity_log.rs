use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::activity_log::show_activity_logs;

pub fn build_activity_log_routers() -> Router<AppRegistry> {
    Router::new().route("/logs", get(show_activity_logs))
}
