pub mod contact;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn contact_routes() -> Router<SharedState> {
    Router::new().route("/api/contact", get(contact::health).post(contact::submit))
}
