// Route exports
pub mod chefs;
pub mod quotes;

use actix_web::web;
use std::sync::Arc;

use crate::core::BookingEngine;
use crate::services::ChefDirectoryClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: BookingEngine,
    pub directory: Arc<ChefDirectoryClient>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(quotes::configure)
            .configure(chefs::configure),
    );
}
