use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, GeocodeRequest, GeocodeResponse, NearbyRequest, NearbyResponse, RankRequest,
    RankResponse,
};
use crate::routes::AppState;

/// Hard cap on chefs returned by a nearby search
const MAX_NEARBY_LIMIT: usize = 100;

/// Configure location and ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/geocode", web::post().to(geocode))
        .route("/chefs/rank", web::post().to(rank_chefs))
        .route("/chefs/nearby", web::post().to(nearby_chefs));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Resolve an address, e.g. when a chef adds a location to their profile
///
/// POST /api/v1/geocode
///
/// An address that cannot be resolved answers 200 with `found: false`.
async fn geocode(
    state: web::Data<AppState>,
    req: web::Json<GeocodeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let location = state.engine.locate(&req.address).await;

    HttpResponse::Ok().json(GeocodeResponse {
        found: location.is_some(),
        location,
    })
}

/// Rank a chef list the client already holds
///
/// POST /api/v1/chefs/rank
///
/// Request body:
/// ```json
/// {
///   "origin": { "lat": 19.07, "lon": 72.87 },
///   "chefs": [{ "id": "c1", "ratingAverage": 4.5, "locationCoords": [19.1, 72.9] }]
/// }
/// ```
async fn rank_chefs(
    state: web::Data<AppState>,
    req: web::Json<RankRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let RankRequest { origin, chefs } = req.into_inner();
    let chefs = state.engine.rank(origin.as_ref(), chefs);

    HttpResponse::Ok().json(RankResponse {
        total_results: chefs.len(),
        chefs,
    })
}

/// Search the chef directory around a free-text location
///
/// POST /api/v1/chefs/nearby
///
/// Request body:
/// ```json
/// {
///   "address": "Bandra West, Mumbai",
///   "limit": 20
/// }
/// ```
async fn nearby_chefs(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let limit = req
        .limit
        .map(|l| l as usize)
        .unwrap_or(MAX_NEARBY_LIMIT)
        .min(MAX_NEARBY_LIMIT);

    tracing::info!("Nearby search for '{}', limit: {}", req.address.trim(), limit);

    // Directory listing and geocoding are independent, run them together
    let (chefs, origin) = tokio::join!(
        state.directory.list_chefs(),
        state.engine.locate(&req.address)
    );

    let chefs = match chefs {
        Ok(chefs) => chefs,
        Err(e) => {
            tracing::error!("Failed to list chefs: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to list chefs".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let total_results = chefs.len();
    let mut chefs = state.engine.rank(origin.as_ref(), chefs);
    chefs.truncate(limit);

    tracing::info!(
        "Returning {} chefs (from {}), location found: {}",
        chefs.len(),
        total_results,
        origin.is_some()
    );

    HttpResponse::Ok().json(NearbyResponse {
        location_found: origin.is_some(),
        origin,
        chefs,
        total_results,
    })
}
