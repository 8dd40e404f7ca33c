use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, HealthResponse, QuoteRequest, QuoteResponse};
use crate::routes::AppState;

/// Configure health, catalog and pricing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/services", web::get().to(list_services))
        .route("/quotes", web::post().to(create_quote));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Service and add-on catalog for building the booking form
///
/// GET /api/v1/services
async fn list_services(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.catalog())
}

/// Price a booking
///
/// POST /api/v1/quotes
///
/// Request body:
/// ```json
/// {
///   "chefRate": { "pricePerHour": 1000 },
///   "booking": {
///     "serviceType": "birthday",
///     "duration": 4,
///     "guestCount": 15,
///     "date": "2024-06-15",
///     "selectedAddOns": ["Cleanup"]
///   }
/// }
/// ```
///
/// A partially filled form answers 200 with `computable: false`.
async fn create_quote(
    state: web::Data<AppState>,
    req: web::Json<QuoteRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let QuoteRequest { chef_rate, booking } = req.into_inner();
    let booking = booking.into_booking();
    let quote = state.engine.quote(chef_rate.as_ref(), &booking);

    HttpResponse::Ok().json(QuoteResponse { quote })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::test_state;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_quote_endpoint_prices_booking() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/quotes")
            .set_json(serde_json::json!({
                "chefRate": {"pricePerHour": 1000},
                "booking": {
                    "serviceType": "birthday",
                    "duration": 4,
                    "guestCount": 15,
                    "date": "2024-06-15",
                    "selectedAddOns": ["Cleanup"]
                }
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["quote"]["total"], 8430);
        assert_eq!(body["quote"]["computable"], true);
    }

    #[actix_web::test]
    async fn test_quote_endpoint_unknown_service_is_not_computable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/quotes")
            .set_json(serde_json::json!({
                "chefRate": {"pricePerHour": 1000},
                "booking": {"serviceType": "brunch"}
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["quote"]["total"], 0);
        assert_eq!(body["quote"]["computable"], false);
    }

    #[actix_web::test]
    async fn test_quote_endpoint_huge_rate_is_not_computable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/quotes")
            .set_json(serde_json::json!({
                "chefRate": {"pricePerHour": 1e28},
                "booking": {
                    "serviceType": "marriage",
                    "duration": 12,
                    "guestCount": 500,
                    "date": "2024-06-15"
                }
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["quote"]["computable"], false);
    }

    #[actix_web::test]
    async fn test_services_endpoint_lists_catalog() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/services").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["services"].as_array().map(|s| s.len()), Some(3));
        assert_eq!(body["base_add_ons"][0]["name"], "Cleanup");
    }
}
