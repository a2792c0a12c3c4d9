// src/handlers/coffee_stores.rs
// DOCUMENTATION: HTTP handlers for coffee store operations
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::db::RecordStore;
use crate::errors::StoreError;
use crate::models::{
    CreateCoffeeStoreRequest, CreatedResponse, EnsureOutcome, LatLong, LookupQuery,
    MissingResponse, NearbyQuery, UpvoteOutcome, UpvoteRequest,
};
use crate::services::{CoffeeStoreService, NearbyService, PhotoSource, PlaceSource, SearchTerms};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// POST /api/createCoffeeStore
/// Persist a place on first view; returns the existing record(s) otherwise
pub async fn create_coffee_store(
    store: web::Data<Arc<dyn RecordStore>>,
    req: web::Json<CreateCoffeeStoreRequest>,
) -> Result<impl Responder, StoreError> {
    if let Err(e) = req.validate() {
        return Err(StoreError::ValidationError(e.to_string()));
    }

    let outcome =
        CoffeeStoreService::ensure_persisted(store.get_ref().as_ref(), req.into_inner()).await?;

    match outcome {
        EnsureOutcome::Existing(records) => Ok(HttpResponse::Ok().json(records)),
        EnsureOutcome::Created(record) => Ok(HttpResponse::Ok().json(CreatedResponse {
            message: "create a record",
            records: vec![record],
        })),
    }
}

/// PUT /api/upvoteCoffeeStoreById
/// Add one vote; an unknown id answers 200 with an explanation
pub async fn upvote_coffee_store(
    store: web::Data<Arc<dyn RecordStore>>,
    req: web::Json<UpvoteRequest>,
) -> Result<impl Responder, StoreError> {
    let outcome = CoffeeStoreService::upvote(store.get_ref().as_ref(), req.id.as_deref()).await?;

    match outcome {
        UpvoteOutcome::Upvoted(record) => Ok(HttpResponse::Ok().json(vec![record])),
        UpvoteOutcome::Missing(id) => Ok(HttpResponse::Ok().json(MissingResponse {
            message: "Coffee store id doesnt exist",
            id,
        })),
    }
}

/// GET /api/getCoffeeStoreById?id=
pub async fn get_coffee_store(
    store: web::Data<Arc<dyn RecordStore>>,
    query: web::Query<LookupQuery>,
) -> Result<impl Responder, StoreError> {
    let records = CoffeeStoreService::find(store.get_ref().as_ref(), query.id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/getCoffeeStoresByLocation?latLong=&limit=
/// Nearby places decorated with stock photos
pub async fn get_coffee_stores_by_location(
    config: web::Data<Config>,
    places: web::Data<Arc<dyn PlaceSource>>,
    photos: web::Data<Arc<dyn PhotoSource>>,
    query: web::Query<NearbyQuery>,
) -> Result<impl Responder, StoreError> {
    if let Err(e) = query.validate() {
        return Err(StoreError::ValidationError(e.to_string()));
    }

    let raw_ll = query
        .lat_long
        .as_deref()
        .unwrap_or(&config.default_lat_long);
    let ll: LatLong = raw_ll
        .parse()
        .map_err(|e: String| StoreError::InvalidInput(format!("Invalid latLong: {}", e)))?;
    let limit = query.limit.unwrap_or(config.default_limit);

    let terms = SearchTerms {
        places_query: config.places_query.clone(),
        photos_query: config.photos_query.clone(),
        photos_per_page: config.photos_per_page,
    };

    let result = NearbyService::fetch_nearby(
        places.get_ref().as_ref(),
        photos.get_ref().as_ref(),
        &terms,
        &ll,
        limit,
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Body decode failures answer with the same JSON error shape as the handlers
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        StoreError::InvalidInput(err.to_string()).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected query string: {}", err);
        StoreError::InvalidInput(err.to_string()).into()
    })
}

/// Configuration for coffee store routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .route("/createCoffeeStore", web::post().to(create_coffee_store))
            .route("/upvoteCoffeeStoreById", web::put().to(upvote_coffee_store))
            .route("/getCoffeeStoreById", web::get().to(get_coffee_store))
            .route(
                "/getCoffeeStoresByLocation",
                web::get().to(get_coffee_stores_by_location),
            ),
    );
}
