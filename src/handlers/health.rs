// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use crate::db::RecordStore;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

pub async fn health_check(store: web::Data<Arc<dyn RecordStore>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "coffee-stores",
        "version": env!("CARGO_PKG_VERSION"),
        "record_store": store.backend()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_reports_backend() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["record_store"], "memory");
    }
}
