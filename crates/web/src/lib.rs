pub use crate::common::RouteResult;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::Router;
use database::PgDatabase;
use engine::clients::payment::PaymentClient;
use engine::clients::receipt::ReceiptClient;
use engine::clients::sms::SmsClient;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod api;
pub mod common;
pub mod extractors;

#[derive(Clone)]
pub struct WebState {
    pub database: PgDatabase,
    pub payment: std::sync::Arc<PaymentClient>,
    pub receipt: Option<std::sync::Arc<ReceiptClient>>,
    pub sms: Option<std::sync::Arc<SmsClient>>,
}

impl WebState {
    pub fn pool(&self) -> &sqlx::PgPool {
        self.database.pool()
    }

    pub fn finalizer_clients(&self) -> engine::finalizer::FinalizerClients<'_> {
        engine::finalizer::FinalizerClients {
            payment: &self.payment,
            receipt: self.receipt.as_deref(),
            sms: self.sms.as_deref(),
        }
    }

    pub fn webhook_clients(&self) -> engine::webhook::WebhookClients<'_> {
        engine::webhook::WebhookClients {
            receipt: self.receipt.as_deref(),
            sms: self.sms.as_deref(),
        }
    }
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    state
        .database
        .ensure_schema()
        .await
        .expect("could not bootstrap trip-aware schema extensions");

    let routes = Router::new()
        .nest("/api", api::routes())
        .route("/", axum::routing::post(api::booking::webhook_fallback))
        .layer(cors_layer())
        .layer(axum::middleware::from_fn(common::log_requests))
        .with_state(state);

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

/// CORS permitting any origin, per §6: `GET,POST,OPTIONS` /
/// `Content-Type,Authorization`. `OPTIONS` preflights short-circuit with 204
/// before reaching any handler.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
