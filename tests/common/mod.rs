use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use vendorhub_api::{
    config::AppConfig, events, events::EventSender, handlers::AppServices, migrator::Migrator,
    AppState,
};

/// Full application wired against a private in-memory SQLite database.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory
        // database.
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.expect("connect sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        let db = Arc::new(db);

        let (event_tx, event_rx) = tokio::sync::mpsc::channel(64);
        tokio::spawn(events::process_events(event_rx));
        let event_sender = EventSender::new(event_tx);

        let services = AppServices::new(db.clone(), Arc::new(event_sender.clone()));
        let state = AppState {
            db,
            config: AppConfig::default(),
            event_sender,
            services,
        };
        let router = vendorhub_api::build_router(state.clone());

        Self { state, router }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request handled")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}
