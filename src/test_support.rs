//! In-process stub backend for tests.

use axum::Router;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Serve `router` on an ephemeral port and return its `/api` base URL
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

pub fn client_for(base_url: &str, session: SessionStore) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..ApiConfig::default()
    };
    ApiClient::new(&config, session).unwrap()
}
