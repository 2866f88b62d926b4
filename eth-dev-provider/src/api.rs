use tracing::debug;
use crate::{
    engine::ProviderEngine,
    error::ProviderError,
    models::{
        jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcSuccess},
    },
};
use actix_web::{
    post, web, HttpRequest, HttpResponse,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Catch-all JSON-RPC endpoint dispatching into the provider pipeline
///
/// Accepts a standard JSON-RPC 2.0 request body and hands it to the engine.
/// The response is the first subprovider's answer, or a JSON-RPC error when
/// the method failed or nothing handled it.
#[post("/")]
async fn rpc_endpoint(
    req: HttpRequest,
    engine: web::Data<Arc<ProviderEngine>>,
    request: web::Json<JsonRpcRequest<Value>>,
) -> HttpResponse {
    debug!(
        "Received JSON-RPC request {} from {}",
        request.method,
        req.peer_addr().map(|a| a.to_string()).unwrap_or_else(|| "unknown".to_string())
    );

    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return HttpResponse::BadRequest().json(JsonRpcError::invalid_params(
            request.id.clone(),
            "Invalid JSON-RPC version. Expected 2.0".to_string(),
        ));
    }

    // Positional parameters; a missing or null params field means none
    let params: Vec<Value> = match &request.params {
        Value::Array(values) => values.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    };

    match engine.request(&request.method, &params).await {
        Ok(result) => HttpResponse::Ok().json(JsonRpcSuccess::new(request.id.clone(), result)),
        Err(ProviderError::EngineNotStarted) => {
            error!("Request received before the engine was started");
            HttpResponse::ServiceUnavailable().json(JsonRpcError::internal_error(
                request.id.clone(),
                "Provider engine has not been started".to_string(),
            ))
        }
        Err(e) => {
            // JSON-RPC level failures are part of the protocol, not HTTP errors
            debug!("Request {} failed: {}", request.method, e);
            HttpResponse::Ok().json(JsonRpcError::from_detail(
                request.id.clone(),
                e.into_detail(),
            ))
        }
    }
}

/// Service health check endpoint that verifies the pipeline is serving
#[post("/api/v1/health")]
async fn health_check(
    engine: web::Data<Arc<ProviderEngine>>,
) -> Result<HttpResponse, ProviderError> {
    info!("Health check requested");

    // Ask the pipeline for the latest block to verify it is answering
    match engine.request("eth_blockNumber", &[]).await {
        Ok(block_number) => {
            let response = serde_json::json!({
                "status": "ok",
                "latest_block": block_number,
                "subproviders": engine.subprovider_names(),
            });
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!("Health check failed: {:?}", e);
            Err(e)
        }
    }
}

/// Configure the API routes for the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(rpc_endpoint)
       .service(health_check);
}
