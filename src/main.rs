use serde_json::Value;
use tracing_subscriber::EnvFilter;
use turnstile::middleware::{RequireHeader, TraceMiddleware};
use turnstile::{handlers, HttpEntity, Json, Request, Responder, ServerConfig};

const BODY_LIMIT: u64 = 64 * 1024;

async fn welcome(_: Request, res: Responder) -> turnstile::Result {
    Ok(res.send(serde_json::json!({ "message": "Welcome to the turnstile server!" }))?)
}

async fn echo(mut request: Request, res: Responder) -> turnstile::Result {
    let body = request.json::<Value>(BODY_LIMIT).await?;
    Ok(res.send(Json(body))?)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;

    let mut http = turnstile::http();
    http.with(TraceMiddleware::new());
    http.at("/").get(welcome);
    http.at("/data").post(handlers::sync(|_, res: &Responder| {
        res.send(serde_json::json!({ "message": "Data received!" }))
    }));
    http.at("/echo")
        .with(RequireHeader::new(turnstile::http::header::AUTHORIZATION))
        .post(echo);

    http.listen_with(config.address(), |addr| {
        log::info!("server running on http://{}", addr);
    })
    .await?;

    Ok(())
}
