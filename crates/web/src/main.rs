use anyhow::{anyhow, Context};
use pinzu_bot::{load_bot_config, CommandRouter, TextRenderer};
use std::io::Read;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = load_bot_config().context("load config")?;
    let identity = config.identity()?;
    let store = config.open_store()?;
    let router = CommandRouter::new(identity, store, Box::new(TextRenderer), config.game.clone());

    let server = Server::http(&config.bind).map_err(|err| anyhow!("bind {}: {err}", config.bind))?;
    info!(bind = %config.bind, bot = router.identity().public_key(), "pinzu bot listening");
    for request in server.incoming_requests() {
        if let Err(err) = handle_request(request, &router) {
            error!("request error: {err:#}");
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct Reply {
    status: u16,
    body: String,
    json: bool,
}

impl Reply {
    fn json(status: u16, body: String) -> Self {
        Self {
            status,
            body,
            json: true,
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            json: false,
        }
    }
}

fn handle_request(mut request: tiny_http::Request, router: &CommandRouter) -> anyhow::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let mut body = String::new();
    if method == Method::Post {
        request
            .as_reader()
            .read_to_string(&mut body)
            .context("read request body")?;
    }
    let reply = route(&method, &url, &body, router);
    if reply.status >= 500 {
        warn!(%method, url = %url, status = reply.status, "request failed");
    }

    let content_type: &[u8] = if reply.json {
        b"application/json"
    } else {
        b"text/plain; charset=utf-8"
    };
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .map_err(|_| anyhow!("invalid content type header"))?;
    let response = Response::from_data(reply.body.into_bytes())
        .with_status_code(StatusCode(reply.status))
        .with_header(header);
    request.respond(response).context("send response")?;
    Ok(())
}

fn route(method: &Method, url: &str, body: &str, router: &CommandRouter) -> Reply {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (&Method::Get, "/healthz") => Reply::text(200, "ok"),
        (&Method::Post, "/api") => handle_event(body, router),
        _ => Reply::text(404, "not found"),
    }
}

/// Answers with the reply event, or a bare `""` when the bot stays silent.
fn handle_event(body: &str, router: &CommandRouter) -> Reply {
    match answer(body, router) {
        Ok(json) => Reply::json(200, json),
        Err(err) => {
            error!("handle event: {err:#}");
            let message = serde_json::Value::String(err.to_string()).to_string();
            Reply::json(500, message)
        }
    }
}

fn answer(body: &str, router: &CommandRouter) -> anyhow::Result<String> {
    match router.handle_json(body)? {
        Some(event) => serde_json::to_string(&event).context("serialize reply event"),
        None => Ok("\"\"".to_string()),
    }
}
