//! Registers a handful of routes, dispatches a few requests, and prints the results.
//!
//! Run with `RUST_LOG=debug cargo run --example routes` to see routing decisions.

use rttp_router::{Context, Method, Router, SharedRouter, StatusCode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut router = Router::new();
    router.get("/", |ctx: &mut Context| {
        ctx.string(StatusCode::Ok, "<h1>Hello</h1>");
        ctx.set_header("Content-Type", "text/html");
    })?;
    router.get("/hello/:name", |ctx: &mut Context| {
        let name = ctx.param("name").unwrap_or("");
        let msg = format!("hello {name}, you're at {}\n", ctx.path());
        ctx.string(StatusCode::Ok, msg);
    })?;
    router.get("/assets/*filepath", |ctx: &mut Context| {
        let filepath = ctx.param("filepath").unwrap_or("").to_owned();
        if let Err(e) = ctx.json(StatusCode::Ok, &serde_json::json!({ "filepath": filepath })) {
            ctx.string(StatusCode::InternalServerError, e.to_string());
        }
    })?;

    let shared = SharedRouter::new(router);
    shared.update(|r| {
        r.post("/login", |ctx: &mut Context| ctx.status(StatusCode::NoContent))
    })?;

    println!("{}", serde_json::to_string_pretty(&shared.snapshot().routes())?);

    let requests = [
        (Method::Get, "/"),
        (Method::Get, "/hello/geektutu"),
        (Method::Get, "/assets/css/geektutu.css"),
        (Method::Post, "/login"),
        (Method::Get, "/missing"),
    ];
    for (method, path) in requests {
        let mut ctx = Context::new(method.clone(), path);
        shared.handle(&mut ctx);
        let response = ctx.into_response();
        println!(
            "{method} {path} -> {} [{}] {:?}",
            response.status(),
            body_kind(&response),
            response.body_str().unwrap_or("<binary>")
        );
    }

    Ok(())
}

fn body_kind(response: &rttp_router::Response) -> &'static str {
    match response.header_value("content-type") {
        Some(ct) if ct.starts_with("application/json") => "json",
        Some(ct) if ct.starts_with("text/html") => "html",
        Some(_) => "text",
        None => "empty",
    }
}
