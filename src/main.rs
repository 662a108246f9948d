use wireline::config::Config;
use wireline::http::{Method, Request, ResponseWriter, StatusCode};
use wireline::router::Router;
use wireline::server;

fn routes() -> anyhow::Result<Router> {
    let mut router = Router::new();

    router.register("/", |w: &mut ResponseWriter, _r: &Request| {
        w.status(StatusCode::OK);
        w.header("X-Foo", "bar");
        w.body("Hello server");
        w.send();
    })?;

    router.register("/user/:name", |w: &mut ResponseWriter, r: &Request| {
        w.body(format!("Hello, {}", r.param("name").unwrap_or_default()));
        w.send();
    })?;

    router.register("/search", |w: &mut ResponseWriter, r: &Request| {
        w.body(format!("Search for: {}", r.query("q").unwrap_or_default()));
        w.send();
    })?;

    router.register("/submit", |w: &mut ResponseWriter, r: &Request| {
        if r.method != Method::POST {
            w.status(StatusCode::METHOD_NOT_ALLOWED);
            w.body("Method not allowed");
            w.send();
            return;
        }
        let mut body = b"Received: ".to_vec();
        body.extend_from_slice(r.body());
        w.body(body);
        w.send();
    })?;

    Ok(router)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    tokio::select! {
        res = server::run(&cfg, routes()?) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
