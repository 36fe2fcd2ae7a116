use api::{snowflake::Snowflake, App, Config, Database, NoTls};
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port: u16 = env::var("PORT")?.parse()?;
    let user = env::var("PG_USERNAME")?;
    let pass = env::var("PG_PASSWORD")?;
    let host = env::var("PG_HOSTNAME")?;
    let data = env::var("PG_DATABASE")?;
    let node = match env::var("NODE_ID") {
        Ok(node) => node.parse()?,
        _ => 0,
    };
    let ids = Snowflake::new(node)
        .ok_or_else(|| anyhow::anyhow!("NODE_ID must not exceed {}", api::snowflake::MAX_NODE))?;

    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        // Connect to the database
        let (client, conn) =
            Config::new().user(&user).password(&pass).host(&host).dbname(&data).port(5432).connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::error!("database connection closed: {err}");
            }
        });

        let db = Database::from(client);
        db.init().await.map_err(|_| anyhow::anyhow!("cannot initialize the database schema"))?;
        let app = Arc::new(App::new(db, ids));

        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(addr).await?;
        log::info!("listening on {addr}");

        let stop = tokio::signal::ctrl_c();
        tokio::pin!(stop);
        loop {
            let (stream, peer) = tokio::select! {
                biased;
                result = &mut stop => {
                    result?;
                    break;
                }
                result = listener.accept() => match result {
                    Ok(pair) => pair,
                    Err(err) => {
                        log::error!("cannot accept connection: {err}");
                        continue;
                    }
                },
            };

            let outer = app.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let inner = outer.clone();
                    async move { Ok::<_, Infallible>(inner.on_request(req).await) }
                });
                if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                    log::warn!("connection with {peer} failed: {err}");
                }
            });
        }

        log::info!("shutting down");
        anyhow::Ok(())
    })
}
