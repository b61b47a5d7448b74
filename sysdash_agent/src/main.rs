//! sysdash_agent binary.

use std::net::SocketAddr;

use sysdash_agent::{
    http, latency::Latency, parse_port, sampler, state::AppState, DEFAULT_PORT, DEMO_SERVICES,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage: sysdash_agent [--port PORT|-p PORT] [--demo]\n\
     \n\
     Env: RUST_LOG (default sysdash_agent=info), SYSDASH_AGENT_SAMPLE_MS (default 5000),\n\
     \x20    SYSDASH_AGENT_INSTANT=1 (skip simulated delays)"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", usage());
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sysdash_agent=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let port = parse_port(args.iter().cloned(), DEFAULT_PORT);
    let state = AppState::new(Latency::from_env());
    if args.iter().any(|a| a == "--demo") {
        state.services.seed(&DEMO_SERVICES).await;
    }

    let period = sampler::period_from_env();
    let _sampler = sampler::spawn_sampler(state.clone(), period);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, sample_ms = period.as_millis() as u64, "agent listening");
    axum::serve(listener, http::router(state)).await?;
    Ok(())
}
