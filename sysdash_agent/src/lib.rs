//! sysdash_agent: HTTP agent behind the sysdash dashboard. Serves sampled
//! system metrics plus simulated services and scheduled tasks under `/api`.

pub mod http;
pub mod latency;
pub mod metrics;
pub mod sampler;
pub mod services;
pub mod state;
pub mod tasks;
pub mod types;

pub const DEFAULT_PORT: u16 = 8080;

/// Services registered by `--demo` so the dashboard has something to drive.
pub const DEMO_SERVICES: [&str; 3] = ["nginx", "postgres", "redis"];

/// `--port N`, `-p N` or `--port=N`; the long form wins when both appear.
pub fn parse_port<I: IntoIterator<Item = String>>(args: I, default_port: u16) -> u16 {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    long.or(short)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default_port)
}
