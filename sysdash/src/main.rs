//! Entry point for the sysdash TUI. Parses args, resolves the profile and runs the App.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use sysdash::api::ApiClient;
use sysdash::app::App;
use sysdash::logging::init_logging;
use sysdash::poll::PollIntervals;
use sysdash::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ProfilesFile, ResolveProfile,
};

const DEMO_PORT: u16 = 3231;
const DEFAULT_PAGE: &str = "dashboard";

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    page: Option<String>,
    save: bool,
    demo: bool,
    dry_run: bool,
}

#[derive(Debug, PartialEq)]
enum ArgsError {
    Help(String),
    Invalid(String),
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--page TARGET] [--save] [--demo] [--dry-run] [http://HOST:PORT]"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, ArgsError> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "sysdash".into());
    let mut parsed = ParsedArgs::default();
    let mut help = false;

    fn value(it: &mut impl Iterator<Item = String>, flag: &str, prog: &str) -> Result<String, ArgsError> {
        it.next()
            .ok_or_else(|| ArgsError::Invalid(format!("{flag} needs a value. {}", usage(prog))))
    }

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => help = true,
            "--tls-ca" | "-t" => parsed.tls_ca = Some(value(&mut it, &arg, &prog)?),
            "--profile" | "-P" => parsed.profile = Some(value(&mut it, &arg, &prog)?),
            "--page" => parsed.page = Some(value(&mut it, &arg, &prog)?),
            "--save" => parsed.save = true,
            "--demo" => parsed.demo = true,
            "--dry-run" => parsed.dry_run = true,
            _ if arg.contains('=') && arg.starts_with("--") => {
                let (k, v) = arg.split_once('=').unwrap_or_default();
                let v = (!v.is_empty()).then(|| v.to_string());
                match k {
                    "--tls-ca" => parsed.tls_ca = v,
                    "--profile" => parsed.profile = v,
                    "--page" => parsed.page = v,
                    _ => return Err(ArgsError::Invalid(format!("Unknown flag {k}. {}", usage(&prog)))),
                }
            }
            _ if arg.starts_with('-') => {
                return Err(ArgsError::Invalid(format!("Unknown flag {arg}. {}", usage(&prog))));
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(ArgsError::Invalid(format!(
                        "Unexpected argument. {}",
                        usage(&prog)
                    )));
                }
            }
        }
    }
    if help {
        return Err(ArgsError::Help(usage(&prog)));
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(ArgsError::Help(msg)) => {
            println!("{msg}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{msg}");
            return Ok(ExitCode::from(2));
        }
    };

    if let Some(path) = init_logging()? {
        eprintln!("sysdash: logging to {}", path.display());
    }

    let page = parsed.page.clone().unwrap_or_else(|| DEFAULT_PAGE.into());

    if parsed.demo || matches!(parsed.profile.as_deref(), Some("demo")) {
        return run_demo_mode(&page, parsed.dry_run).await;
    }

    let Some((url, tls_ca)) = resolve_target(&parsed)? else {
        return Ok(ExitCode::SUCCESS);
    };
    if url == "demo" {
        return run_demo_mode(&page, parsed.dry_run).await;
    }

    let api = ApiClient::new(&url, tls_ca.as_deref())?;
    if parsed.dry_run {
        println!("sysdash: would connect to {} (page: {page})", api.base_url());
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!(url = %api.base_url(), %page, "starting");
    let mut app = App::new(api, PollIntervals::from_env());
    app.run(Some(&page)).await?;
    Ok(ExitCode::SUCCESS)
}

/// Work out (url, tls_ca) from the args and saved profiles, prompting when
/// needed. `None` means the user aborted or there is nothing to connect to.
fn resolve_target(parsed: &ParsedArgs) -> anyhow::Result<Option<(String, Option<String>)>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
    };
    let mut profiles_mut = profiles_file.clone();

    let target = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(u, t) => {
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry {
                    url: u.clone(),
                    tls_ca: t.clone(),
                };
                match profiles_mut.profiles.get(name).cloned() {
                    // first use of a name saves it right away
                    None => persist(&mut profiles_mut, name, entry),
                    Some(existing) if existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!("Overwrite existing profile '{name}'? [y/N]: "));
                        if overwrite {
                            persist(&mut profiles_mut, name, entry);
                        }
                    }
                    Some(_) => {}
                }
            }
            (u, t)
        }
        ResolveProfile::Loaded(u, t) => (u, t),
        ResolveProfile::PromptSelect(mut names) => {
            if !names.iter().any(|n| n == "demo") {
                names.push("demo".into());
            }
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(None);
            };
            if name == "demo" {
                return Ok(Some(("demo".into(), None)));
            }
            match profiles_mut.profiles.get(name) {
                Some(entry) => (entry.url.clone(), entry.tls_ca.clone()),
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or https://...): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let ca = Some(ca.trim().to_string()).filter(|c| !c.is_empty());
            persist(
                &mut profiles_mut,
                &name,
                ProfileEntry {
                    url: url.clone(),
                    tls_ca: ca.clone(),
                },
            );
            (url, ca)
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(target))
}

fn persist(pf: &mut ProfilesFile, name: &str, entry: ProfileEntry) {
    if pf.upsert(name, entry) {
        if let Err(e) = save_profiles(pf) {
            eprintln!("sysdash: could not save profile '{name}': {e}");
        }
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    match prompt_string(prompt) {
        Ok(line) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

// --- Demo Mode ---

async fn run_demo_mode(page: &str, dry_run: bool) -> anyhow::Result<ExitCode> {
    let url = format!("http://127.0.0.1:{DEMO_PORT}/");
    if dry_run {
        println!("sysdash: would start demo agent and connect to {url} (page: {page})");
        return Ok(ExitCode::SUCCESS);
    }
    let child = spawn_demo_agent(DEMO_PORT).await?;
    let api = ApiClient::new(&url, None)?;
    let mut app = App::new(api, PollIntervals::from_env());
    let res = tokio::select! {
        res = app.run(Some(page)) => res,
        _ = tokio::signal::ctrl_c() => Ok(()),
    };
    drop(child);
    res.map(|_| ExitCode::SUCCESS)
}

/// Kills the demo agent when dropped.
struct DemoGuard(std::process::Child);

impl Drop for DemoGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

async fn spawn_demo_agent(port: u16) -> anyhow::Result<DemoGuard> {
    let candidate = find_agent_executable();
    let child = std::process::Command::new(&candidate)
        .arg("--port")
        .arg(port.to_string())
        .arg("--demo")
        .env("RUST_LOG", "warn")
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to start {}: {e}", candidate.display()))?;
    // Give the agent a brief moment to bind
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    Ok(DemoGuard(child))
}

fn find_agent_executable() -> std::path::PathBuf {
    #[cfg(windows)]
    let name = "sysdash_agent.exe";
    #[cfg(not(windows))]
    let name = "sysdash_agent";
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(name);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    // Fallback to relying on PATH
    std::path::PathBuf::from(name)
}
