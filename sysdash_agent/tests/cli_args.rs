//! CLI tests for sysdash_agent.
use assert_cmd::prelude::*;
use std::net::TcpStream;
use std::process::Command;
use std::time::{Duration, Instant};

#[test]
fn help_prints_usage() {
    let out = Command::cargo_bin("sysdash_agent")
        .expect("binary exists")
        .arg("--help")
        .output()
        .expect("run agent");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("--port"));
}

#[test]
fn binds_short_and_long_port_flags() {
    for (flag, port) in [("--port", 9555u16), ("-p", 9556)] {
        let mut child = Command::cargo_bin("sysdash_agent")
            .expect("binary exists")
            .args([flag, &port.to_string(), "--demo"])
            .env("RUST_LOG", "warn")
            .spawn()
            .expect("spawn agent");

        // Poll until it accepts connections
        let start = Instant::now();
        let mut bound = false;
        while start.elapsed() < Duration::from_secs(5) {
            if TcpStream::connect(("127.0.0.1", port)).is_ok() {
                bound = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        let _ = child.kill();
        let _ = child.wait();
        assert!(bound, "agent never listened on {port}");
    }
}
