mod api;
mod exam;
mod ipc;
mod lessons;
mod model;
mod notify;
mod payments;
mod session;
mod validate;

use std::io::{self, BufRead, Write};

fn main() {
    dotenvy::dotenv().ok();
    // stdout carries the protocol; env_logger writes to stderr.
    env_logger::init();
    log::info!("kursd {} started", env!("CARGO_PKG_VERSION"));

    let mut state = ipc::AppState { api: None };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with an id; answer best-effort.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
