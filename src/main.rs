//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local HTTP server.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::process::{Command, Stdio};
    use std::{thread, time::Duration};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("wasm-pack finished with {}", st);
            std::process::exit(1);
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH; the site may serve stale artifacts");
        }
    }

    log::info!("serving static/ at http://127.0.0.1:8000");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Keep process alive while the server runs
    loop {
        if let Some(status) = server.try_wait()? {
            log::error!("http server exited with {}", status);
            return Ok(());
        }
        thread::sleep(Duration::from_secs(1));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
