use std::env;

/// Variables baked into the WASM binary as the backend configuration.
const FORWARDED: [&str; 2] = ["API_URL", "API_TIMEOUT_SECS"];

fn main() {
    // A .env in this crate or any parent directory; real env vars win.
    if let Ok(path) = dotenvy::dotenv() {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    for key in FORWARDED {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
