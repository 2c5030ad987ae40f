#![forbid(unsafe_code)]
#![deny(unused_must_use, clippy::all, clippy::pedantic, missing_docs)]
//! Launchpad web entry point and native stub fallback.

#[cfg(target_arch = "wasm32")]
fn main() {
    launchpad_web::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), std::io::Error> {
    use std::io::{self, Write};

    let mut stderr = io::stderr().lock();
    stderr.write_all(
        b"launchpad-web targets wasm32; build with `trunk build` or `cargo build --target wasm32-unknown-unknown`.\n",
    )?;
    stderr.flush()
}
