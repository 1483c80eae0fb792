//! Pragma CLI Entry Point
//!
//! This binary runs pragmatic communication simulations and inspects lexicons.

mod batch;
mod cli;

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
