pub mod config;
pub mod detect;
pub mod relay;
pub mod serve;
pub mod timer;

use std::future::Future;

/// Run an async command body on a fresh multi-threaded runtime.
pub fn block_on<F, T>(future: F) -> Result<T, Box<dyn std::error::Error>>
where
    F: Future<Output = Result<T, Box<dyn std::error::Error>>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

/// Print a value as a single JSON line on stdout.
pub fn print_json_line<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
