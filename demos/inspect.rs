//! Print the path tree of a newline-delimited JSON file.
//!
//! Run with: cargo run --example inspect -- events.ndjson [sample_percent] [seed]
//!
//! Set `RUST_LOG=jtree=debug` to watch the build.

use jtree::BuildOptions;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jtree=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or("usage: inspect <file.ndjson> [sample_percent] [seed]")?;
    let percent: f64 = match args.next() {
        Some(p) => p.parse()?,
        None => 100.0,
    };
    let mut options = BuildOptions::sampled(percent);
    if let Some(seed) = args.next() {
        options = options.with_seed(seed.parse()?);
    }

    let root = jtree::build_with_options(&path, &options)?;

    println!("Separator: {:?}", root.separator());
    println!(
        "Store: {} rows x {} columns\n",
        root.table().num_rows(),
        root.table().num_columns()
    );
    println!("{}", root);

    for node in root.iter().filter(|n| n.is_leaf()) {
        println!("{}", node.absolute_path().join("/"));
        for (name, column) in node.columns().iter() {
            println!("  {} ({} missing)", name, column.missing_count());
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}
