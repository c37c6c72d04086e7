//! Print the common catalog fields of every record in a MARC file
//!
//! Usage: `cargo run --example translate_marc -- books.mrc`
//!
//! Records that fail to decode are reported and skipped. Set `RUST_LOG=debug`
//! to see recovered defects and resynchronisation.

use anyhow::Context;
use marcdec::{FieldResolver, MarcError, MarcReader};
use std::fs::File;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: translate_marc <file.mrc>")?;
    let file = File::open(&path).with_context(|| format!("could not open {path}"))?;

    for (index, result) in MarcReader::new(file).enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err @ MarcError::Record { .. }) => {
                println!("{err}");
                println!();
                continue;
            },
            Err(err) => return Err(err).context("reading records failed"),
        };

        println!("{}", "=".repeat(60));
        println!("Translating MARC Record #{}", index + 1);
        println!("{}", "=".repeat(60));
        for (field, value) in record.resolve_all().iter() {
            println!("{}: {}", field.label(), value.unwrap_or("N/A"));
        }
        println!();
    }

    Ok(())
}
