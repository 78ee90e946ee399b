//! Decode a yEnc file and write the result next to it
//!
//! Usage: cargo run --example decode -- <article.txt> [output-dir]
//!
//! Set `RUST_LOG=yenc_rs=debug` to follow the decoder.

use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use yenc_rs::Decoder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().ok_or("usage: decode <article.txt> [output-dir]")?;
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let file = std::fs::File::open(&input)?;
    let mut decoder = Decoder::from_reader(file);
    let first = decoder.decode_first()?.clone();

    println!(
        "{}: {} part(s) decoded, first part {} ({} bytes)",
        first.name,
        decoder.parts().len(),
        first.number,
        first.body.len()
    );

    if !decoder.missing_parts().is_empty() {
        println!("Missing parts: {:?}", decoder.missing_parts());
        return Ok(());
    }

    let data = decoder.assemble()?;
    // Never trust a path from the article
    let name = Path::new(&first.name)
        .file_name()
        .ok_or("filename has no final component")?;
    let target = output_dir.join(name);
    std::fs::write(&target, &data)?;
    println!("Wrote {} bytes to {}", data.len(), target.display());

    Ok(())
}
