//! # pagefile CLI
//!
//! A small demo binary that exercises the paged file manager and
//! record-based file manager end to end: create a file, insert a couple of
//! records against a fixed descriptor, read them back, and print them.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pagefile::{Attribute, AttributeType, FileHandle, PagedFileManager, RecordBasedFileManager};

#[derive(Parser)]
#[command(name = "pagefile")]
#[command(about = "Create a paged file, insert a couple of demo records, and print them back")]
struct Cli {
    /// Path to the paged file to create (overwritten if it already exists).
    #[arg(default_value = "demo.db")]
    path: PathBuf,

    /// Verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).compact().finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.path.exists() {
        PagedFileManager::destroy_file(&cli.path)?;
    }
    PagedFileManager::create_file(&cli.path)?;
    info!(path = %cli.path.display(), "created paged file");

    let mut handle = FileHandle::new();
    RecordBasedFileManager::open_file(&cli.path, &mut handle)?;

    let descriptor = vec![
        Attribute::new("id", AttributeType::Int, 4),
        Attribute::new("name", AttributeType::VarChar, 50),
        Attribute::new("score", AttributeType::Real, 4),
    ];

    let r1 = encode_demo_record(Some(7), Some("hi"), Some(3.5));
    let rid1 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r1)?;
    info!(?rid1, "inserted record");

    let r2 = encode_demo_record(None, Some("x"), None);
    let rid2 = RecordBasedFileManager::insert_record(&mut handle, &descriptor, &r2)?;
    info!(?rid2, "inserted record");

    for rid in [rid1, rid2] {
        let mut raw = Vec::new();
        RecordBasedFileManager::read_record(&mut handle, &descriptor, rid, &mut raw)?;
        let mut printed = String::new();
        RecordBasedFileManager::print_record(&descriptor, &raw, &mut printed)?;
        println!("--- {:?} ---", rid);
        print!("{printed}");
    }

    let (reads, writes, appends) = handle.collect_counter_values();
    println!("pages={} reads={reads} writes={writes} appends={appends}", handle.get_number_of_pages());

    RecordBasedFileManager::close_file(&mut handle)?;
    Ok(())
}

/// Build the external encoding (null bitmap + payloads) for a single record
/// conforming to the demo's `(id: Int, name: VarChar, score: Real)`
/// descriptor.
fn encode_demo_record(id: Option<i32>, name: Option<&str>, score: Option<f32>) -> Vec<u8> {
    let mut bitmap = vec![0u8; 1];
    if id.is_none() {
        bitmap[0] |= 1 << 7;
    }
    if name.is_none() {
        bitmap[0] |= 1 << 6;
    }
    if score.is_none() {
        bitmap[0] |= 1 << 5;
    }

    let mut out = bitmap;
    if let Some(v) = id {
        out.extend_from_slice(&v.to_le_bytes());
    }
    if let Some(v) = name {
        out.extend_from_slice(&(v.len() as u32).to_le_bytes());
        out.extend_from_slice(v.as_bytes());
    }
    if let Some(v) = score {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}
