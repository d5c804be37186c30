use ceb_reader::CebReader;
use std::env;

/// Bytes shown by `--dump`.
const DUMP_PREVIEW_LEN: usize = 64;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-ceb-file> [--entries] [--dump <INDEX>]", args[0]);
        std::process::exit(1);
    }

    let ceb_path = &args[1];
    let show_entries = args.iter().any(|arg| arg == "--entries");
    let mut dump_index: Option<usize> = None;
    // Parse --dump argument
    if let Some(dump_idx) = args.iter().position(|arg| arg == "--dump") {
        match args.get(dump_idx + 1).map(|s| s.parse::<usize>()) {
            Some(Ok(index)) => dump_index = Some(index),
            Some(Err(_)) => {
                eprintln!("ERROR: --dump expects a numeric index position.");
                std::process::exit(1);
            }
            None => {
                eprintln!("ERROR: --dump flag requires an argument.");
                std::process::exit(1);
            }
        }
    }

    println!("Reading CEB file: {}", ceb_path);
    println!("{}", "=".repeat(60));

    let mut reader = CebReader::open(ceb_path);
    if let Some(e) = reader.open_error() {
        eprintln!("\nERROR: Failed to read CEB file");
        eprintln!("  {}", e);
        std::process::exit(1);
    }

    if let Ok(header) = reader.header() {
        println!("\nFile Information:");
        println!("  Version: {} ({:?} layout)", header.version, header.layout);
        println!("  Index entries: {}", header.index_count);
        println!("  File size: {} bytes", reader.file_len());
    }

    println!("\nBook Information:");
    match reader.book_info() {
        Ok(info) => {
            println!("  Title: {}", info.title);
            println!("  Author: {}", info.author);
            println!("  Publisher: {}", info.publisher);
            if !info.isbn.is_empty() {
                println!("  ISBN: {}", info.isbn);
            }
            println!("  Published: {}", info.publish_date);
            println!("  Pages: {}", info.page_count);
            println!("  Characters: {}", info.char_count);
        }
        Err(e) => println!("  (unavailable: {})", e),
    }

    if show_entries {
        if let Ok(entries) = reader.entries() {
            println!("\nIndex Table:");
            for (i, entry) in entries.iter().enumerate() {
                println!(
                    "  {:>4}. {:<12} offset={:<10} length={:<10} plugin={}",
                    i, entry.record_type, entry.data_offset, entry.data_length, entry.plugin_id
                );
            }
        }
    }

    if let Some(index) = dump_index {
        println!("\nEntry {} payload:", index);
        let data = reader
            .entry(index)
            .and_then(|entry| reader.read_entry_data(entry));
        match data {
            Ok(bytes) => {
                for (row, chunk) in bytes.chunks(16).take(DUMP_PREVIEW_LEN / 16).enumerate() {
                    let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                    println!("  {:08x}  {}", row * 16, hex.join(" "));
                }
                if bytes.len() > DUMP_PREVIEW_LEN {
                    println!("  ... and {} more bytes", bytes.len() - DUMP_PREVIEW_LEN);
                }
            }
            Err(e) => println!("  (unavailable: {})", e),
        }
    }

    reader.close();
}
