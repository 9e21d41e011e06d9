//! `json-merge-patch` — apply a JSON Merge Patch (RFC 7386) to a document.
//!
//! Usage:
//!   json-merge-patch '<patch-json>'
//!
//! The document is read from stdin. The merge patch is the first argument.

use std::io::{self, Read, Write};

use json_merge_patch::cli::apply_merge_patch;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let patch = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be a JSON merge patch.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_merge_patch(buf.trim(), &patch) {
        Ok(result) => {
            io::stdout().write_all(result.as_bytes()).unwrap();
            io::stdout().write_all(b"\n").unwrap();
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
