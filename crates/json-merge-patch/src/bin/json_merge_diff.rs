//! `json-merge-diff` — compute the JSON Merge Patch between two documents.
//!
//! Usage:
//!   json-merge-diff '<modified-json>'
//!
//! The original document is read from stdin. The modified document is the
//! first argument. The patch printed on stdout, applied to the original,
//! reproduces the modified document.

use std::io::{self, Read, Write};

use json_merge_patch::cli::diff_merge_patch;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let modified = match args.get(1) {
        Some(m) => m.clone(),
        None => {
            eprintln!("First argument must be the modified JSON document.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match diff_merge_patch(buf.trim(), &modified) {
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
