//! CLI tool for protogrid - maps protocol envelopes and prints JSON
//!
//! Usage:
//!   protogrid_cli <envelope.json>                      # Mapped protocol to stdout
//!   protogrid_cli <envelope.json> --layout             # Layout of installation 0
//!   protogrid_cli <envelope.json> --layout --installation 2 --config cfg.json
//!   protogrid_cli <envelope.json> -o out.json          # Output to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use protogrid::layout::LayoutConfig;
use protogrid::mapper::ProtocolMapper;
use protogrid::{Envelope, ProtocolSession};

const USAGE: &str = "Usage: protogrid_cli <envelope.json> [--layout] [--installation N] [--config cfg.json] [-o output.json]";

struct Args {
    input_path: String,
    output_path: Option<String>,
    config_path: Option<String>,
    layout: bool,
    installation: usize,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }

    let mut parsed = Args {
        input_path: args[1].clone(),
        output_path: None,
        config_path: None,
        layout: false,
        installation: 0,
    };

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--layout" => parsed.layout = true,
            "-o" => parsed.output_path = rest.next().cloned(),
            "--config" => parsed.config_path = rest.next().cloned(),
            "--installation" => {
                let value = rest.next().map(String::as_str).unwrap_or_default();
                parsed.installation = match value.parse() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("Invalid installation index: {value:?}");
                        std::process::exit(1);
                    }
                };
            }
            other => {
                eprintln!("Unknown argument: {other}\n{USAGE}");
                std::process::exit(1);
            }
        }
    }
    parsed
}

/// Decode, map and serialize according to `args`.
fn run(args: &Args) -> protogrid::Result<String> {
    let json = fs::read_to_string(&args.input_path)?;
    let envelope = Envelope::from_json(&json)?;

    let config = match &args.config_path {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };

    let mapper = ProtocolMapper::default();
    let construct = mapper.to_construct(&envelope);
    eprintln!(
        "Installations: {} of {} mapped",
        construct.installations.len(),
        envelope.protocol.installations.len()
    );

    let output = if args.layout {
        let session = ProtocolSession::new(construct, mapper, config);
        serde_json::to_string_pretty(&session.page(args.installation)?)?
    } else {
        serde_json::to_string_pretty(&construct)?
    };

    if let Some(path) = &args.output_path {
        fs::write(path, &output)?;
        eprintln!("Written: {}", path);
    }
    Ok(output)
}

fn main() {
    let args = parse_args();

    let json = match run(&args) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error ({}): {}", args.input_path, e);
            std::process::exit(1);
        }
    };

    if args.output_path.is_none() {
        io::stdout().write_all(json.as_bytes()).unwrap();
        println!();
    }
}
