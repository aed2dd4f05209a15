use std::env;
use std::fs;
use std::process;

use fretwork::{FretConfig, Fretter, NoteTimeline};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: fretwork <config.yaml> <notes.yaml> [output.yaml]");
        process::exit(1);
    }

    let config_path = &args[1];
    let notes_path = &args[2];
    let output_path: Option<&String> = args.get(3);

    let config = match FretConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config '{}': {}", config_path, e);
            process::exit(1);
        }
    };
    for rejected in config.rejected() {
        eprintln!("Warning: {}", rejected);
    }

    // Read notes
    let source = match fs::read_to_string(notes_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", notes_path, e);
            process::exit(1);
        }
    };
    let timeline = match NoteTimeline::from_yaml(&source) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Error in notes '{}': {}", notes_path, e);
            process::exit(1);
        }
    };

    let resolution = config.build_resolver().resolve_all(&timeline);

    let yaml = match serde_yaml::to_string(&resolution) {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error serializing resolution: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &yaml) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!(
                "Wrote {} of {} positions to {}",
                resolution.fretted_count(),
                timeline.len(),
                path
            );
        }
        None => {
            println!("{}", yaml);
        }
    }
}
