use chrono::NaiveDate;
use episodes::segment_table;
use series_common::{FramePayload, IoArgs, Table};
use std::env;
use std::fs::{read_to_string, write};

fn print_usage() {
    eprintln!("Usage: segmenter --input <frame.json> [--output <episodes.json>]");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(io) = IoArgs::parse(&args) else {
        eprintln!("Input path is required");
        print_usage();
        return Ok(());
    };

    let input = read_to_string(&io.input)?;
    let frame: FramePayload<NaiveDate> = serde_json::from_str(&input)?;
    let table = Table::try_from(frame)?;
    let result = segment_table(&table);

    let out: Vec<serde_json::Value> = result
        .iter()
        .map(|(name, eps)| serde_json::json!({ "name": name, "episodes": eps }))
        .collect();
    let text = serde_json::to_string(&out)?;
    match &io.output {
        Some(path) => {
            write(path, text)?;
            println!("Written {} columns of episodes to {}", result.len(), path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
