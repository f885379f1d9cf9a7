use chrono::NaiveDate;
use outlier_correction::{correct_table, CorrectorParams};
use serde_json::Value;
use series_common::{FramePayload, IoArgs, Table};
use std::env;
use std::fs::{read_to_string, write};

fn print_usage() {
    eprintln!("Usage: corrector --input <frame.json> [--output <corrected.json>]");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(io) = IoArgs::parse(&args) else {
        eprintln!("Input path is required");
        print_usage();
        return Ok(());
    };

    // { "params": {...}, "index": [...], "columns": [{"name": ..., "values": [...]}] }
    let input = read_to_string(&io.input)?;
    let mut v: Value = serde_json::from_str(&input)?;
    let params: CorrectorParams = match v.get_mut("params").map(Value::take) {
        Some(p) if !p.is_null() => serde_json::from_value(p)?,
        _ => CorrectorParams::default(),
    };
    let frame: FramePayload<NaiveDate> = serde_json::from_value(v)?;
    let table = Table::try_from(frame)?;

    let reports = correct_table(&table, &params)?;
    let out: Vec<Value> = reports
        .iter()
        .map(|(name, r)| {
            serde_json::json!({
                "name": name,
                "values": r.corrected.values(),
                "flagged": r.flagged,
                "fill": r.fill,
            })
        })
        .collect();
    let index = table.columns().first().map(|c| c.series.index());
    let text = serde_json::to_string(&serde_json::json!({ "index": index, "columns": out, "params": params }))?;
    match &io.output {
        Some(path) => {
            write(path, text)?;
            println!("Written {} corrected columns to {}", reports.len(), path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
