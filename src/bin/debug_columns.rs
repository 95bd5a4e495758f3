//! Prints which source columns each regional extract carries, to diagnose
//! schema drift between regions before running the pipeline.

use anyhow::Result;
use housing_pipeline::config;
use housing_pipeline::models::columns::*;
use housing_pipeline::processor::frame_ops::{column_names, text_values};
use housing_pipeline::storage::SourceReader;
use std::env;

const TRACKED_COLUMNS: [&str; 13] = [
    STREET_ADDRESS,
    ADDRESS_LOCALITY,
    ADDRESS_REGION,
    PRICE,
    SQUARE_FOOTAGE,
    PROPERTY_SQFT,
    ACREAGE,
    PROPERTY_BATHS,
    BATH,
    PROPERTY_BEDS,
    VIEW,
    LATITUDE,
    LONGITUDE,
];

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let config = config::load_or_default(config::config_path_from_args(&args))?;

    println!("=== SOURCE COLUMN SURVEY ===\n");

    for (region, path) in config.sources.region_paths() {
        let extract = match SourceReader::read_region(region, &path) {
            Ok(extract) => extract,
            Err(e) => {
                println!("❌ {}: {}", region, e);
                continue;
            }
        };

        let names = column_names(&extract.frame);
        println!("Region {} ({} rows, {} columns)", region, extract.height(), names.len());

        for tracked in TRACKED_COLUMNS {
            if names.iter().any(|name| name == tracked) {
                let nulls = text_values(&extract.frame, tracked)?
                    .iter()
                    .filter(|value| value.is_none())
                    .count();
                println!("   ✅ {:<18} {} nulls", tracked, nulls);
            } else {
                println!("   ⚠️  {:<18} absent", tracked);
            }
        }

        let extra: Vec<&String> = names
            .iter()
            .filter(|name| !TRACKED_COLUMNS.contains(&name.as_str()))
            .collect();
        if !extra.is_empty() {
            println!("   ➕ pass-through: {:?}", extra);
        }
        println!();
    }

    Ok(())
}
