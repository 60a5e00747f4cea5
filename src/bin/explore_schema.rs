use std::fs::File;
use std::path::Path;

use clap::Parser;
use minbar_etl::config::DEFAULT_DATA_DIR;
use minbar_etl::utils::logger;
use polars::prelude::*;

#[derive(Parser)]
#[command(name = "explore-schema")]
#[command(about = "Inspect the schema of locally stored minute-bar parquet files")]
struct Args {
    /// Directory containing <symbol>.parquet files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let entries = match std::fs::read_dir(&args.data_dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("❌ Error listing '{}': {}", args.data_dir, e);
            std::process::exit(1);
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    // 依字典序取第一個檔案，結果可重現
    files.sort();

    println!("Found {} files.", files.len());

    let Some(first_file) = files.iter().find(|f| f.ends_with(".parquet")) else {
        println!("No parquet files found.");
        return;
    };

    println!("Reading first file: {first_file}");
    let file_path = Path::new(&args.data_dir).join(first_file);

    let file = match File::open(&file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("❌ Error opening '{}': {}", file_path.display(), e);
            std::process::exit(1);
        }
    };

    let df = match ParquetReader::new(file).finish() {
        Ok(df) => df,
        Err(e) => {
            eprintln!("❌ Error reading parquet: {}", e);
            std::process::exit(1);
        }
    };

    println!("Columns: {:?}", df.get_column_names());
    println!("Rows: {}", df.height());
    // 印出最後幾列以確認最新日期
    println!("{}", df.tail(Some(5)));
}
