use clap::Parser;
use minbar_etl::utils::{logger, validation::Validate};
use minbar_etl::{CliConfig, EastmoneyClient, EtlEngine, FileConfig, LocalStorage, PreparePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting minbar-prep");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 套用設定檔預設值
    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading defaults from: {}", path);
        match FileConfig::from_file(&path) {
            Ok(file) => config.apply_file_defaults(&file),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 建立存儲、行情來源與管道
    let storage = LocalStorage::new(".".to_string());
    let intraday = EastmoneyClient::new(config.endpoint.clone());
    let pipeline = PreparePipeline::new(storage, config, intraday);

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Inference CSV prepared successfully!");
            println!("✅ Inference CSV prepared successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Prepare failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
