use place_dump::utils::{logger, validation::Validate};
use place_dump::{CliConfig, EtlEngine, LocalStorage, PlacePipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日誌
    logger::init_cli_logger();

    // 讀取參數與環境變數, 並驗證配置
    let config = match CliConfig::from_env().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            println!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 創建存儲和管道
    let place_ids = config.place_ids.clone();
    let storage = LocalStorage::new(".".to_string());
    let pipeline = PlacePipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run(&place_ids).await {
        Ok(output_path) => {
            println!("✅ Saved {} place(s) to {}", place_ids.len(), output_path);
        }
        Err(e) => {
            // 任何錯誤都中止整個流程
            tracing::error!("❌ Place dump failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }

    Ok(())
}
