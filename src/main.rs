use clap::Parser;
use room_assign::utils::{logger, validation::Validate};
use room_assign::CliConfig;
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.validate().and_then(|_| config.settings()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let engine = settings.engine();
    let result = engine.run(
        Path::new(&config.students),
        Path::new(&config.rooms),
        Path::new(&config.output_file),
    );

    match result {
        Ok(report) => {
            println!(
                "✅ {} rooms, {} of {} students assigned",
                report.rooms, report.assigned, report.students_read
            );
            println!("📁 Output saved to: {}", report.output_path.display());
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Room assignment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
