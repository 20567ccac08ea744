use anyhow::Result;
use clap::Parser;
use tracing::info;

use edgelink::config::args::{Args, Command};
use edgelink::config::{StaticConfig, get_config, init_config_from};
use edgelink::errors::EdgelinkError;
use edgelink::runtime::run_server;
use edgelink::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if *args.command() == Command::GenerateConfig {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    // 配置错误直接退出，不带着默认值启动
    if let Err(e) = init_config_from(args.config.as_deref()) {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
    let config = get_config();

    // guard 必须活到进程结束，否则文件日志会丢失尾部
    let log_guard = init_logging(&config.logging)?;
    info!(
        "edgelink v{} starting ({} environment)",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    if let Err(e) = run_server().await {
        drop(log_guard);
        match e.downcast_ref::<EdgelinkError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{:#}", e),
        }
        std::process::exit(1);
    }
    Ok(())
}
