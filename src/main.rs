use clap::Parser;

use linkforge::cli::{Cli, Commands, ConfigCommands, config_generate};
use linkforge::config::{get_config, init_config_from};
use linkforge::runtime::modes::run_server;
use linkforge::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output, force },
    }) = &cli.command
    {
        if let Err(e) = config_generate(output.as_deref(), *force) {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
        return Ok(());
    }

    init_config_from(&cli.config);
    let config = get_config();

    // guard 必须存活到进程退出，否则缓冲中的日志会丢失
    let _log_guard = init_logging(&config.logging)?;

    run_server().await
}
