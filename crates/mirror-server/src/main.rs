use anyhow::Result;
use mirror_server::app;
use mirror_server::cli::{CliArgs, Command, USAGE};
use mirror_server::config::MirrorConfig;
use mirror_server::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = MirrorConfig::load(args.config_path.as_deref())?;
    init_logging(config.log_file.as_deref())?;

    match args.command {
        Command::Serve => app::serve(&config).await,
        Command::Sync {
            entity,
            clear_existing,
        } => {
            let (succeeded, body) = app::sync_once(&config, &entity, clear_existing).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Entities => {
            for name in app::entity_names(&config)? {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Help => Ok(()),
    }
}
