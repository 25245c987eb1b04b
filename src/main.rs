use clap::Parser;
use color_eyre::Result;
use sigsci_sounds::{
    init_errors,
    init_logging,
    print_banner,
    print_done,
    print_farewell,
    print_playing,
    print_run_hint,
    print_test_header,
};
use sigsci_sounds_config::{
    get_config_file,
    Args,
    Config,
    Mode,
};
use sigsci_sounds_orchestrator::Orchestrator;
use tokio_util::sync::CancellationToken;
use tracing::{
    info,
    warn,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    init_logging()?;

    let args = Args::parse();
    let config = Config::load()?;
    let orchestrator = Orchestrator::new(config);

    print_banner();
    match args.mode {
        Mode::Test => {
            print_test_header(&get_config_file());
            orchestrator.self_test(print_playing).await?;
            print_done();
            Ok(())
        }
        Mode::Run => {
            print_run_hint();

            let cancel = CancellationToken::new();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    match tokio::signal::ctrl_c().await {
                        Ok(()) => {
                            info!("interrupted, finishing current alerts");
                            cancel.cancel();
                        }
                        Err(err) => warn!("unable to listen for Ctrl+C: {err}"),
                    }
                }
            });

            orchestrator.run(cancel).await?;
            print_farewell();
            Ok(())
        }
    }
}
