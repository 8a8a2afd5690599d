// The binary uses the library, not duplicate modules
use quest_discovery::{QuestDiscoveryApp, Settings, setup_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    setup_logging();
    let settings = Settings::from_cli();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!("Failed to start the async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        let mut app = QuestDiscoveryApp::new(settings).await?;
        app.run().await?;
        app.render()
    });

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
