use clap::Parser;
use orion_deployer::core::orchestrator::plan_deployment;
use orion_deployer::domain::ports::Storage;
use orion_deployer::utils::{logger, validation::Validate};
use orion_deployer::{
    AlloyChainClient, CliConfig, DeploymentOrchestrator, HardhatArtifacts, LocalStorage, Result,
};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting orion-deploy");
    if cli.verbose {
        tracing::debug!(
            "CLI config: config={:?} rpc_url={:?} artifacts={:?} dry_run={}",
            cli.config,
            cli.rpc_url,
            cli.artifacts,
            cli.dry_run
        );
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Deployment failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let artifacts = HardhatArtifacts::new(&config.artifacts.path);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No transactions will be sent");
        for step in plan_deployment(&artifacts, &config)? {
            tracing::info!("{}", step);
            println!("{}", step);
        }
        return Ok(());
    }

    let client = AlloyChainClient::new(&config.network.rpc_url, config.private_key()?)?
        .with_confirmations(config.network.confirmations)
        .with_receipt_timeout(Duration::from_secs(config.network.receipt_timeout_seconds));

    let report_dir = config.output.report_dir.clone();
    let orchestrator = DeploymentOrchestrator::new(client, artifacts, config);
    let report = orchestrator.run().await?;

    tracing::info!("✅ Deployment completed successfully!");
    println!("✅ Deployment completed on chain {}", report.chain_id);
    println!("OrionsManager (proxy):    {}", report.orions_manager.proxy);
    println!("OrionProtocol:            {}", report.orion_protocol);
    println!("WalletObserver (proxy):   {}", report.wallet_observer.proxy);
    println!("LiquidityPoolManager:     {}", report.liquidity_pool_manager);

    if let Some(dir) = report_dir {
        let storage = LocalStorage::new(dir);
        let body = serde_json::to_vec_pretty(&report)?;
        let path = storage
            .write_file(&format!("deployment-{}.json", report.chain_id), &body)
            .await?;
        tracing::info!("📁 Report saved to: {}", path);
        println!("📁 Report saved to: {}", path);
    }

    Ok(())
}
