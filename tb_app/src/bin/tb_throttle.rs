use tb_app::cli;
use tb_app::config_loader;
use tb_app::workload;
use tb_ratelimit::SharedTokenBucket;
use tracing::error;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let _guard = tb_app::tracing_setup::init("tb_throttle", "./logs", tracing::Level::INFO, true)?;

    let config_path = cli::get_config_path("config/throttle.toml");
    let config = config_loader::load_throttle_config_or_default(&config_path);

    info!(
        "Bucket config: bucket_size={}, interval={}ms, tokens_per_interval={}, queue_size={}",
        config.bucket.bucket_size,
        config.bucket.interval_ms,
        config.bucket.tokens_per_interval,
        config.bucket.effective_queue_size()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        let limiter = SharedTokenBucket::new(config.bucket)?;
        let report = workload::run_workload(&limiter, &config.workload)
            .await
            .inspect_err(|err| error!("Workload aborted: {err}"))?;

        info!("Admitted {} of {} calls", report.admitted, config.workload.requests);
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}
