use anyhow::{Context, Result};
use reqwest::Client;
use sharedash::{
    config::Config,
    dashboard::{Dashboard, Viewport},
    fetch::{self, Source},
    render,
};
use std::fs::{self, File};
use std::io::BufWriter;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sharedash=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!(?config, "startup");

    // ─── 2) fetch the csv once ───────────────────────────────────────
    let client = Client::new();
    let source = Source::parse(&config.source);
    let mut dashboard = Dashboard::new(Viewport::new(config.width));
    match fetch::load_source(&client, &source).await {
        Ok(text) => {
            if let Err(e) = dashboard.load(&text) {
                error!("parsing {} failed: {}", source, e);
            }
        }
        // degrade to the empty dashboard rather than exiting
        Err(e) => error!("fetching {} failed: {:#}", source, e),
    }

    // ─── 3) apply selections ─────────────────────────────────────────
    if let Some(year) = &config.year {
        if !dashboard.years().contains(year) {
            warn!(year = %year, "year not in dataset");
        }
        dashboard.select_year(year);
    }
    match dashboard.averages() {
        Ok(averages) => {
            for avg in &averages {
                info!("{}: {:.2}", avg.platform, avg.mean_share_percent);
            }
        }
        Err(e) => info!("nothing to render: {}", e),
    }
    if let Some(platform) = &config.platform {
        dashboard.select_platform(platform);
    }

    // ─── 4) render ───────────────────────────────────────────────────
    let view = dashboard.view();
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;

    if let Some(treemap) = &view.treemap {
        let path = config.out_dir.join("treemap.svg");
        fs::write(&path, render::treemap_svg(treemap))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), leaves = treemap.cells.len(), "wrote treemap");
    }
    if let Some(chart) = &view.line_chart {
        let path = config.out_dir.join("line_chart.svg");
        fs::write(&path, render::line_chart_svg(chart))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), points = chart.points.len(), "wrote line chart");
    }

    let path = config.out_dir.join("dashboard.json");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &view)
        .with_context(|| format!("writing {}", path.display()))?;

    info!("all done");
    Ok(())
}
