use anyhow::{Context, Result};
use labsite_config::LabsiteConfig;
use labsite_http::HttpClient;
use labsite_news::Generator;
use labsite_web::Enricher;
use std::time::Duration;

pub async fn enrich(cfg: &LabsiteConfig) -> Result<()> {
    let client = HttpClient::new()
        .context("failed to build HTTP client")?
        .with_timeout(Duration::from_secs(cfg.http.timeout_secs))
        .with_user_agent(cfg.http.user_agent.clone());
    let enricher = Enricher::new(client, cfg.co_author.clone());

    let path = &cfg.achievements_path;
    tracing::info!(path = %path.display(), "enrich.start");
    let summary = enricher
        .enrich_file(path)
        .await
        .with_context(|| format!("failed to enrich {}", path.display()))?;

    println!(
        "Processed {} links, changed {} fields, wrote file: {}",
        summary.processed,
        summary.changed,
        path.display()
    );
    Ok(())
}

pub fn generate(cfg: &LabsiteConfig) -> Result<()> {
    let generator = Generator::new(cfg.co_author.clone(), cfg.id_prefix.clone());
    let path = &cfg.achievements_path;
    tracing::info!(news_dir = %cfg.news_dir.display(), path = %path.display(), "generate.start");
    let summary = generator
        .generate_file(&cfg.news_dir, path)
        .with_context(|| format!("failed to generate {}", path.display()))?;

    println!("Wrote {} achievements to {}", summary.written, path.display());
    Ok(())
}
