//! `clonify clone <URL>`: one fetch, printed to stdout.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use clonify_config::ClonifyConfig;
use clonify_web::{
    ClonedSite, Cloner, ProxySource, download::save_download, preview::render_preview,
};
use std::{path::PathBuf, sync::Arc, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Html,
    Css,
    Js,
    Resources,
    Preview,
    All,
}

#[derive(Debug)]
pub struct CloneArgs {
    pub url: String,
    pub section: Section,
    pub json: bool,
    pub save: bool,
    pub out: Option<PathBuf>,
}

pub fn cloner_from_config(cfg: &ClonifyConfig) -> Result<Cloner> {
    let source = ProxySource::new(&cfg.proxy.endpoint, cfg.proxy.content_field.clone())?
        .with_timeout(Duration::from_secs(cfg.proxy.timeout_secs))
        .with_retries(cfg.proxy.retries);
    Ok(Cloner::new(Arc::new(source)))
}

pub async fn run(cfg: &ClonifyConfig, args: CloneArgs) -> Result<()> {
    let cloner = cloner_from_config(cfg)?;
    let site = cloner.clone_site(&args.url).await.map_err(|e| {
        tracing::warn!(error = %e, "clone.failed");
        anyhow!(e.user_message())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&site)?);
    } else {
        print!("{}", render_sections(&site, args.section));
    }

    if args.save {
        let dir = args.out.unwrap_or_else(|| cfg.download.dir.clone());
        let path = save_download(&dir, &site)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        eprintln!("Downloaded as {}", path.display());
    }
    Ok(())
}

const ALL_SECTIONS: [(&str, Section); 5] = [
    ("HTML", Section::Html),
    ("CSS", Section::Css),
    ("JavaScript", Section::Js),
    ("Resources", Section::Resources),
    ("Preview", Section::Preview),
];

fn section_text(site: &ClonedSite, section: Section) -> String {
    match section {
        Section::Html => site.result.html.clone(),
        Section::Css => site.result.css.clone(),
        Section::Js => site.result.js.clone(),
        Section::Resources => site.result.resources.clone(),
        Section::Preview => render_preview(&site.result.html).render(),
        Section::All => ALL_SECTIONS
            .iter()
            .map(|(title, s)| {
                format!("===== {title} =====\n{}\n\n", section_text(site, *s).trim_end())
            })
            .collect(),
    }
}

/// Text for one section, or every section under a heading when `All`.
pub fn render_sections(site: &ClonedSite, section: Section) -> String {
    let mut text = section_text(site, section);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
