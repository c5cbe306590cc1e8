//! Records when Basketball-Reference last refreshed its data.

use hoops_scraper::PageFetcher;
use hoops_source::bbref::BbrefSite;

use crate::{IngestConfig, IngestError, now_timestamp};

/// Columns of the update log.
pub const HEADERS: [&str; 2] = ["Site Last Updated", "Checked At"];

/// Fetches the site's update notice and appends it, with the time of the
/// check, to the update log. Returns the notice.
///
/// # Errors
///
/// Returns [`IngestError`] if the notice cannot be read or the log cannot
/// be written.
pub async fn run(
    fetcher: &impl PageFetcher,
    site: &BbrefSite,
    config: &IngestConfig,
) -> Result<String, IngestError> {
    let updated = site.fetch_site_updated(fetcher).await?;
    log::info!("{} last updated: {updated}", site.site.name);

    hoops_store::append_rows(
        &config.data_dir.update_log_csv(),
        &HEADERS,
        &[vec![updated.clone(), now_timestamp()]],
    )?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use hoops_source::SiteRegistry;
    use hoops_source::test_support::StubFetcher;
    use hoops_store::DataDir;

    use super::*;

    #[tokio::test]
    async fn appends_each_check() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig::default().with_data_dir(DataDir::new(dir.path()));
        let site = SiteRegistry::load().unwrap().bbref;
        let home = r#"<div id="social">
            <p>Follow</p><p>Site Last Updated: Monday, 4:05AM</p>
        </div>"#;
        let fetcher = StubFetcher::new([(site.site.expand(&site.status.url), home.to_owned())]);

        assert_eq!(run(&fetcher, &site, &config).await.unwrap(), "Monday, 4:05AM");
        run(&fetcher, &site, &config).await.unwrap();

        let log = hoops_store::read_table(&config.data_dir.update_log_csv()).unwrap();
        assert_eq!(log.headers(), HEADERS);
        assert_eq!(log.len(), 2);
        assert_eq!(log.value(1, "Site Last Updated"), Some("Monday, 4:05AM"));
    }
}
