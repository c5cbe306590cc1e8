//! Bounded-concurrency scraping of player contract pages.
//!
//! All targets are queued at once and at most `workers` pages are in flight.
//! Results are handed to the caller one at a time, in completion order, on
//! the calling task, so the caller can append each one to its output
//! without locking. A page that fails is logged and reported with empty
//! values; it never aborts the batch.

use futures::{StreamExt as _, stream};
use hoops_models::{ContractDetail, PlayerKey};
use hoops_scraper::PageFetcher;

use crate::SourceError;
use crate::progress::ProgressCallback;
use crate::spotrac::{ContractTerms, SpotracSite};

/// A player whose contract page should be scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTarget {
    /// Display name.
    pub name: String,
    /// Contract page URL.
    pub url: String,
    /// Normalized key.
    pub key: PlayerKey,
}

/// Outcome counts for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Pages fetched and parsed.
    pub scraped: usize,
    /// Pages that failed and were recorded with empty values.
    pub failed: usize,
}

/// Scrapes every target's contract page through a pool of `workers`.
///
/// `on_result` is called once per target as soon as its page completes.
///
/// # Errors
///
/// Only errors returned by `on_result` stop the batch; per-page failures
/// are absorbed.
pub async fn scrape_contract_details<F, E>(
    fetcher: &impl PageFetcher,
    site: &SpotracSite,
    targets: Vec<DetailTarget>,
    workers: usize,
    progress: &dyn ProgressCallback,
    mut on_result: F,
) -> Result<BatchSummary, E>
where
    F: FnMut(ContractDetail) -> Result<(), E>,
{
    progress.set_total(targets.len() as u64);
    log::info!(
        "Scraping {} contract page(s) with {} worker(s)",
        targets.len(),
        workers.max(1)
    );

    let mut pages = stream::iter(targets)
        .map(|target| async move {
            let outcome = site.fetch_contract_detail(fetcher, &target.url).await;
            (target, outcome)
        })
        .buffer_unordered(workers.max(1));

    let mut summary = BatchSummary::default();
    while let Some((target, outcome)) = pages.next().await {
        let terms = match outcome {
            Ok(terms) => {
                summary.scraped += 1;
                terms
            }
            Err(e) => {
                log::warn!("{}", SourceError::entity(&target.name, &e));
                summary.failed += 1;
                ContractTerms::default()
            }
        };

        progress.set_message(target.name.clone());
        on_result(ContractDetail {
            name: target.name,
            url: target.url,
            key: target.key,
            signed_using: terms.signed_using,
            drafted: terms.drafted,
        })?;
        progress.inc(1);
    }

    progress.finish(format!(
        "{} scraped, {} failed",
        summary.scraped, summary.failed
    ));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::progress::NullProgress;
    use crate::registry::SiteRegistry;
    use crate::test_support::StubFetcher;

    fn page(signed: &str) -> String {
        format!(
            r#"<div id="contracts"><div><div><div class="contract-wrapper mb-5">
                 <div class="contract-details row m-0">
                   <div></div><div></div><div></div><div></div>
                   <div><div class="label">Signed Using</div><div>{signed}</div></div>
                 </div></div></div></div></div>"#
        )
    }

    fn target(i: usize) -> DetailTarget {
        DetailTarget {
            name: format!("Player {i}"),
            url: format!("https://www.spotrac.com/nba/player/_/id/{i}"),
            key: PlayerKey::from_normalized(format!("player-{i}")),
        }
    }

    #[tokio::test]
    async fn failing_page_is_recorded_empty() {
        let site = SiteRegistry::load().unwrap().spotrac;
        let targets: Vec<DetailTarget> = (0..6).map(target).collect();
        let fetcher = StubFetcher::new(
            targets
                .iter()
                .filter(|t| t.name != "Player 3")
                .map(|t| (t.url.clone(), page("cap space"))),
        );

        let mut results = Vec::new();
        let summary = scrape_contract_details(&fetcher, &site, targets, 3, &NullProgress, |d| {
            results.push(d);
            Ok::<_, Infallible>(())
        })
        .await
        .unwrap();

        assert_eq!(summary, BatchSummary { scraped: 5, failed: 1 });
        assert_eq!(results.len(), 6);
        results.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(results[3].signed_using, None);
        assert_eq!(results[3].drafted, None);
        assert!(
            results
                .iter()
                .filter(|d| d.name != "Player 3")
                .all(|d| d.signed_using.as_deref() == Some("cap space"))
        );
    }

    #[tokio::test]
    async fn callback_error_stops_the_batch() {
        let site = SiteRegistry::load().unwrap().spotrac;
        let fetcher = StubFetcher::new([]);
        let mut calls = 0;
        let result = scrape_contract_details(
            &fetcher,
            &site,
            (0..4).map(target).collect(),
            1,
            &NullProgress,
            |_| {
                calls += 1;
                Err("disk full")
            },
        )
        .await;

        assert_eq!(result, Err("disk full"));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn empty_batch_does_nothing() {
        let site = SiteRegistry::load().unwrap().spotrac;
        let fetcher = StubFetcher::new([]);
        let summary = scrape_contract_details(&fetcher, &site, Vec::new(), 5, &NullProgress, |_| {
            Ok::<_, Infallible>(())
        })
        .await
        .unwrap();
        assert_eq!(summary, BatchSummary::default());
    }
}
