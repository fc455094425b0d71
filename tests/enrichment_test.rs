mod common;

use common::*;
use founder_scraper::{
    BatchScheduler, CompanyRecord, CompanySummary, Config, DetailEnricher, EnrichmentStatus,
    Founder, ScheduleMode, Selectors,
};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn record_for(slug: &str) -> CompanyRecord {
    CompanyRecord::new(CompanySummary {
        name: slug.to_string(),
        batch: "S23".to_string(),
        description: String::new(),
        url: detail_url(slug),
    })
}

fn single_page(slug: &str, blocks: Vec<FakeNode>) -> FakeBrowser {
    let mut routes = HashMap::new();
    routes.insert(
        detail_url(slug),
        FakeRoute::Detail {
            blocks,
            load_time: Duration::from_millis(300),
        },
    );
    FakeBrowser::new(routes)
}

#[tokio::test(start_paused = true)]
async fn founders_are_paired_per_block() {
    let browser = single_page(
        "pairs",
        vec![
            founder_block(Some("Ada Lovelace"), Some("https://www.linkedin.com/in/ada")),
            founder_block(Some("Bob"), None),
            founder_block(None, Some("https://www.linkedin.com/in/cy")),
            founder_block(None, None),
        ],
    );
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("pairs");

    enricher.enrich(&browser, &mut record, 0).await;

    assert_eq!(
        record.founders,
        vec![
            Founder::new(Some("Ada Lovelace".into()), Some("https://www.linkedin.com/in/ada".into())),
            Founder::new(Some("Bob".into()), None),
            Founder::new(None, Some("https://www.linkedin.com/in/cy".into())),
        ]
    );
    assert_eq!(record.status, EnrichmentStatus::Succeeded { founders: 3 });
    assert_eq!(record.joined_founder_names(), "Ada Lovelace, Bob");
    assert_eq!(
        record.joined_founder_links(),
        "https://www.linkedin.com/in/ada, https://www.linkedin.com/in/cy"
    );
}

#[tokio::test(start_paused = true)]
async fn links_not_matching_the_pattern_are_dropped() {
    let browser = single_page(
        "filter",
        vec![founder_block(Some("Dee"), Some("https://www.linkedin.com/company/acme"))],
    );
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("filter");

    enricher.enrich(&browser, &mut record, 0).await;

    assert_eq!(record.founders, vec![Founder::new(Some("Dee".into()), None)]);
}

#[tokio::test(start_paused = true)]
async fn later_anchor_is_used_when_the_first_does_not_match() {
    let s = Selectors::default();
    let block = FakeNode::default()
        .child(&s.founder_name, FakeNode::text("Fay"))
        .child(
            &s.founder_link,
            FakeNode::default().attr("href", "https://www.linkedin.com/invite/fay"),
        )
        .child(
            &s.founder_link,
            FakeNode::default().attr("href", "https://www.linkedin.com/in/fay"),
        );
    let browser = single_page("anchors", vec![block]);
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("anchors");

    enricher.enrich(&browser, &mut record, 0).await;

    assert_eq!(
        record.founders,
        vec![Founder::new(Some("Fay".into()), Some("https://www.linkedin.com/in/fay".into()))]
    );
}

#[tokio::test(start_paused = true)]
async fn names_are_trimmed_and_blank_names_skipped() {
    let browser = single_page(
        "trim",
        vec![founder_block(Some("  Eve  "), None), founder_block(Some("   "), None)],
    );
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("trim");

    enricher.enrich(&browser, &mut record, 0).await;

    assert_eq!(record.founder_names(), vec!["Eve"]);
    assert_eq!(record.founders.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn page_without_founder_blocks_succeeds_empty() {
    let browser = single_page("nobody", vec![]);
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("nobody");

    enricher.enrich(&browser, &mut record, 0).await;

    assert_eq!(record.status, EnrichmentStatus::Succeeded { founders: 0 });
    assert_eq!(record.joined_founder_names(), "");
    assert_eq!(browser.stats().closed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_page_marks_record_failed_without_panicking() {
    let browser = FakeBrowser::new(HashMap::new());
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut record = record_for("ghost");

    enricher.enrich(&browser, &mut record, 4).await;

    assert!(matches!(record.status, EnrichmentStatus::Failed { .. }));
    assert!(record.founders.is_empty());
    assert_eq!(browser.stats().open_now.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn scheduler_leaves_no_record_pending() {
    let list: Vec<FakeCompany> = (0..7).map(company).collect();
    let browser = directory(&list);
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut records: Vec<CompanyRecord> = list.iter().map(|c| record_for(&c.slug)).collect();
    records[2].summary.url.clear();

    for mode in [ScheduleMode::Windowed, ScheduleMode::Pool] {
        let scheduler = BatchScheduler::new(mode, 3);
        let report = scheduler.run(&enricher, &browser, &mut records).await;

        assert_eq!(report.total, 7);
        assert_eq!(report.unfinished, 0);
        assert_eq!(report.succeeded, 6);
        assert_eq!(report.failed, 1);
        assert!(browser.stats().max_open.load(Ordering::SeqCst) <= 3);
    }
}

#[tokio::test(start_paused = true)]
async fn zero_limit_is_clamped_to_one() {
    let list: Vec<FakeCompany> = (0..3).map(company).collect();
    let browser = directory(&list);
    let enricher = DetailEnricher::new(&Config::default()).unwrap();
    let mut records: Vec<CompanyRecord> = list.iter().map(|c| record_for(&c.slug)).collect();

    let report = BatchScheduler::new(ScheduleMode::Windowed, 0)
        .run(&enricher, &browser, &mut records)
        .await;

    assert_eq!(report.windows, 3);
    assert_eq!(browser.stats().max_open.load(Ordering::SeqCst), 1);
}
