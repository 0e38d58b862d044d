//! Integration tests for the multi-region trail check
//!
//! These run the real pipeline (collection, normalization, evaluation)
//! against scripted provider responses, and pin down the account-level
//! aggregation contract: one finding per scan, exact message templates,
//! deterministic representative selection.

mod common;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use cloudlens::checks::catalog::cloudtrail::{
    MultiRegionTrailLoggingManagementEvents, CHECK_ID,
};
use cloudlens::checks::{Check, CheckEngine, ScanInventory, Status};
use cloudlens::config::Config;
use cloudlens::inventory::{CollectionStatus, CANCELLED_DETAIL};
use cloudlens::provider::cloudtrail::{
    RawAdvancedSelector, RawClassicSelector, RawEventSelectors, RawFieldSelector, RawTrail,
};
use cloudlens::services;

use common::{MockCloudTrail, MockContext, ACCOUNT_ARN, ACCOUNT_ID};

const ACCOUNT_FAIL_MESSAGE: &str =
    "No trail found with multi-region enabled and logging management events.";

fn trail_arn(name: &str, region: &str) -> String {
    format!("arn:aws:cloudtrail:{region}:123456789012:trail/{name}")
}

fn raw_trail(name: &str, home_region: &str) -> RawTrail {
    RawTrail {
        name: Some(name.to_string()),
        arn: Some(trail_arn(name, home_region)),
        home_region: Some(home_region.to_string()),
        is_multi_region: Some(true),
    }
}

fn management_selectors() -> RawEventSelectors {
    RawEventSelectors {
        classic: vec![],
        advanced: vec![RawAdvancedSelector {
            name: Some("Management events".to_string()),
            field_selectors: vec![RawFieldSelector {
                field: "eventCategory".to_string(),
                equals_values: vec!["Management".to_string()],
            }],
        }],
    }
}

fn classic_selectors(include_management: bool) -> RawEventSelectors {
    RawEventSelectors {
        classic: vec![RawClassicSelector {
            read_write_type: Some("All".to_string()),
            include_management_events: Some(include_management),
        }],
        advanced: vec![],
    }
}

/// Script one region serving one fully-enriched trail
fn region_with_trail(name: &str, home_region: &str, selectors: RawEventSelectors) -> MockCloudTrail {
    let arn = trail_arn(name, home_region);
    MockCloudTrail::new()
        .page(vec![raw_trail(name, home_region)])
        .status(&arn, true)
        .selectors(&arn, selectors)
}

async fn evaluate(ctx: &MockContext) -> cloudlens::checks::results::FindingSet {
    let cancel = CancellationToken::new();
    let trails = services::cloudtrail::collect(ctx, &cancel).await;
    let inventory = ScanInventory::new(Some(trails), None);
    MultiRegionTrailLoggingManagementEvents
        .execute(&inventory, ctx)
        .unwrap()
}

#[tokio::test]
async fn no_trails_fails_at_account_level() {
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"]);

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.len(), 1);
    let finding = &findings.findings()[0];
    assert_eq!(finding.status, Status::Fail);
    assert_eq!(finding.resource_id, ACCOUNT_ID);
    assert_eq!(finding.resource_arn, ACCOUNT_ARN);
    assert_eq!(finding.region, "us-east-1");
    assert_eq!(finding.status_extended, ACCOUNT_FAIL_MESSAGE);
}

#[tokio::test]
async fn advanced_management_trail_passes_with_exact_message() {
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"]).with_cloudtrail(
        "eu-west-1",
        region_with_trail("main-trail", "eu-west-1", management_selectors()),
    );

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.len(), 1);
    let finding = &findings.findings()[0];
    assert_eq!(finding.status, Status::Pass);
    assert_eq!(finding.resource_id, "main-trail");
    assert_eq!(finding.resource_arn, trail_arn("main-trail", "eu-west-1"));
    // The finding sits in the primary region; the message names the home region.
    assert_eq!(finding.region, "us-east-1");
    assert_eq!(
        finding.status_extended,
        "Trail main-trail from home region eu-west-1 is multi-region, is logging and have management events enabled."
    );
}

#[tokio::test]
async fn misspelled_management_category_does_not_pass() {
    let selectors = RawEventSelectors {
        classic: vec![],
        advanced: vec![RawAdvancedSelector {
            name: None,
            field_selectors: vec![RawFieldSelector {
                field: "eventCategory".to_string(),
                equals_values: vec!["Managment".to_string()],
            }],
        }],
    };
    let ctx = MockContext::new(&["us-east-1"])
        .with_cloudtrail("us-east-1", region_with_trail("t", "us-east-1", selectors));

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings()[0].status, Status::Fail);
    assert_eq!(findings.findings()[0].status_extended, ACCOUNT_FAIL_MESSAGE);
}

#[tokio::test]
async fn classic_selector_flag_controls_the_verdict() {
    let passing = MockContext::new(&["us-east-1"]).with_cloudtrail(
        "us-east-1",
        region_with_trail("t", "us-east-1", classic_selectors(true)),
    );
    assert_eq!(evaluate(&passing).await.findings()[0].status, Status::Pass);

    let failing = MockContext::new(&["us-east-1"]).with_cloudtrail(
        "us-east-1",
        region_with_trail("t", "us-east-1", classic_selectors(false)),
    );
    assert_eq!(evaluate(&failing).await.findings()[0].status, Status::Fail);
}

#[tokio::test]
async fn trail_that_is_not_logging_does_not_pass() {
    let arn = trail_arn("t", "us-east-1");
    let mock = MockCloudTrail::new()
        .page(vec![raw_trail("t", "us-east-1")])
        .status(&arn, false)
        .selectors(&arn, management_selectors());
    let ctx = MockContext::new(&["us-east-1"]).with_cloudtrail("us-east-1", mock);

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.findings()[0].status, Status::Fail);
}

#[tokio::test]
async fn shadow_copies_collapse_to_one_finding() {
    // The same eu-west-1 trail is listed from both regions, as the provider
    // does for multi-region trails.
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"])
        .with_cloudtrail(
            "us-east-1",
            region_with_trail("main-trail", "eu-west-1", management_selectors()),
        )
        .with_cloudtrail(
            "eu-west-1",
            region_with_trail("main-trail", "eu-west-1", management_selectors()),
        );

    let cancel = CancellationToken::new();
    let trails = services::cloudtrail::collect(&ctx, &cancel).await;
    assert_eq!(trails.len(), 1);

    let inventory = ScanInventory::new(Some(trails), None);
    let findings = MultiRegionTrailLoggingManagementEvents
        .execute(&inventory, &ctx)
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings()[0].status, Status::Pass);
}

#[tokio::test]
async fn qualifying_trail_in_primary_region_wins_the_tie_break() {
    // "alpha" (eu-west-1) sorts before "zulu" (us-east-1) in inventory
    // order, but zulu is homed in the primary region and must represent the
    // account.
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"])
        .with_cloudtrail(
            "eu-west-1",
            region_with_trail("alpha", "eu-west-1", management_selectors()),
        )
        .with_cloudtrail(
            "us-east-1",
            region_with_trail("zulu", "us-east-1", management_selectors()),
        );

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings()[0].resource_id, "zulu");
}

#[tokio::test]
async fn first_qualifying_trail_in_order_wins_without_a_primary_candidate() {
    // No qualifying trail is homed in us-east-1; (ap-south-1, alpha) sorts
    // before (eu-west-1, beta), so alpha stands for the account.
    let ctx = MockContext::new(&["us-east-1", "ap-south-1", "eu-west-1"])
        .with_cloudtrail(
            "eu-west-1",
            region_with_trail("beta", "eu-west-1", management_selectors()),
        )
        .with_cloudtrail(
            "ap-south-1",
            region_with_trail("alpha", "ap-south-1", management_selectors()),
        );

    let findings = evaluate(&ctx).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings.findings()[0].resource_id, "alpha");
}

#[tokio::test]
async fn evaluation_is_idempotent_over_one_snapshot() {
    let ctx = MockContext::new(&["us-east-1"]).with_cloudtrail(
        "us-east-1",
        region_with_trail("main-trail", "us-east-1", management_selectors()),
    );

    let cancel = CancellationToken::new();
    let trails = services::cloudtrail::collect(&ctx, &cancel).await;
    let inventory = ScanInventory::new(Some(trails), None);

    let first = MultiRegionTrailLoggingManagementEvents
        .execute(&inventory, &ctx)
        .unwrap();
    let second = MultiRegionTrailLoggingManagementEvents
        .execute(&inventory, &ctx)
        .unwrap();

    assert_eq!(
        serde_json::to_value(first.findings()).unwrap(),
        serde_json::to_value(second.findings()).unwrap()
    );
}

#[tokio::test]
async fn unreachable_region_is_reported_and_isolated() {
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"])
        .with_cloudtrail(
            "us-east-1",
            region_with_trail("main-trail", "us-east-1", management_selectors()),
        )
        .deny_region("eu-west-1");

    let engine = CheckEngine::new(Config::default());
    let cancel = CancellationToken::new();
    let results = engine.run(&ctx, &cancel).await.unwrap();

    // The healthy region still evaluated and passed.
    let report = results
        .reports()
        .iter()
        .find(|r| r.check_id == CHECK_ID)
        .expect("trail check should have run");
    assert_eq!(report.findings.count_by_status(Status::Pass), 1);

    // The dead region shows up as a skipped notice, not a scan abort.
    let notice = results
        .region_notices()
        .iter()
        .find(|n| n.service == "cloudtrail" && n.region == "eu-west-1")
        .expect("skipped region should be noticed");
    assert_eq!(notice.status, CollectionStatus::Skipped);
    assert!(!results.is_complete());
}

#[tokio::test]
async fn every_region_unreachable_aborts_the_scan() {
    let ctx = MockContext::new(&["us-east-1", "eu-west-1"])
        .deny_region("us-east-1")
        .deny_region("eu-west-1");

    let engine = CheckEngine::new(Config::default());
    let cancel = CancellationToken::new();
    let err = engine.run(&ctx, &cancel).await.unwrap_err();

    assert!(err.to_string().contains("no reachable regions"));
    assert!(err.to_string().contains('2'));
}

#[tokio::test]
async fn cancellation_mid_collection_yields_a_partial_scan() {
    let cancel = CancellationToken::new();
    let arn = trail_arn("main-trail", "us-east-1");
    // The token fires while the first page is served, so pagination stops
    // before the second page and enrichment never starts.
    let mock = MockCloudTrail::new()
        .page(vec![raw_trail("main-trail", "us-east-1")])
        .page(vec![raw_trail("other", "us-east-1")])
        .status(&arn, true)
        .selectors(&arn, management_selectors())
        .cancel_during_page(0, cancel.clone());
    let ctx = MockContext::new(&["us-east-1"]).with_cloudtrail("us-east-1", mock);

    let engine = CheckEngine::new(Config::default());
    let results = engine.run(&ctx, &cancel).await.unwrap();

    let notice = results
        .region_notices()
        .iter()
        .find(|n| n.service == "cloudtrail" && n.region == "us-east-1")
        .expect("cancelled region should be noticed");
    assert_eq!(notice.status, CollectionStatus::Partial);
    assert_eq!(notice.detail.as_deref(), Some(CANCELLED_DETAIL));
    assert!(!results.is_complete());
}
