//! Rollback and concurrency guarantees of multi-row transitions.

mod common;

use uuid::Uuid;

use agentmart_core::error::ErrorKind;
use agentmart_database::store::ListingStore;
use agentmart_entity::listing::ListingStatus;
use agentmart_service::ReviewError;

use common::{approved_listing, content, latest_in_lineage, reload, setup, update_under_review};

#[tokio::test]
async fn test_failed_promotion_rolls_back_parent_archival() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let (parent, child) = update_under_review(&wf, owner, "Ticket Summarizer").await;

    // Write 1 archives the parent, write 2 promotes the child.
    store.fail_on_write(2).await;
    let err = wf.approve(child.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Database);

    let parent = reload(&store, parent.id).await;
    assert_eq!(parent.status, ListingStatus::Approved);
    assert!(parent.is_latest_version);
    assert!(parent.has_active_update);
    assert_eq!(parent.slug, "ticket-summarizer");

    let child = reload(&store, child.id).await;
    assert_eq!(child.status, ListingStatus::UnderReview);
    assert!(!child.is_latest_version);
    assert_eq!(child.slug, "ticket-summarizer-v2-draft");

    // The same approval succeeds once the fault is gone.
    wf.approve(child.id, Uuid::new_v4()).await.unwrap();
    assert_eq!(latest_in_lineage(&store, parent.id).await.len(), 1);
}

#[tokio::test]
async fn test_failed_request_update_leaves_no_child() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let parent = approved_listing(&wf, owner, "Lead Scorer").await;

    // Write 1 inserts the child, write 2 sets the parent flag.
    store.fail_on_write(2).await;
    assert!(wf.request_update(parent.id, owner).await.is_err());

    assert!(store.find_children(parent.id).await.unwrap().is_empty());
    assert!(!reload(&store, parent.id).await.has_active_update);
    assert!(store.find_by_slug("lead-scorer-v2-draft").await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_rejection_keeps_parent_flag() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let (parent, child) = update_under_review(&wf, owner, "Lead Scorer").await;

    // Write 1 rejects the child, write 2 clears the parent flag.
    store.fail_on_write(2).await;
    assert!(wf
        .reject(child.id, Uuid::new_v4(), "needs more detail")
        .await
        .is_err());

    assert!(reload(&store, parent.id).await.has_active_update);
    let child = reload(&store, child.id).await;
    assert_eq!(child.status, ListingStatus::UnderReview);
    assert!(child.rejection_reason.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_double_approve_race_has_one_winner() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let (parent, child) = update_under_review(&wf, owner, "Ticket Summarizer").await;

    let first = tokio::spawn({
        let wf = wf.clone();
        async move { wf.approve(child.id, Uuid::new_v4()).await }
    });
    let second = tokio::spawn({
        let wf = wf.clone();
        async move { wf.approve(child.id, Uuid::new_v4()).await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(
        loser,
        ReviewError::InvalidState {
            current: ListingStatus::Approved,
            ..
        }
    ));

    let parent = reload(&store, parent.id).await;
    assert_eq!(parent.slug, "ticket-summarizer-v1-archived");
    assert_eq!(latest_in_lineage(&store, parent.id).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_update_requests_spawn_one_child() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let parent = approved_listing(&wf, owner, "Lead Scorer").await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let wf = wf.clone();
            tokio::spawn(async move { wf.request_update(parent.id, owner).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ReviewError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(store.find_children(parent.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_interleaved_lineages_keep_single_latest() {
    let (wf, store) = setup();
    let owner = Uuid::new_v4();
    let root = approved_listing(&wf, owner, "Ticket Summarizer").await;

    let mut live_id = root.id;
    for round in 0..4 {
        let child = wf.request_update(live_id, owner).await.unwrap();
        let mut edited = content("Ticket Summarizer");
        edited.price_cents = 1000 + round;
        wf.update_content(child.id, owner, edited).await.unwrap();
        wf.submit_for_review(child.id, owner).await.unwrap();
        if round % 2 == 0 {
            wf.approve(child.id, Uuid::new_v4()).await.unwrap();
            live_id = child.id;
        } else {
            wf.reject(child.id, Uuid::new_v4(), "needs more detail")
                .await
                .unwrap();
        }
        let latest = latest_in_lineage(&store, root.id).await;
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, live_id);
        assert!(!latest[0].has_active_update);
    }

    let live = reload(&store, live_id).await;
    assert_eq!(live.slug, "ticket-summarizer");
    assert_eq!(live.content.price_cents, 1002);
}
