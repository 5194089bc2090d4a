//! Concurrent voting against the in-process store.

use std::sync::Arc;

use uuid::Uuid;
use votes_pipeline::{VoteService, VoteServiceConfig};
use votes_repository::{MemoryVotableItemRepository, VotableItemRepository};
use votes_shared::types::{ContentKind, VoteDirection};

async fn service_with_item(config: VoteServiceConfig) -> (VoteService, Uuid) {
    let repository = Arc::new(MemoryVotableItemRepository::new());
    let item_id = Uuid::new_v4();
    repository
        .create(ContentKind::Comment, item_id, Uuid::new_v4())
        .await
        .unwrap();
    (VoteService::with_config(repository, config), item_id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_upvotes_both_land() {
    let (service, item_id) = service_with_item(VoteServiceConfig::default()).await;
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .apply_vote(ContentKind::Comment, item_id, a, VoteDirection::Up)
                .await
        })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .apply_vote(ContentKind::Comment, item_id, b, VoteDirection::Up)
                .await
        })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let item = service.get_item(ContentKind::Comment, item_id).await.unwrap();
    assert_eq!(item.tally.upvotes(), 2);
    assert!(item.tally.upvoted_by().contains(&a));
    assert!(item.tally.upvoted_by().contains(&b));
    assert!(item.tally.validate().is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_voters_on_one_item() {
    let config = VoteServiceConfig::default().with_max_retries(100);
    let (service, item_id) = service_with_item(config).await;

    let voters: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
    let handles: Vec<_> = voters
        .iter()
        .enumerate()
        .map(|(i, voter)| {
            let service = service.clone();
            let voter = *voter;
            let direction = if i % 2 == 0 {
                VoteDirection::Up
            } else {
                VoteDirection::Down
            };
            tokio::spawn(async move {
                service
                    .apply_vote(ContentKind::Comment, item_id, voter, direction)
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let item = service.get_item(ContentKind::Comment, item_id).await.unwrap();
    assert_eq!(item.tally.upvotes(), 10);
    assert_eq!(item.tally.downvotes(), 10);
    assert!(item.tally.validate().is_ok());
    for (i, voter) in voters.iter().enumerate() {
        if i % 2 == 0 {
            assert!(item.tally.upvoted_by().contains(voter));
        } else {
            assert!(item.tally.downvoted_by().contains(voter));
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_voter_racing_toggles_stays_consistent() {
    let config = VoteServiceConfig::default().with_max_retries(100);
    let (service, item_id) = service_with_item(config).await;
    let voter = Uuid::new_v4();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .apply_vote(ContentKind::Comment, item_id, voter, VoteDirection::Up)
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Four serialized toggles leave the vote retracted.
    let item = service.get_item(ContentKind::Comment, item_id).await.unwrap();
    assert_eq!(item.tally.upvotes(), 0);
    assert!(item.tally.upvoted_by().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_votes_on_different_items_are_independent() {
    let repository = Arc::new(MemoryVotableItemRepository::new());
    let items: Vec<(ContentKind, Uuid)> = ContentKind::ALL
        .iter()
        .map(|kind| (*kind, Uuid::new_v4()))
        .collect();
    for (kind, id) in &items {
        repository.create(*kind, *id, Uuid::new_v4()).await.unwrap();
    }
    let service = VoteService::new(repository);
    let voter = Uuid::new_v4();

    let handles: Vec<_> = items
        .iter()
        .map(|(kind, id)| {
            let service = service.clone();
            let (kind, id) = (*kind, *id);
            tokio::spawn(async move {
                service.apply_vote(kind, id, voter, VoteDirection::Down).await
            })
        })
        .collect();
    for handle in handles {
        let item = handle.await.unwrap().unwrap();
        assert_eq!(item.tally.downvotes(), 1);
        assert_eq!(item.tally.upvotes(), 0);
    }
}
