//! Behavioural tests for the in-process votable item repository.

use std::sync::Arc;

use uuid::Uuid;
use votes_repository::{MemoryVotableItemRepository, RepositoryError, VotableItemRepository};
use votes_shared::types::{ContentKind, VoteCommit, VoteDirection, VoteTally};

fn tally_with_upvoter(voter: Uuid) -> VoteTally {
    let mut tally = VoteTally::new();
    tally.insert_voter(VoteDirection::Up, voter);
    tally
}

#[tokio::test]
async fn test_create_then_load() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    let author = Uuid::new_v4();

    let created = repository.create(ContentKind::Post, id, author).await.unwrap();
    assert_eq!(created.version, 0);
    assert_eq!(created.item.author_id, author);
    assert_eq!(created.item.tally, VoteTally::new());

    let loaded = repository.load(ContentKind::Post, id).await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn test_kinds_are_separate_namespaces() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Answer, id, Uuid::new_v4()).await.unwrap();

    let result = repository.load(ContentKind::Question, id).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { kind: ContentKind::Question, .. })));
}

#[tokio::test]
async fn test_create_duplicate_fails() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Comment, id, Uuid::new_v4()).await.unwrap();

    let result = repository.create(ContentKind::Comment, id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_commit_bumps_version() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Comment, id, Uuid::new_v4()).await.unwrap();

    let voter = Uuid::new_v4();
    let committed = repository
        .commit(
            ContentKind::Comment,
            id,
            &VoteCommit {
                expected_version: 0,
                tally: tally_with_upvoter(voter),
            },
        )
        .await
        .unwrap();

    assert_eq!(committed.version, 1);
    assert_eq!(committed.item.tally.upvotes(), 1);
    assert!(committed.item.tally.upvoted_by().contains(&voter));
}

#[tokio::test]
async fn test_stale_commit_is_rejected_without_writing() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Comment, id, Uuid::new_v4()).await.unwrap();

    let first = Uuid::new_v4();
    repository
        .commit(
            ContentKind::Comment,
            id,
            &VoteCommit {
                expected_version: 0,
                tally: tally_with_upvoter(first),
            },
        )
        .await
        .unwrap();

    let stale = repository
        .commit(
            ContentKind::Comment,
            id,
            &VoteCommit {
                expected_version: 0,
                tally: tally_with_upvoter(Uuid::new_v4()),
            },
        )
        .await;
    assert!(matches!(
        stale,
        Err(RepositoryError::Conflict {
            expected_version: 0,
            ..
        })
    ));

    let loaded = repository.load(ContentKind::Comment, id).await.unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.item.tally, tally_with_upvoter(first));
}

#[tokio::test]
async fn test_commit_missing_item() {
    let repository = MemoryVotableItemRepository::new();
    let result = repository
        .commit(
            ContentKind::Post,
            Uuid::new_v4(),
            &VoteCommit {
                expected_version: 0,
                tally: VoteTally::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_delete() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Question, id, Uuid::new_v4()).await.unwrap();

    repository.delete(ContentKind::Question, id).await.unwrap();
    assert!(matches!(
        repository.load(ContentKind::Question, id).await,
        Err(RepositoryError::NotFound { .. })
    ));
    assert!(matches!(
        repository.delete(ContentKind::Question, id).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_only_one_of_two_racing_commits_wins() {
    let repository = Arc::new(MemoryVotableItemRepository::new());
    let id = Uuid::new_v4();
    repository.create(ContentKind::Answer, id, Uuid::new_v4()).await.unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let repository = repository.clone();
            tokio::spawn(async move {
                repository
                    .commit(
                        ContentKind::Answer,
                        id,
                        &VoteCommit {
                            expected_version: 0,
                            tally: tally_with_upvoter(Uuid::new_v4()),
                        },
                    )
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    let mut conflicted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(RepositoryError::Conflict { .. }) => conflicted += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(conflicted, 1);
    assert_eq!(repository.load(ContentKind::Answer, id).await.unwrap().version, 1);
}

#[tokio::test]
async fn test_commit_after_voter_switch_stays_disjoint() {
    let repository = MemoryVotableItemRepository::new();
    let id = Uuid::new_v4();
    repository.create(ContentKind::Post, id, Uuid::new_v4()).await.unwrap();

    let voter = Uuid::new_v4();
    let mut tally = VoteTally::new();
    tally.insert_voter(VoteDirection::Up, voter);
    tally.insert_voter(VoteDirection::Down, voter);

    repository
        .commit(
            ContentKind::Post,
            id,
            &VoteCommit {
                expected_version: 0,
                tally,
            },
        )
        .await
        .unwrap();

    let loaded = repository.load(ContentKind::Post, id).await.unwrap();
    assert!(loaded.item.tally.validate().is_ok());
    assert!(!loaded.item.tally.upvoted_by().contains(&voter));
    assert!(loaded.item.tally.downvoted_by().contains(&voter));
    assert_eq!((loaded.item.tally.upvotes(), loaded.item.tally.downvotes()), (0, 1));
}
