//! End-to-end recommender behaviour on a small fixed catalogue
//!
//! Five users read two consecutive articles each out of ten; user 1 reads
//! articles 0 and 1.

use article_reco_core::{dot_product, l2_norm};
use article_reco_engine::{
    CollaborativeRecommender, ContentBasedRecommender, EmbeddingStore, EngineConfig,
    EvaluationConfig, HybridRecommender, Interaction, InteractionStore, RecommendOutcome,
    RecommendationEngine, Strategy, SvdConfig,
};

fn embeddings() -> EmbeddingStore {
    EmbeddingStore::new(
        (0..10)
            .map(|i| {
                let v: Vec<f32> = (0..5)
                    .map(|d| (((i * 5 + d) * 37) % 17) as f32 / 17.0 + 0.05)
                    .collect();
                (i, v)
            })
            .collect(),
    )
    .unwrap()
}

fn clicks() -> InteractionStore {
    (0..10)
        .map(|i| Interaction::new(i / 2 + 1, i))
        .collect()
}

fn seeded_cf(seed: u64) -> CollaborativeRecommender {
    CollaborativeRecommender::new(
        SvdConfig {
            seed: Some(seed),
            ..SvdConfig::default()
        },
        EvaluationConfig::default(),
    )
}

#[test]
fn test_content_returns_five_unread() {
    let recs = ContentBasedRecommender::recommend(&embeddings(), &clicks(), 1, 5).unwrap();
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|item| *item != 0 && *item != 1));
}

#[test]
fn test_collaborative_returns_five_unread() {
    let outcome = seeded_cf(3).recommend(&clicks(), 1, 5).unwrap();
    let items = outcome.items().unwrap();
    assert_eq!(items.len(), 5);
    assert!(!items.contains(&0) && !items.contains(&1));
}

#[test]
fn test_collaborative_unknown_user() {
    let outcome = seeded_cf(3).recommend(&clicks(), 6, 5).unwrap();
    assert_eq!(outcome, RecommendOutcome::UserNotFound(6));
    assert_eq!(
        outcome.to_string(),
        "Error: User ID 6 not found in clicks data."
    );
}

#[test]
fn test_collaborative_is_deterministic_with_seed() {
    let first = seeded_cf(1234).recommend(&clicks(), 2, 5).unwrap();
    let second = seeded_cf(1234).recommend(&clicks(), 2, 5).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_hybrid_prefix_is_content_pass() {
    let store = embeddings();
    let recs = HybridRecommender::recommend(&store, &clicks(), 1, 5).unwrap();
    assert_eq!(recs.len(), 5);

    // Best unread article for each of user 1's reads, in read order
    let best_for = |read: i64| {
        let anchor = store.get(read).unwrap().to_vec();
        let mut best: Option<(i64, f32)> = None;
        for candidate in 2..10 {
            let other = store.get(candidate).unwrap().to_vec();
            let score = dot_product(&anchor, &other) / (l2_norm(&anchor) * l2_norm(&other));
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.unwrap().0
    };
    assert_eq!(&recs[..2], &[best_for(0), best_for(1)]);

    // No co-readers, so the remainder is popularity backfill in log order
    let backfill: Vec<i64> = (2..10)
        .filter(|item| !recs[..2].contains(item))
        .take(3)
        .collect();
    assert_eq!(&recs[2..], backfill.as_slice());
}

#[test]
fn test_hybrid_uses_co_readers() {
    let mut events: Vec<Interaction> = clicks().events().to_vec();
    // user 2 also read article 0, so their articles become candidates for user 1
    events.push(Interaction::new(2, 0));
    let interactions = InteractionStore::new(events);

    let recs = HybridRecommender::recommend(&embeddings(), &interactions, 1, 5).unwrap();
    assert_eq!(&recs[2..4], &[2, 3]);
}

#[test]
fn test_dispatcher_covers_every_strategy() {
    let engine = RecommendationEngine::new(EngineConfig {
        svd: SvdConfig {
            seed: Some(8),
            ..SvdConfig::default()
        },
        ..EngineConfig::default()
    });

    for tag in ["ra", "cb", "cf", "hy", "cv"] {
        let strategy: Strategy = tag.parse().unwrap();
        let outcome = engine
            .recommend_default(&embeddings(), &clicks(), 3, strategy)
            .unwrap();
        let items = outcome.items().unwrap();
        assert_eq!(items.len(), 5, "strategy {}", tag);
        assert!(!items.contains(&4) && !items.contains(&5), "strategy {}", tag);
    }
}
