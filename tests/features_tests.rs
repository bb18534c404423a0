//! Integration tests for the thread feature extractor.

use hyperconvo_core::features::FEATURES_PER_THREAD;
use hyperconvo_core::{
    Conversation, HyperConvo, HyperConvoConfig, HyperConvoError, HypernodeGrouping, Utterance,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Alice and Bob alternate, each replying to the other's last message.
fn ping_pong(len: usize) -> Vec<Utterance> {
    (0..len)
        .map(|i| {
            let speaker = if i % 2 == 0 { "alice" } else { "bob" };
            let prev = (i > 0).then(|| format!("p{}", i - 1));
            Utterance::new(format!("p{i}"), speaker, prev.as_deref(), i as i64)
        })
        .collect()
}

fn extractor(config: HyperConvoConfig) -> HyperConvo {
    HyperConvo::new(config).expect("valid config")
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn default_extractor_skips_short_threads() {
    let hc = HyperConvo::default();
    assert!(hc.thread_features(&ping_pong(9)).is_none());
    assert!(hc.thread_features(&ping_pong(10)).is_some());
}

#[test]
fn every_thread_has_the_same_shape() {
    let hc = extractor(HyperConvoConfig {
        min_thread_len: 1,
        ..HyperConvoConfig::default()
    });
    let names = hc.feature_names();
    for len in [1, 2, 5, 10, 25] {
        let feats = hc.thread_features(&ping_pong(len)).expect("long enough");
        assert_eq!(feats.len(), FEATURES_PER_THREAD);
        assert_eq!(feats.names(), names.as_slice());
    }
}

#[test]
fn prefix_caps_the_graph() {
    let hc = extractor(HyperConvoConfig {
        prefix_len: 4,
        min_thread_len: 4,
        invalid_val: -1.0,
        ..HyperConvoConfig::default()
    });
    let short = hc.thread_features(&ping_pong(4)).expect("long enough");
    let long = hc.thread_features(&ping_pong(40)).expect("long enough");
    assert_eq!(short, long);
    // Four utterances in a chain: three replies.
    assert_eq!(short.get("mean[indegree over c->c responses]"), Some(0.75));
}

#[test]
fn speaker_grouping_sees_reciprocity() {
    let thread = ping_pong(10);
    let by_turn = extractor(HyperConvoConfig::default())
        .thread_features(&thread)
        .expect("long enough");
    let by_speaker = extractor(HyperConvoConfig {
        grouping: HypernodeGrouping::Speaker,
        ..HyperConvoConfig::default()
    })
    .thread_features(&thread)
    .expect("long enough");

    assert_eq!(by_turn.get("count[reciprocity motif]"), Some(0.0));
    assert_eq!(by_turn.get("count[external reciprocity motif]"), Some(9.0));
    assert_eq!(by_speaker.get("count[reciprocity motif]"), Some(1.0));
    assert_eq!(by_speaker.get("is-present[dyadic interaction motif]"), Some(1.0));
    assert_eq!(by_speaker.get("max[outdegree over C->C responses]"), Some(5.0));
}

#[test]
fn mid_thread_features_exclude_root() {
    let hc = extractor(HyperConvoConfig {
        invalid_val: -1.0,
        ..HyperConvoConfig::default()
    });
    let feats = hc.thread_features(&ping_pong(10)).expect("long enough");
    // Nine replies in the full prefix, eight once the root is gone.
    assert_eq!(feats.get("mean[indegree over c->c responses]"), Some(0.9));
    assert_eq!(
        feats.get("mean[indegree over c->c mid-thread responses]"),
        Some(8.0 / 9.0)
    );
    assert_eq!(feats.get("count[external reciprocity motif over mid-thread]"), Some(8.0));
}

#[test]
fn invalid_value_is_configurable() {
    // Two utterances: the mid-thread graph is one node with a dangling reply.
    let config = HyperConvoConfig {
        prefix_len: 2,
        min_thread_len: 2,
        ..HyperConvoConfig::default()
    };
    let nan = extractor(config.clone())
        .thread_features(&ping_pong(2))
        .expect("long enough");
    let custom = extractor(HyperConvoConfig {
        invalid_val: 42.0,
        ..config
    })
    .thread_features(&ping_pong(2))
    .expect("long enough");

    for name in [
        "2nd-largest[indegree over c->c mid-thread responses]",
        "entropy[indegree over c->c mid-thread responses]",
    ] {
        assert!(nan.get(name).is_some_and(f64::is_nan), "{name}");
        assert_eq!(custom.get(name), Some(42.0), "{name}");
    }
    assert_eq!(custom.get("max[indegree over c->c mid-thread responses]"), Some(0.0));
}

#[test]
fn transform_attaches_under_feat_name() {
    let hc = extractor(HyperConvoConfig {
        feat_name: "hg".to_owned(),
        ..HyperConvoConfig::default()
    });
    let mut batch = vec![
        Conversation::new("long", ping_pong(12)),
        Conversation::new("short", ping_pong(3)),
        Conversation::new("skipped", ping_pong(12)),
    ];
    hc.transform(&mut batch, |c| c.id != "skipped");

    assert_eq!(
        batch[0].features("hg").map(|f| f.len()),
        Some(FEATURES_PER_THREAD)
    );
    assert_eq!(batch[1].meta.get("hg"), Some(&None));
    assert_eq!(batch[2].meta.get("hg"), Some(&None));
    assert!(batch[0].meta.get("hyperconvo").is_none());
}

#[test]
fn retrieve_feats_matches_thread_features() {
    let hc = HyperConvo::default();
    let batch = vec![
        Conversation::new("a", ping_pong(10)),
        Conversation::new("b", ping_pong(11)),
    ];
    let feats = hc.retrieve_feats(&batch, |c| c.id == "b");
    assert_eq!(feats.len(), 1);
    let direct = hc.thread_features(&batch[1].utterances).expect("long enough");
    let via_batch = &feats["b"];
    assert_eq!(direct.names(), via_batch.names());
    for (x, y) in direct.values().iter().zip(via_batch.values()) {
        assert!(x == y || (x.is_nan() && y.is_nan()));
    }
}

#[test]
fn zero_dyadic_threshold_is_rejected() {
    let err = HyperConvo::new(HyperConvoConfig {
        dyadic_threshold: 0,
        ..HyperConvoConfig::default()
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid config 'dyadic_threshold': must be at least 1"
    );
    assert!(matches!(err, HyperConvoError::InvalidConfig { .. }));
}
