//! # Thread Feature Walkthrough
//!
//! Builds the hypergraph of a small discussion thread, prints its degree
//! sequences and motif counts under both grouping policies, then runs the
//! extractor over a two-thread batch.
//!
//! Run with `cargo run --example thread_features`.

use hyperconvo_core::{
    Conversation, HyperConvo, HyperConvoConfig, Hypergraph, HypernodeGrouping, MotifKind,
    NodeKind, Utterance,
};

// ── Threads ──────────────────────────────────────────────────────────────────

/// Alice asks, Bob and Carol answer, Alice and Bob go back and forth.
fn debate() -> Vec<Utterance> {
    vec![
        Utterance::new("d0", "alice", None, 0),
        Utterance::new("d1", "bob", Some("d0"), 1),
        Utterance::new("d2", "bob", Some("d1"), 2),
        Utterance::new("d3", "carol", Some("d0"), 3),
        Utterance::new("d4", "alice", Some("d2"), 4),
        Utterance::new("d5", "bob", Some("d4"), 5),
        Utterance::new("d6", "alice", Some("d5"), 6),
        Utterance::new("d7", "bob", Some("d6"), 7),
        Utterance::new("d8", "carol", Some("d4"), 8),
        Utterance::new("d9", "alice", Some("d8"), 9),
        Utterance::new("d10", "dave", Some("d0"), 10),
    ]
}

/// Nobody answers.
fn monologue() -> Vec<Utterance> {
    (0..4)
        .map(|i| {
            let prev = (i > 0).then(|| format!("m{}", i - 1));
            Utterance::new(format!("m{i}"), "erin", prev.as_deref(), i)
        })
        .collect()
}

// ── Output ───────────────────────────────────────────────────────────────────

fn describe(label: &str, g: &Hypergraph) -> hyperconvo_core::Result<()> {
    println!("── {label} ──");
    println!(
        "  raw nodes {}  hypernodes {}  edges {}",
        g.node_count(NodeKind::Raw),
        g.node_count(NodeKind::Hyper),
        g.edge_count()
    );
    for h in g.hypernodes() {
        println!("    {:<6} {:?}", h.speaker_id, h.members);
    }
    println!("  c->c indegrees   {:?}", g.indegrees(NodeKind::Raw, NodeKind::Raw)?);
    println!("  C->C outdegrees  {:?}", g.outdegrees(NodeKind::Hyper, NodeKind::Hyper)?);
    println!("  C->C indegrees   {:?}", g.indegrees(NodeKind::Hyper, NodeKind::Hyper)?);
    for kind in MotifKind::ALL {
        println!("  {:<28} {}", kind.label(), g.motifs(kind, 2).len());
    }
    Ok(())
}

fn main() -> hyperconvo_core::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let thread = debate();
    describe(
        "turn grouping",
        &Hypergraph::from_utterances_grouped(&thread, HypernodeGrouping::Turn),
    )?;
    describe(
        "speaker grouping",
        &Hypergraph::from_utterances_grouped(&thread, HypernodeGrouping::Speaker),
    )?;

    let hc = HyperConvo::new(HyperConvoConfig {
        min_thread_len: 5,
        invalid_val: -1.0,
        grouping: HypernodeGrouping::Speaker,
        ..HyperConvoConfig::default()
    })?;

    let mut batch = vec![
        Conversation::new("d0", thread),
        Conversation::new("m0", monologue()),
    ];
    hc.transform(&mut batch, |_| true);

    println!("── extracted ──");
    for convo in &batch {
        match convo.features(&hc.config().feat_name) {
            Some(feats) => {
                println!("  {}: {} features", convo.id, feats.len());
                for (name, value) in feats.iter().filter(|(n, _)| n.starts_with("count[")) {
                    println!("    {name:<44} {value}");
                }
            }
            None => println!("  {}: skipped", convo.id),
        }
    }
    Ok(())
}
