//! End-to-end verification scenarios: the audit oracle across churn.

use gyre_cluster::{Cluster, ClusterError};
use gyre_tests::SimCluster;
use gyre_types::ClusterConfig;

#[tokio::test]
async fn test_empty_ring_signals_no_owner() {
    let cluster = Cluster::new(ClusterConfig::default());
    let err = cluster.resolve("anykey").await.unwrap_err();
    assert!(matches!(err, ClusterError::EmptyRing));
}

#[tokio::test]
async fn test_double_add_leaves_vnode_count_unchanged() {
    let sim = SimCluster::new(&["A"], 100, 8).await;

    let err = sim.cluster.add_node("A").await.unwrap_err();
    assert!(matches!(err, ClusterError::NodeAlreadyExists(_)));

    // Not doubled.
    assert_eq!(sim.cluster.ring().await.vnode_count_of("A"), 8);
    assert_eq!(sim.total_records().await, 100);
    sim.assert_clean("rejected duplicate add").await;
}

#[tokio::test]
async fn test_audit_stays_clean_across_churn() {
    let sim = SimCluster::new(&["A", "B", "C"], 3_000, 64).await;
    sim.assert_clean("seeding").await;

    for cycle in 0..4 {
        let name = format!("extra-{cycle}");

        sim.cluster.add_node(&name).await.unwrap();
        sim.assert_clean(&format!("join of {name}")).await;
        assert_eq!(sim.total_records().await, 3_000, "records leaked on join");

        sim.cluster.remove_node(&name).await.unwrap();
        sim.assert_clean(&format!("leave of {name}")).await;
        assert_eq!(sim.total_records().await, 3_000, "records leaked on leave");
    }
}

#[tokio::test]
async fn test_resolution_is_stable_between_changes() {
    let sim = SimCluster::new(&["A", "B", "C"], 1_000, 32).await;

    // Repeated resolution with no membership change never wavers.
    for key in sim.keys.iter().step_by(83) {
        let first = sim.owner_of(key).await;
        for _ in 0..3 {
            assert_eq!(sim.owner_of(key).await, first);
        }
    }
}

#[tokio::test]
async fn test_shrink_to_single_node_holds_everything() {
    let sim = SimCluster::new(&["A", "B", "C"], 1_500, 32).await;

    sim.cluster.remove_node("C").await.unwrap();
    sim.cluster.remove_node("B").await.unwrap();

    // One node left: it owns the entire dataset.
    assert_eq!(sim.cluster.node_names().await, vec!["A"]);
    assert_eq!(sim.total_records().await, 1_500);
    sim.assert_clean("shrinking to one node").await;

    // And the last one cannot leave while records remain.
    let err = sim.cluster.remove_node("A").await.unwrap_err();
    assert!(matches!(err, ClusterError::EmptyRing));
}
