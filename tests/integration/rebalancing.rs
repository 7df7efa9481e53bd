//! Rebalancing scenarios: a node joins, a node leaves, data follows.

use gyre_store::RecordStore;
use gyre_tests::SimCluster;

/// Three nodes with 8 vnodes each, 10,000 keys. Track `key_42` through a
/// node addition and the immediate removal of that same node.
#[tokio::test]
async fn test_key_42_survives_add_then_remove() {
    let sim = SimCluster::new(&["A", "B", "C"], 10_000, 8).await;
    let owner_before = sim.owner_of("key_42").await;
    assert_eq!(sim.located_on("key_42").await.as_deref(), Some(owner_before.as_str()));

    sim.cluster.add_node("D").await.unwrap();

    let owner_after_add = sim.owner_of("key_42").await;
    if owner_after_add == "D" {
        // Its owner became the new node: it must physically reside there
        // and nowhere else.
        assert_eq!(sim.located_on("key_42").await.as_deref(), Some("D"));
        let old_store = sim.cluster.store(&owner_before).await.unwrap();
        assert!(!old_store.contains("key_42").await.unwrap());
    } else {
        // Owner unchanged: the record did not move.
        assert_eq!(owner_after_add, owner_before);
        assert_eq!(
            sim.located_on("key_42").await.as_deref(),
            Some(owner_before.as_str())
        );
    }

    sim.cluster.remove_node("D").await.unwrap();

    // Back on whatever the resolver now names, with nothing lost overall.
    let owner_final = sim.owner_of("key_42").await;
    assert_eq!(sim.located_on("key_42").await.as_deref(), Some(owner_final.as_str()));
    assert_eq!(sim.total_records().await, 10_000);
    assert_eq!(sim.cluster.node_names().await, vec!["A", "B", "C"]);
    sim.assert_clean("add then remove of D").await;
}

#[tokio::test]
async fn test_addition_moves_roughly_its_share() {
    let sim = SimCluster::new(&["A", "B", "C"], 10_000, 128).await;

    let report = sim.cluster.add_node("D").await.unwrap();

    // The newcomer should claim about a quarter of the keyspace.
    let fraction = report.records_moved as f64 / 10_000.0;
    assert!(
        (0.10..=0.45).contains(&fraction),
        "new node claimed {} of 10000 keys ({fraction:.2})",
        report.records_moved
    );
    assert_eq!(sim.total_records().await, 10_000);
    sim.assert_clean("adding D").await;
}

#[tokio::test]
async fn test_removal_only_disturbs_the_departed_node() {
    let sim = SimCluster::new(&["A", "B", "C"], 5_000, 64).await;

    let locations_before = sim.cluster.locations().await.unwrap();
    let report = sim.cluster.remove_node("B").await.unwrap();

    let on_b_before = locations_before.values().filter(|n| *n == "B").count() as u64;
    assert_eq!(report.records_moved, on_b_before);

    let locations_after = sim.cluster.locations().await.unwrap();
    for (key, node) in &locations_before {
        if node != "B" {
            assert_eq!(
                locations_after.get(key),
                Some(node),
                "key {key} moved although its node stayed"
            );
        }
    }

    assert_eq!(sim.total_records().await, 5_000);
    sim.assert_clean("removing B").await;
}

#[tokio::test]
async fn test_records_stay_readable_through_rebalancing() {
    let sim = SimCluster::new(&["A", "B"], 2_000, 64).await;

    sim.cluster.add_node("C").await.unwrap();
    sim.cluster.remove_node("A").await.unwrap();

    for i in (0..2_000).step_by(137) {
        let key = format!("key_{i}");
        let value = sim.cluster.get_record(&key).await.unwrap();
        assert_eq!(
            value,
            Some(bytes::Bytes::from(format!("data_for_{key}"))),
            "{key} unreadable after rebalancing"
        );
    }
}
