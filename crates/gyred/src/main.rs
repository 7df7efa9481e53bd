//! `gyred` — Gyre cluster simulator and diagnostics CLI.
//!
//! Drives an in-process cluster through seeded workloads and membership
//! changes, auditing placement after every step.
//!
//! # Usage
//!
//! ```text
//! gyred simulate                       # 3 nodes, 10k keys, remove + add a node
//! gyred simulate -k 100000 -n 10      # bigger dataset
//! gyred simulate -c gyre.toml         # defaults from a config file
//! gyred churn --cycles 5              # repeated join/leave with audits
//! ```

mod config;
mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use gyre_audit::{audit_placement, distribution};
use gyre_cluster::Cluster;
use gyre_types::ClusterConfig;
use tracing::info;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "gyred", version, about = "Gyre keyspace cluster simulator")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a cluster, then walk it through a node removal and a node
    /// addition, auditing placement after each step.
    Simulate {
        /// Number of records to seed.
        #[arg(short, long)]
        keys: Option<usize>,

        /// Number of initial nodes.
        #[arg(short, long)]
        nodes: Option<usize>,

        /// Virtual nodes per physical node.
        #[arg(short, long)]
        vnodes: Option<u32>,
    },

    /// Repeatedly add and remove a node, auditing after every change.
    Churn {
        /// Number of add/remove cycles.
        #[arg(long, default_value_t = 3)]
        cycles: usize,

        /// Number of records to seed.
        #[arg(short, long)]
        keys: Option<usize>,

        /// Number of initial nodes.
        #[arg(short, long)]
        nodes: Option<usize>,

        /// Virtual nodes per physical node.
        #[arg(short, long)]
        vnodes: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("loading config")?;
    telemetry::init(&config.log.level);

    match cli.command {
        Commands::Simulate {
            keys,
            nodes,
            vnodes,
        } => {
            simulate(
                keys.unwrap_or_else(|| config.keys()),
                nodes.unwrap_or_else(|| config.nodes()),
                vnodes.unwrap_or_else(|| config.vnodes_per_node()),
            )
            .await
        }
        Commands::Churn {
            cycles,
            keys,
            nodes,
            vnodes,
        } => {
            churn(
                cycles,
                keys.unwrap_or_else(|| config.keys()),
                nodes.unwrap_or_else(|| config.nodes()),
                vnodes.unwrap_or_else(|| config.vnodes_per_node()),
            )
            .await
        }
    }
}

/// Build a cluster of `node-0..node-{n}` seeded with `key_0..key_{k}`.
async fn seeded_cluster(keys: usize, nodes: usize, vnodes: u32) -> Result<(Arc<Cluster>, Vec<String>)> {
    if nodes == 0 {
        bail!("at least one initial node is required");
    }

    let cluster = Cluster::new(ClusterConfig::with_vnodes(vnodes));
    for i in 0..nodes {
        cluster.add_node(&format!("node-{i}")).await?;
    }
    info!(nodes, vnodes, "cluster formed");

    let mut all_keys = Vec::with_capacity(keys);
    for i in 0..keys {
        let key = format!("key_{i}");
        cluster
            .put_record(key.clone(), Bytes::from(format!("data_for_{key}")))
            .await?;
        all_keys.push(key);
    }
    info!(keys, "records seeded");

    Ok((cluster, all_keys))
}

/// Audit placement and fail the command if the report is not clean.
async fn audit_or_bail(cluster: &Cluster, keys: &[String], step: &str) -> Result<()> {
    let report = audit_placement(cluster, keys).await?;
    println!("{report}");
    if !report.is_clean() {
        bail!("placement audit failed after {step}: {report}");
    }
    Ok(())
}

async fn simulate(keys: usize, nodes: usize, vnodes: u32) -> Result<()> {
    if nodes < 2 {
        bail!("simulate needs at least two nodes (got {nodes})");
    }

    let (cluster, all_keys) = seeded_cluster(keys, nodes, vnodes).await?;

    println!("--- initial distribution ---");
    println!("{}", distribution(&cluster).await?);
    audit_or_bail(&cluster, &all_keys, "seeding").await?;

    // Take out a node from the middle of the fleet.
    let victim = format!("node-{}", nodes / 2);
    println!("\n--- removing {victim} ---");
    let report = cluster.remove_node(&victim).await?;
    print!("{report}");
    println!("{}", distribution(&cluster).await?);
    audit_or_bail(&cluster, &all_keys, "node removal").await?;

    // Bring a fresh node in.
    let newcomer = format!("node-{nodes}");
    println!("\n--- adding {newcomer} ---");
    let report = cluster.add_node(&newcomer).await?;
    print!("{report}");
    println!("{}", distribution(&cluster).await?);
    audit_or_bail(&cluster, &all_keys, "node addition").await?;

    println!("\nsimulation complete: all {} records in place", all_keys.len());
    Ok(())
}

async fn churn(cycles: usize, keys: usize, nodes: usize, vnodes: u32) -> Result<()> {
    let (cluster, all_keys) = seeded_cluster(keys, nodes, vnodes).await?;
    audit_or_bail(&cluster, &all_keys, "seeding").await?;

    for cycle in 0..cycles {
        let name = format!("churn-{cycle}");

        let report = cluster.add_node(&name).await?;
        println!("cycle {cycle}: joined {name} ({} records in)", report.records_moved);
        audit_or_bail(&cluster, &all_keys, "join").await?;

        let report = cluster.remove_node(&name).await?;
        println!("cycle {cycle}: removed {name} ({} records out)", report.records_moved);
        audit_or_bail(&cluster, &all_keys, "leave").await?;
    }

    println!("{}", distribution(&cluster).await?);
    println!("churn complete: {cycles} cycles, all audits clean");
    Ok(())
}
