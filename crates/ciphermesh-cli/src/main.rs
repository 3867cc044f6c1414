//! Command-line driver for ciphermesh orchestration flows.
//!
//! Runs against the in-process cluster backend, so `demo` and `store`
//! exercise the full permission and payment gates without a remote
//! network.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use ciphermesh::client::keys::{load_node_key, load_user_key, NodeKey, UserKey};
use ciphermesh::client::{Config, LocalCluster};
use ciphermesh::payments::{LocalLedger, TokenAmount};
use ciphermesh::{
    execute_gated, ClusterId, Coordinator, OperationKind, PartyDescriptor, ProgramId, UserId,
    Wallet,
};

#[derive(Parser)]
#[command(name = "ciphermesh", about = "Permission- and payment-gated secret orchestration")]
struct Cli {
    /// Emit machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full store → revoke → retrieve-denied flow with
    /// ephemeral keys on an in-process cluster.
    Demo {
        /// Number of secret-holding parties.
        #[arg(long, default_value_t = 2)]
        parties: usize,

        /// Program the stored secrets are bound to.
        #[arg(long, default_value = "prog1")]
        program_id: String,
    },
    /// Store one secret per configured party (keys and secrets come
    /// from CIPHERMESH_* environment variables).
    Store {
        /// Program the stored secrets are bound to.
        #[arg(long)]
        program_id: String,

        /// User granted compute permission on every stored secret.
        #[arg(long)]
        user_id_1: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo { parties, program_id } => run_demo(parties, &program_id, cli.json).await,
        Command::Store { program_id, user_id_1 } => {
            run_store(&program_id, &user_id_1, cli.json).await
        }
    }
}

fn demo_wallet() -> Wallet {
    Wallet::new("mesh1demo", vec![0x42; 32])
}

async fn run_demo(party_count: usize, program_id: &str, json: bool) -> anyhow::Result<()> {
    anyhow::ensure!(party_count >= 1, "demo needs at least one party");

    let program_id = ProgramId::new(program_id)?;
    let cluster_id = ClusterId::new("devnet")?;
    let network = Arc::new(LocalCluster::new());
    let ledger = Arc::new(LocalLedger::new(TokenAmount(1_000_000)));
    let coordinator = Coordinator::new(
        Arc::clone(&network),
        Arc::clone(&ledger),
        demo_wallet(),
        cluster_id.clone(),
    );

    const NAMES: [&str; 8] = [
        "Bob", "Charlie", "Dana", "Erin", "Frank", "Grace", "Heidi", "Ivan",
    ];
    let parties: Vec<PartyDescriptor> = (0..party_count)
        .map(|i| {
            let party_name = if i < NAMES.len() {
                NAMES[i].to_string()
            } else {
                format!("Party{}", i + 1)
            };
            PartyDescriptor {
                secret_name: format!("{}_salary", party_name.to_lowercase()),
                secret_value: 100_000 + i as i64,
                party_name,
                user_key: UserKey::generate(),
                node_key: NodeKey::generate(),
            }
        })
        .collect();

    // The compute consumer gets her own ephemeral identity.
    let alice_key = UserKey::generate();
    let alice_node = NodeKey::generate();
    let alice = coordinator.open_session(&alice_key, &alice_node);

    let stored = coordinator
        .store_all(&parties, &program_id, alice.user_id())
        .await?;

    // The consumer may compute, but not read the raw secret.
    let denied = execute_gated(
        OperationKind::Retrieve,
        &cluster_id,
        ledger.as_ref(),
        &demo_wallet(),
        |receipt| {
            alice.retrieve(
                &cluster_id,
                &stored[0].store_id,
                &parties[0].secret_name,
                receipt,
            )
        },
    )
    .await;
    anyhow::ensure!(
        denied.is_err(),
        "consumer retrieved a raw secret; permission gate is broken"
    );

    // First party revokes the consumer entirely.
    let writer = coordinator.open_session(&parties[0].user_key, &parties[0].node_key);
    coordinator
        .revoke_retrieve(&writer, &stored[0].store_id, alice.user_id())
        .await?;

    let compute_after_revoke = coordinator
        .run_compute(&alice, &program_id, &stored)
        .await;
    anyhow::ensure!(
        compute_after_revoke.is_err(),
        "consumer computed after revocation; permission gate is broken"
    );

    if json {
        let output = json!({
            "cluster_id": cluster_id.as_str(),
            "program_id": program_id.as_str(),
            "consumer_user_id": alice.user_id().as_str(),
            "stored": stored.iter().map(|s| json!({
                "party_name": s.party_name,
                "party_id": s.party_id.as_str(),
                "store_id": s.store_id.as_str(),
            })).collect::<Vec<_>>(),
            "retrieve_denied": true,
            "compute_denied_after_revoke": true,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Cluster: {cluster_id}");
        for entry in &stored {
            println!(
                "Stored secret for {}: {}:{}",
                entry.party_name, entry.party_id, entry.store_id
            );
        }
        println!("Retrieve as {} correctly denied", alice.user_id());
        println!(
            "Revoked {} on store {}; compute now denied",
            alice.user_id(),
            stored[0].store_id
        );
    }
    Ok(())
}

async fn run_store(program_id: &str, user_id_1: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env().context("loading CIPHERMESH_* configuration")?;
    anyhow::ensure!(
        !config.parties.is_empty(),
        "no parties configured; set CIPHERMESH_USERKEY_PATH_PARTY_1"
    );

    let program_id = ProgramId::new(program_id)?;
    let user_id_1 = UserId::new(user_id_1)?;

    let parties = config
        .parties
        .iter()
        .map(|p| {
            Ok(PartyDescriptor {
                party_name: p.party_name.clone(),
                secret_name: p.secret_name.clone(),
                secret_value: p.secret_value,
                user_key: load_user_key(&p.user_key_path)
                    .with_context(|| format!("user key for {}", p.party_name))?,
                node_key: load_node_key(&p.node_key_path)
                    .with_context(|| format!("node key for {}", p.party_name))?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let network = Arc::new(LocalCluster::new());
    let ledger = Arc::new(LocalLedger::new(TokenAmount(1_000_000)));
    let coordinator = Coordinator::new(
        network,
        ledger,
        config.wallet(),
        config.cluster_id.clone(),
    );

    let stored = coordinator
        .store_all(&parties, &program_id, &user_id_1)
        .await?;

    if json {
        let output = json!({
            "cluster_id": config.cluster_id.as_str(),
            "program_id": program_id.as_str(),
            "consumer_user_id": user_id_1.as_str(),
            "stored": stored.iter().map(|s| json!({
                "party_name": s.party_name,
                "party_id": s.party_id.as_str(),
                "store_id": s.store_id.as_str(),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "Cluster {} (endpoint {}, chain {})",
            config.cluster_id, config.grpc_endpoint, config.chain_id
        );
        for entry in &stored {
            println!(
                "Stored secret for {}: {}:{}",
                entry.party_name, entry.party_id, entry.store_id
            );
        }
        println!();
        println!("{} may now run {} over these stores:", user_id_1, program_id);
        println!("  ciphermesh demo --program-id {program_id}");
    }
    Ok(())
}
