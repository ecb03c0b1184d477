//! esnode - compile Elasticsearch node descriptors into Kubernetes pod fragments

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use esnode_common::config::OperatorConfig;
use esnode_common::crd::NodeDescriptor;
use esnode_common::telemetry::{init_tracing, TelemetryConfig};
use esnode_common::Error;
use esnode_workload::k8s::{PersistentVolumeClaim, PodSpec};
use esnode_workload::{ClaimStore, KubeClaimStore, NodeCompiler};

/// esnode - Elasticsearch node compiler
#[derive(Parser, Debug)]
#[command(name = "esnode", version, about, long_about = None)]
struct Cli {
    /// Operator configuration file (YAML)
    #[arg(long, global = true, env = "ESNODE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a node descriptor and print the result as YAML
    ///
    /// Without --apply-claims the per-node PersistentVolumeClaim is computed
    /// and printed but never sent to the cluster.
    Render(RenderArgs),

    /// Print the JSON schema of the node descriptor
    Schema,
}

/// Render mode arguments
#[derive(Parser, Debug)]
struct RenderArgs {
    /// Path to the NodeDescriptor YAML file
    file: PathBuf,

    /// Apply the node's claim using the in-cluster or kubeconfig client
    #[arg(long)]
    apply_claims: bool,

    /// Fail when the node has no storage configured
    #[arg(long)]
    strict_storage: bool,
}

/// What `render` prints
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Rendered<'a> {
    pod_spec: &'a PodSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<&'a PersistentVolumeClaim>,
}

/// Store used when claims are only rendered
struct DryRunClaimStore;

#[async_trait]
impl ClaimStore for DryRunClaimStore {
    async fn apply_claim(&self, claim: &PersistentVolumeClaim) -> Result<(), Error> {
        info!(claim = %claim.metadata.name, "Dry run, not applying PersistentVolumeClaim");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(TelemetryConfig {
        json: cli.json_logs,
        ..Default::default()
    })?;

    let config = OperatorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => run_render(args, config).await,
        Commands::Schema => {
            let schema = schemars::schema_for!(NodeDescriptor);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

async fn run_render(args: RenderArgs, config: OperatorConfig) -> anyhow::Result<()> {
    let yaml = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let descriptor = NodeDescriptor::from_yaml(&yaml)?;

    let store: Box<dyn ClaimStore> = if args.apply_claims {
        let client = kube::Client::try_default()
            .await
            .context("failed to create Kubernetes client")?;
        Box::new(KubeClaimStore::new(client, &config.field_manager))
    } else {
        Box::new(DryRunClaimStore)
    };

    let compiled = NodeCompiler::new(&descriptor, &config.defaults)
        .with_strict_storage(config.strict_storage || args.strict_storage)
        .compile(store.as_ref())
        .await?;
    compiled.emit_diagnostics();

    let rendered = Rendered {
        pod_spec: &compiled.pod_spec,
        claim: compiled.claim.as_ref(),
    };
    print!("{}", serde_yaml::to_string(&rendered)?);

    if compiled.has_errors() {
        anyhow::bail!("node {} compiled with errors", descriptor.deploy_name);
    }
    Ok(())
}
