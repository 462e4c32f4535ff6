//! Command-line interface for avro-stream
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate a Rust model stub from a schema
//! avro-stream generate-model --schema user.avsc --out-dir generated/
//!
//! # Print five reproducible random records
//! avro-stream synthesize --schema user.avsc --count 5 --seed 42
//!
//! # Publish a synthesized batch to Kafka
//! avro-stream publish --schema user.avsc --count 5 \
//!   --topic users --brokers localhost:9092
//!
//! # Read the batch back from the earliest retained offset
//! avro-stream consume --topic users --max-records 5 \
//!   --group-id my-consumer
//!
//! # Publish then consume in one go
//! avro-stream roundtrip --schema user.avsc --count 5 --topic users
//! ```

use anyhow::Context;
use avro_stream::codegen;
use clap::{Parser, Subcommand};
use datagen::RecordSynthesizer;
use kafka_bridge::{consume, publish, BridgeConfig, KafkaConnector};
use schema_core::RecordSchema;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "avro-stream")]
#[command(about = "Schema-driven random record synthesis with a Kafka round-trip bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Rust model stub from a schema
    GenerateModel {
        /// Path to the .avsc schema file
        #[arg(long)]
        schema: PathBuf,

        /// Directory for the generated stub (created if absent)
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Synthesize random records and print them as JSON lines
    Synthesize {
        /// Path to the .avsc schema file
        #[arg(long)]
        schema: PathBuf,

        /// Number of records to synthesize
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Fixed seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Synthesize a batch and publish it to a topic
    Publish {
        /// Path to the .avsc schema file
        #[arg(long)]
        schema: PathBuf,

        /// Number of records to synthesize and publish
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Fixed seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Channel options
        #[command(flatten)]
        bridge: BridgeConfig,
    },

    /// Consume records from a topic and print them as JSON lines
    Consume {
        /// Maximum records to pull before stopping
        #[arg(long, default_value_t = 5)]
        max_records: usize,

        /// Channel options
        #[command(flatten)]
        bridge: BridgeConfig,
    },

    /// Publish a synthesized batch, then consume it back and report counts
    Roundtrip {
        /// Path to the .avsc schema file
        #[arg(long)]
        schema: PathBuf,

        /// Number of records to round-trip
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Fixed seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Channel options
        #[command(flatten)]
        bridge: BridgeConfig,
    },
}

fn load_synthesizer(schema_path: &Path, seed: Option<u64>) -> anyhow::Result<RecordSynthesizer> {
    let schema = RecordSchema::from_file(schema_path)
        .with_context(|| format!("Failed to load schema from {}", schema_path.display()))?;

    Ok(match seed {
        Some(seed) => RecordSynthesizer::with_seed(schema, seed),
        None => RecordSynthesizer::new(schema),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Ctrl-C aborts an in-flight publish/consume attempt and surfaces the
    // Cancelled outcome instead of silently retrying.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    match cli.command {
        Commands::GenerateModel { schema, out_dir } => {
            let model = RecordSchema::from_file(&schema)
                .with_context(|| format!("Failed to load schema from {}", schema.display()))?;
            let path = codegen::write_model(&model, &out_dir)
                .with_context(|| format!("Failed to write model stub to {}", out_dir.display()))?;
            println!("{}", path.display());
        }

        Commands::Synthesize {
            schema,
            count,
            seed,
        } => {
            let mut synthesizer = load_synthesizer(&schema, seed)?;
            for record in synthesizer.batch(count) {
                println!("{}", serde_json::to_string(&record)?);
            }
        }

        Commands::Publish {
            schema,
            count,
            seed,
            bridge,
        } => {
            let mut synthesizer = load_synthesizer(&schema, seed)?;
            let batch = synthesizer.batch(count);
            let connector = KafkaConnector::new(&bridge);

            let report = publish(&batch, &bridge, &connector, &cancel).await?;
            info!(
                "Publish completed: {} records in {} attempt(s)",
                report.records_sent, report.attempts_made
            );
        }

        Commands::Consume {
            max_records,
            bridge,
        } => {
            let connector = KafkaConnector::new(&bridge);

            let report = consume(&bridge, &connector, max_records, &cancel).await?;
            for record in &report.records {
                println!("{}", serde_json::to_string(record)?);
            }
            info!(
                "Consume completed: {} records in {} attempt(s)",
                report.records.len(),
                report.attempts_made
            );
        }

        Commands::Roundtrip {
            schema,
            count,
            seed,
            bridge,
        } => {
            let mut synthesizer = load_synthesizer(&schema, seed)?;
            let batch = synthesizer.batch(count);
            let connector = KafkaConnector::new(&bridge);

            let published = publish(&batch, &bridge, &connector, &cancel).await?;
            let consumed = consume(&bridge, &connector, count, &cancel).await?;

            info!(
                "Round-trip on '{}': published {} in {} attempt(s), consumed {} in {} attempt(s)",
                bridge.topic,
                published.records_sent,
                published.attempts_made,
                consumed.records.len(),
                consumed.attempts_made
            );
        }
    }

    Ok(())
}
