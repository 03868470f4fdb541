//! CLI for kafpub
//!
//! Subcommands:
//! - `seed`: publish the four reference messages
//! - `produce`: publish messages (or stdin lines) to one topic
//! - `list`: list the cluster's topics

use std::io::BufRead;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use kafpub::Client;
use kafpub::config::{DEFAULT_CONFIG_FILE, Settings, load_config_from};
use kafpub::seed::publish_seed;
use kafpub::transport::{ClusterInfo, Delivery};
use kafpub::utils::logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "kafpub", version, about = "Publish messages to Kafka topics")]
struct Cli {
    /// Configuration file, extension optional
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Broker list in kafka format (host:port[,host:port...])
    #[arg(short, long, global = true, value_delimiter = ',')]
    brokers: Option<Vec<String>>,

    /// Client id to use. The current user name is used by default.
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Kafka delivery timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish the reference messages to `one`, `two`, `three` and `json`
    Seed,
    /// Publish messages to a topic, one per argument or per stdin line
    Produce {
        #[arg(short, long)]
        topic: String,
        messages: Vec<String>,
    },
    /// List the cluster's topics
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("error");
            error!("Could not load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(logging::level_for_verbosity(&settings.log.level, cli.verbose));

    match run(cli.command, &settings, cli.verbose).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Configuration file and environment first, command-line flags on top.
fn load_settings(cli: &Cli) -> kafpub::Result<Settings> {
    let mut settings = load_config_from(&cli.config)?;

    if let Some(brokers) = &cli.brokers {
        settings.client.brokers = brokers.clone();
    }
    if let Some(client_id) = &cli.client_id {
        settings.client.client_id = Some(client_id.clone());
    }
    if let Some(timeout) = cli.timeout {
        settings.producer.delivery_timeout_ms = timeout;
    }

    Ok(settings)
}

async fn run(command: Command, settings: &Settings, verbose: u8) -> kafpub::Result<()> {
    let client = Client::from_settings(settings)?;

    match command {
        Command::Seed => {
            let deliveries = publish_seed(&client).await?;
            print_deliveries(&deliveries);
        }
        Command::Produce { topic, messages } => {
            let payloads = message_source(messages, std::io::stdin().lock())?;

            let mut producer = client.producer();
            producer
                .produce_all(&topic, payloads, print_deliveries)
                .await
                .inspect_err(|e| error!("Could not write message: {e}"))?;
            producer.shutdown()?;
        }
        Command::List => {
            let metadata = client.metadata()?;
            info!(count = metadata.topics.len(), "fetched cluster metadata");
            print!("{}", render_metadata(&metadata, verbose));
        }
    }

    client.close()
}

/// Payloads for `produce`: the arguments when any are given, otherwise each
/// non-empty line of `input`. Lines are kept as raw bytes.
fn message_source(messages: Vec<String>, input: impl BufRead) -> std::io::Result<Vec<Vec<u8>>> {
    if !messages.is_empty() {
        return Ok(messages.into_iter().map(String::into_bytes).collect());
    }

    let mut payloads = Vec::new();
    for line in input.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if !line.is_empty() {
            payloads.push(line);
        }
    }
    Ok(payloads)
}

/// Text printed by `list`. `-v` adds partition counts, `-vv` the cluster
/// summary.
fn render_metadata(metadata: &ClusterInfo, verbose: u8) -> String {
    let mut out = String::new();

    if verbose >= 2 {
        out.push_str("Cluster information:\n");
        out.push_str(&format!("  Broker count: {}\n", metadata.brokers));
        out.push_str(&format!("  Topics count: {}\n", metadata.topics.len()));
        out.push_str(&format!(
            "  Metadata broker name: {}\n",
            metadata.orig_broker_name
        ));
        out.push_str(&format!(
            "  Metadata broker id: {}\n\n",
            metadata.orig_broker_id
        ));
    }

    out.push_str("Topics:\n");
    for topic in &metadata.topics {
        out.push_str(&format!("  {}", topic.name));
        if verbose > 0 {
            out.push_str(&format!("  partitions: {}", topic.partitions));
        }
        if let Some(err) = &topic.error {
            out.push_str(&format!("  Err: {err}"));
        }
        out.push('\n');
    }
    out
}

fn print_deliveries(deliveries: &[Delivery]) {
    for delivery in deliveries {
        match serde_json::to_string(delivery) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize delivery: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafpub::transport::TopicInfo;
    use serial_test::serial;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("valid command line")
    }

    #[test]
    #[serial]
    fn flags_override_loaded_settings() {
        let tmp = TempDir::new().expect("create tempdir");
        let config = tmp.path().join("absent");
        let config = config.to_str().unwrap();

        let cli = parse(&[
            "kafpub",
            "--config",
            config,
            "--brokers",
            "a:1,b:2",
            "--client-id",
            "cli-id",
            "--timeout",
            "5",
            "-vv",
            "list",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::List));

        let settings = load_settings(&cli).expect("settings");
        assert_eq!(settings.client.brokers, vec!["a:1", "b:2"]);
        assert_eq!(settings.client.client_id.as_deref(), Some("cli-id"));
        assert_eq!(settings.producer.delivery_timeout_ms, 5);
    }

    #[test]
    #[serial]
    fn without_flags_loaded_settings_are_kept() {
        let tmp = TempDir::new().expect("create tempdir");
        let config = tmp.path().join("absent");

        let cli = parse(&["kafpub", "--config", config.to_str().unwrap(), "seed"]);
        assert_eq!(cli.verbose, 0);

        let settings = load_settings(&cli).expect("settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = parse(&["kafpub", "produce", "-t", "one", "-b", "x:9", "-v", "hi", "there"]);
        assert_eq!(cli.brokers, Some(vec!["x:9".to_string()]));
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Produce { topic, messages } => {
                assert_eq!(topic, "one");
                assert_eq!(messages, vec!["hi", "there"]);
            }
            _ => panic!("expected produce"),
        }
    }

    #[test]
    fn produce_requires_a_topic() {
        assert!(Cli::try_parse_from(["kafpub", "produce", "hi"]).is_err());
    }

    #[test]
    fn arguments_take_precedence_over_stdin() {
        let stdin = Cursor::new(b"ignored\n".to_vec());
        let payloads = message_source(vec!["a".into(), "b".into()], stdin).unwrap();
        assert_eq!(payloads, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn stdin_lines_are_read_as_bytes() {
        let stdin = Cursor::new(b"first\r\n\n\xff\xfe binary\nlast".to_vec());
        let payloads = message_source(Vec::new(), stdin).unwrap();
        assert_eq!(
            payloads,
            vec![
                b"first".to_vec(),
                b"\xff\xfe binary".to_vec(),
                b"last".to_vec()
            ]
        );
    }

    #[test]
    fn list_output_shows_topic_errors_and_cluster_summary() {
        let metadata = ClusterInfo {
            brokers: 3,
            orig_broker_id: 1,
            orig_broker_name: "kafka-1:9092/1".to_string(),
            topics: vec![
                TopicInfo {
                    name: "one".to_string(),
                    partitions: 4,
                    error: None,
                },
                TopicInfo {
                    name: "gone".to_string(),
                    partitions: 0,
                    error: Some("UnknownTopicOrPartition".to_string()),
                },
            ],
        };

        assert_eq!(
            render_metadata(&metadata, 0),
            "Topics:\n  one\n  gone  Err: UnknownTopicOrPartition\n"
        );
        assert_eq!(
            render_metadata(&metadata, 1),
            "Topics:\n  one  partitions: 4\n  gone  partitions: 0  Err: UnknownTopicOrPartition\n"
        );

        let loud = render_metadata(&metadata, 2);
        assert!(loud.starts_with("Cluster information:\n  Broker count: 3\n  Topics count: 2\n"));
        assert!(loud.contains("  Metadata broker name: kafka-1:9092/1\n"));
        assert!(loud.contains("  Metadata broker id: 1\n"));
    }
}
