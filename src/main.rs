//! rdap-lookup - query RDAP servers found through the IANA bootstrap registries
//!
//! Resolves the authoritative server for a domain, IP address or AS number
//! and prints a WHOIS-style summary of the registration.

use anyhow::{anyhow, bail};
use rdap_lookup::{
    bootstrap::parse_ip,
    print::{print_autnum, print_domain, print_ip_network, print_servers},
    ClientConfig, QueryType, RdapClient, Result,
};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::Level;

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    query: String,
    query_type: Option<QueryType>,
    servers_only: bool,
    bootstrap_dir: Option<PathBuf>,
    bootstrap_url: Option<String>,
    debug: bool,
    help: bool,
    version: bool,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = rdap_lookup::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Use --help for usage information");
            process::exit(1);
        }
    };

    if cli.help {
        print_help();
        return;
    }
    if cli.version {
        println!("rdap-lookup {}", rdap_lookup::VERSION);
        return;
    }

    init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Main lookup workflow
async fn run(cli: CliArgs) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(dir) = cli.bootstrap_dir {
        config = config.with_bootstrap_dir(dir);
    }
    if let Some(url) = cli.bootstrap_url {
        config = config.with_bootstrap_url(&url);
    }

    let query_type = cli
        .query_type
        .unwrap_or_else(|| detect_query_type(&cli.query));
    let client = RdapClient::with_config(config)?;

    if cli.servers_only {
        let servers = client.servers_for(query_type, &cli.query).await?;
        print_servers(&cli.query, &servers);
        return Ok(());
    }

    match query_type {
        QueryType::Ip => print_ip_network(&client.ip(&cli.query).await?),
        QueryType::Autnum => print_autnum(&client.autnum(&cli.query).await?),
        _ => print_domain(&client.domain(&cli.query).await?),
    }

    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => cli.help = true,
            "-V" | "--version" => cli.version = true,
            "-d" | "--debug" => cli.debug = true,
            "-s" | "--servers" => cli.servers_only = true,
            "-t" | "--type" => {
                let value = iter.next().ok_or_else(|| anyhow!("--type needs a value"))?;
                cli.query_type = Some(parse_query_type(value)?);
            }
            "--bootstrap-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--bootstrap-dir needs a directory"))?;
                cli.bootstrap_dir = Some(PathBuf::from(value));
            }
            "--bootstrap-url" => {
                let value = iter
                    .next()
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| anyhow!("--bootstrap-url needs a URL"))?;
                cli.bootstrap_url = Some(value.trim().to_string());
            }
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option '{}'", flag),
            value => positional.push(value.to_string()),
        }
    }

    if cli.help || cli.version {
        return Ok(cli);
    }

    match positional.len() {
        0 => bail!("missing QUERY (a domain, IP address or AS number)"),
        1 => cli.query = positional.remove(0),
        _ => bail!("expected one QUERY, got {}", positional.len()),
    }

    Ok(cli)
}

fn parse_query_type(value: &str) -> anyhow::Result<QueryType> {
    match value.to_lowercase().as_str() {
        "dns" | "domain" => Ok(QueryType::Domain),
        "ip" | "ipv4" | "ipv6" => Ok(QueryType::Ip),
        "asn" | "autnum" => Ok(QueryType::Autnum),
        other => bail!("invalid --type '{}', must be one of: dns, ip, asn", other),
    }
}

/// IP literal -> ip, `AS123` or bare digits -> autnum, anything else -> domain
fn detect_query_type(query: &str) -> QueryType {
    if parse_ip(query).is_ok() {
        return QueryType::Ip;
    }

    let trimmed = query.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &trimmed[2..],
        _ => trimmed,
    };

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        QueryType::Autnum
    } else {
        QueryType::Domain
    }
}

/// Print help information
fn print_help() {
    println!("🔎 rdap-lookup - RDAP registration data lookup");
    println!("═══════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    rdap-lookup [OPTIONS] QUERY");
    println!();
    println!("OPTIONS:");
    println!("    -t, --type <dns|ip|asn>   Query type (detected from QUERY if omitted)");
    println!("    -s, --servers             Only print the RDAP servers for QUERY");
    println!("        --bootstrap-dir DIR   Read dns.json/asn.json/ipv4.json/ipv6.json from DIR");
    println!("        --bootstrap-url URL   Download bootstrap files from URL instead of IANA");
    println!("    -d, --debug               Verbose logging to stderr");
    println!("    -V, --version             Print version");
    println!("    -h, --help                Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    rdap-lookup google.com");
    println!("    rdap-lookup 8.8.8.8");
    println!("    rdap-lookup AS15169");
    println!("    rdap-lookup --servers 2001:4860::8888");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    RDAP_BOOTSTRAP_URL   Bootstrap base URL (default: https://data.iana.org/rdap/)");
    println!("    RDAP_TIMEOUT_SECS    Request timeout in seconds (default: 30)");
    println!("    RDAP_BOOTSTRAP_DIR   Read bootstrap files from a local directory");
}
