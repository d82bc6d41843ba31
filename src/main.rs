use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use svn_trigger::actions::{registry_from_config, ActionEnv};
use svn_trigger::config;
use svn_trigger::dispatch::Dispatcher;
use svn_trigger::rule::Rule;
use svn_trigger::svn::{Repository, SvnRepository};

#[derive(clap::Parser)]
#[command(
    name = "svn-trigger",
    about = "Run configured rules against Subversion commits from a post-commit hook"
)]
struct Args {
    #[arg(help = "Path to the repository the hook fired for")]
    repository: Option<String>,

    #[arg(help = "Revision number handed to the hook")]
    revision: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Show which rules would fire without running their actions")]
    dry_run: bool,

    #[arg(long, help = "Show configured rules and exit")]
    list: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if args.version {
        println!("svn-trigger {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.list {
        list_configured_rules(args.config.as_deref())?;
        return Ok(());
    }

    let (repository, revision_text) = match (&args.repository, &args.revision) {
        (Some(repository), Some(revision)) => (repository.as_str(), revision.as_str()),
        _ => {
            eprintln!("Usage: svn-trigger <REPOSITORY> <REVISION>");
            std::process::exit(1);
        }
    };

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // An empty rule set must never block commits.
    if config.rules.is_empty() {
        warn!("no rules configured; nothing to do");
        return Ok(());
    }

    // Build the declared rules and their actions
    let env = match ActionEnv::from_config(&config) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error preparing actions: {}", e);
            std::process::exit(1);
        }
    };
    let registry = match registry_from_config(&config, &env) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error building rules: {}", e);
            std::process::exit(1);
        }
    };

    // Read the committed revision through svnlook
    let repo = match SvnRepository::open(repository, &env.search) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("Error opening repository '{}': {}", repository, e);
            std::process::exit(1);
        }
    };
    let revision = match repo.revision(revision_text) {
        Ok(revision) => revision,
        Err(e) => {
            eprintln!("Error reading revision '{}': {}", revision_text, e);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        let matched = registry.matching(&revision);
        println!("r{} would fire {} rule(s):", revision.number, matched.len());
        for rule in matched {
            println!("  {}", describe_rule(rule));
        }
        return Ok(());
    }

    let dispatcher = Dispatcher::new(registry);
    match dispatcher.dispatch(&revision) {
        Ok(count) => {
            info!(revision = revision.number, count, "dispatch complete");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error running rules for r{}: {}", revision.number, e);
            std::process::exit(1);
        }
    }
}

fn list_configured_rules(config_path: Option<&str>) -> Result<()> {
    let config = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if config.rules.is_empty() {
        println!("No rules configured");
        return Ok(());
    }

    let env = match ActionEnv::from_config(&config) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Error preparing actions: {}", e);
            std::process::exit(1);
        }
    };
    let registry = match registry_from_config(&config, &env) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error building rules: {}", e);
            std::process::exit(1);
        }
    };

    for (index, rule) in registry.rules().iter().enumerate() {
        println!("{}. {}", index + 1, describe_rule(rule));
    }
    Ok(())
}

fn describe_rule(rule: &Rule) -> String {
    let criteria: Vec<String> = rule
        .criteria()
        .entries()
        .iter()
        .map(|criterion| criterion.to_string())
        .collect();
    match rule.label() {
        Some(label) => format!("{} [{}]", label, criteria.join(", ")),
        None => format!("[{}]", criteria.join(", ")),
    }
}
