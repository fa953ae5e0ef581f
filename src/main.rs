// ==========================================
// PTM upload validator - command line entry
// ==========================================
// ptm-validate validate <file> [--json] [--db <path>]
// ptm-validate config list [--db <path>]
// ptm-validate config set <key> <value> [--db <path>]
// --log-json on any command switches stderr logs to JSON lines
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use ptm_upload_validator::config::{ConfigManager, ValidationConfigReader};
use ptm_upload_validator::db::get_default_db_path;
use ptm_upload_validator::{i18n, logging, report, UploadValidator, UploadedFile};
use std::process::ExitCode;

const USAGE: &str = "usage:
  ptm-validate validate <file> [--json] [--db <path>]
  ptm-validate config list [--db <path>]
  ptm-validate config set <key> <value> [--db <path>]
options:
  --log-json   emit logs as JSON lines on stderr";

#[derive(Debug)]
struct CliArgs {
    positional: Vec<String>,
    json: bool,
    log_json: bool,
    db_path: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs {
        positional: Vec::new(),
        json: false,
        log_json: false,
        db_path: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--log-json" => parsed.log_json = true,
            "--db" => {
                let path = args.next().ok_or_else(|| anyhow!("--db needs a path"))?;
                parsed.db_path = Some(path);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            _ => parsed.positional.push(arg),
        }
    }
    Ok(parsed)
}

fn open_config(db_path: Option<&str>) -> Result<ConfigManager> {
    let db_path = db_path
        .map(str::to_string)
        .unwrap_or_else(get_default_db_path);
    tracing::debug!(db_path = %db_path, "opening config store");
    ConfigManager::new(&db_path).map_err(|e| anyhow!("cannot open config store {}: {}", db_path, e))
}

async fn run_validate(file_path: &str, cli: &CliArgs) -> Result<ExitCode> {
    let manager = open_config(cli.db_path.as_deref())?;
    let config = manager
        .load_validation_config()
        .await
        .map_err(|e| anyhow!("cannot load configuration: {}", e))?;
    i18n::set_locale(&config.locale);

    let file = UploadedFile::from_path(file_path, config.max_file_size_bytes)
        .with_context(|| format!("cannot read {}", file_path))?;
    let validator = UploadValidator::new(config);
    let validation = validator.validate_in_background(file).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else {
        print!("{}", report::render_text(&validation));
    }

    tracing::info!(
        file = %validation.file_name,
        errors = validation.summary.error_count,
        warnings = validation.summary.warning_count,
        "validation finished"
    );

    Ok(if validation.can_submit() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn run_config(args: &[String], cli: &CliArgs) -> Result<ExitCode> {
    let manager = open_config(cli.db_path.as_deref())?;

    match args {
        [cmd] if cmd == "list" => {
            let configs = manager
                .list_configs()
                .map_err(|e| anyhow!("cannot list configuration: {}", e))?;
            for (key, value) in configs {
                println!("{} = {}", key, value);
            }
        }
        [cmd, key, value] if cmd == "set" => {
            manager
                .set_config_value(key, value)
                .map_err(|e| anyhow!("cannot set {}: {}", key, e))?;
            tracing::info!(config_key = %key, "configuration updated");
        }
        _ => bail!("{}", USAGE),
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = parse_args(std::env::args().skip(1))?;
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::debug!(version = ptm_upload_validator::VERSION, "starting");

    match cli.positional.split_first() {
        Some((cmd, [file])) if cmd == "validate" => run_validate(file, &cli).await,
        Some((cmd, rest)) if cmd == "config" => run_config(rest, &cli),
        _ => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::from(2))
        }
    }
}
