use std::env;
use std::process::ExitCode;
use std::time::Duration;

use common::AppSettings;
use engine::{HttpAlbumService, Session, SortDir, SortKey, ViewOptions, DEFAULT_SERVER_URL};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage:
  musicsync [--server URL] status <source> [target] [--search T] [--sort artist|album|date] [--desc] [--all] [--synced]
  musicsync [--server URL] sync <source> <target> <album-path>...
  musicsync [--server URL] remember <source> <target>
  musicsync [--server URL] browse [path]

Use - for <source> or <target> to reuse the directories saved on the server.";

#[derive(Debug, PartialEq)]
enum Command {
    Status {
        source: Option<String>,
        target: Option<String>,
        options: ViewOptions,
    },
    Sync {
        source: Option<String>,
        target: Option<String>,
        paths: Vec<String>,
    },
    Remember {
        source: String,
        target: String,
    },
    Browse {
        path: Option<String>,
    },
}

#[derive(Debug, PartialEq)]
struct Cli {
    server: Option<String>,
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let server = cli
        .server
        .or_else(|| env::var("MUSICSYNC_SERVER").ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let timeout = env::var("MUSICSYNC_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(30);
    let service = HttpAlbumService::new(&server, Duration::from_secs(timeout))?;

    match cli.command {
        Command::Remember { source, target } => {
            let settings = AppSettings {
                last_source_directory: source,
                last_target_directory: target,
            };
            service.save_settings(&settings).await?;
            println!(
                "Saved source {} and target {}",
                settings.last_source_directory, settings.last_target_directory
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Browse { path: None } => {
            for drive in service.drives().await? {
                println!("{}", drive);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Browse { path: Some(path) } => {
            for item in service.browse(&path).await? {
                let kind = if item.is_directory { "dir " } else { "file" };
                println!("{} {}", kind, item.path);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Status {
            source,
            target,
            options,
        } => {
            let (source, target) = resolve_dirs(&service, source, target).await?;
            let mut session = Session::new(service);
            session.options = options;
            if let Some(target) = target.as_deref() {
                session.set_target(target).await?;
            }
            if let Err(err) = session.scan(&source).await {
                eprintln!("scan of {} failed: {}", source, err);
                return Ok(ExitCode::FAILURE);
            }
            print_status(&session);
            Ok(ExitCode::SUCCESS)
        }
        Command::Sync {
            source,
            target,
            paths,
        } => {
            let (source, target) = resolve_dirs(&service, source, target).await?;
            let mut session = Session::new(service);
            if let Some(target) = target.as_deref() {
                session.set_target(target).await?;
            }
            if let Err(err) = session.scan(&source).await {
                eprintln!("scan of {} failed: {}", source, err);
                return Ok(ExitCode::FAILURE);
            }
            for path in &paths {
                if !session.catalog().iter().any(|album| &album.path == path) {
                    warn!("{} is not an album under {}", path, source);
                }
                if !session.selection().contains(path) {
                    session.toggle(path);
                }
            }
            println!("Selected: {}", session.stats());
            if session.needs_unsync() {
                println!("Some selected albums are already on the target and will be removed.");
            }

            let progress = session.progress();
            let watcher = tokio::spawn(async move {
                let mut last = progress.get();
                loop {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    let current = progress.get();
                    if current != last && !current.is_idle() {
                        info!("Processing {}", current);
                    }
                    last = current;
                }
            });
            let result = session.run_sync().await;
            watcher.abort();

            match result {
                Ok(summary) => {
                    println!("{}", summary);
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{}", err);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Fills `-` or missing directories from the settings saved on the server.
async fn resolve_dirs(
    service: &HttpAlbumService,
    source: Option<String>,
    target: Option<String>,
) -> Result<(String, Option<String>), Box<dyn std::error::Error>> {
    let saved = if source.is_none() || target.is_none() {
        service.load_settings().await?
    } else {
        AppSettings::default()
    };
    let source = source
        .or_else(|| non_blank(saved.last_source_directory.clone()))
        .ok_or("no source directory given and none saved")?;
    let target = target.or_else(|| non_blank(saved.last_target_directory));
    Ok((source, target))
}

fn print_status<S: engine::AlbumService>(session: &Session<S>) {
    let view = session.view();
    for album in &view {
        let marker = if album.is_synced { "[x]" } else { "[ ]" };
        println!(
            "{} {} - {} ({} mp3, {:.1} MB)  {}",
            marker, album.artist, album.album, album.track_count, album.size_mb, album.path
        );
    }
    let synced = session
        .catalog()
        .iter()
        .filter(|album| album.is_synced)
        .count();
    println!(
        "{} of {} albums shown, {} on target",
        view.len(),
        session.catalog().len(),
        synced
    );
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Cli, String> {
    let mut server = None;
    let mut options = ViewOptions::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => server = Some(args.next().ok_or("--server needs a URL")?),
            "--search" => options.search = args.next().ok_or("--search needs a term")?,
            "--sort" => {
                let value = args.next().ok_or("--sort needs a key")?;
                options.sort_key =
                    SortKey::parse(&value).ok_or_else(|| format!("unknown sort key {}", value))?;
            }
            "--desc" => options.sort_dir = SortDir::Desc,
            "--all" => options.mp3_only = false,
            "--synced" => options.synced_only = true,
            "-h" | "--help" => return Err("musicsync: copy albums to a portable target".to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = positional.next().ok_or("missing command")?;
    let source = positional.next().and_then(non_blank);
    let target = positional.next().and_then(non_blank);

    let command = match command.as_str() {
        "status" => Command::Status {
            source,
            target,
            options,
        },
        "sync" => {
            let paths: Vec<String> = positional.collect();
            if paths.is_empty() {
                return Err("sync needs at least one album path".to_string());
            }
            Command::Sync {
                source,
                target,
                paths,
            }
        }
        "remember" => Command::Remember {
            source: source.ok_or("remember needs a source directory")?,
            target: target.ok_or("remember needs a target directory")?,
        },
        "browse" => Command::Browse { path: source },
        other => return Err(format!("unknown command {}", other)),
    };
    Ok(Cli { server, command })
}
