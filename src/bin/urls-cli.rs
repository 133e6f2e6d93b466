use std::path::PathBuf;

use clap::{Parser, Subcommand};

use storefront_urls::apps::placeholder::placeholder_apps;
use storefront_urls::lifecycle::{load_startup_config, Overrides};
use storefront_urls::routing::{RequestContext, ReverseArgs};
use storefront_urls::urlconf::build_urlconf;

#[derive(Parser)]
#[command(name = "urls-cli")]
#[command(about = "Inspect the storefront URL configuration", long_about = None)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build the development-mode route table.
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table in match order
    Show,
    /// Reverse-resolve a route name
    Reverse {
        name: String,

        /// Positional argument (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Keyword argument as key=value (repeatable)
        #[arg(long = "kwarg", conflicts_with = "args")]
        kwargs: Vec<String>,

        /// Build an absolute URL for this host
        #[arg(long)]
        host: Option<String>,

        #[arg(long, default_value = "http")]
        scheme: String,
    },
    /// Validate config and route table, then exit
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        development_mode: cli.dev,
        bind_address: None,
    };

    let config = load_startup_config(cli.config.as_deref(), &overrides)?;
    let registry = build_urlconf(&config.site, &placeholder_apps())?;

    match cli.command {
        Commands::Show => {
            println!("{:<40} {:<24} {}", "PATTERN", "NAME", "MOUNT");
            for route in registry.routes() {
                println!(
                    "{:<40} {:<24} {}",
                    route.pattern().to_string(),
                    route.name().unwrap_or("-"),
                    route.mount()
                );
            }
        }
        Commands::Reverse {
            name,
            args,
            kwargs,
            host,
            scheme,
        } => {
            let reverse_args = if !kwargs.is_empty() {
                let pairs = kwargs
                    .iter()
                    .map(|kv| {
                        kv.split_once('=')
                            .ok_or_else(|| format!("expected key=value, got '{}'", kv))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ReverseArgs::keyword(pairs)
            } else if !args.is_empty() {
                ReverseArgs::positional(args)
            } else {
                ReverseArgs::none()
            };

            let resolver = registry.resolver();
            let url = match host {
                Some(host) => {
                    resolver.reverse(&name, &reverse_args, &RequestContext::new(scheme, host))?
                }
                None => resolver.reverse_path(&name, &reverse_args)?,
            };
            println!("{}", url);
        }
        Commands::Check => {
            println!(
                "OK: {} routes in {} mounts (development_mode = {})",
                registry.routes().len(),
                registry.mounts().len(),
                registry.development_mode()
            );
        }
    }

    Ok(())
}
