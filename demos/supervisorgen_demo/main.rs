//! # supervisorgen demo application
//!
//! A sample CLI that wires [supervisorgen](https://docs.rs/supervisorgen) into
//! a real binary. It exists to demonstrate and manually verify the crate's
//! features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example supervisorgen_demo -- showcase
//! cargo run --example supervisorgen_demo -- generate render demos/supervisorgen_demo/services.toml
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                         |
//! |--------------------------|----------------------------------------------------------------------------|
//! | Builder API              | `showcase`                                                                 |
//! | Legacy policy            | `showcase --policy non-default`                                            |
//! | Manifest rendering       | `generate render demos/supervisorgen_demo/services.toml`                   |
//! | Write to file            | `generate render demos/supervisorgen_demo/services.toml -o /tmp/svc.conf`  |
//! | Manifest validation      | `generate check demos/supervisorgen_demo/services.toml`                    |
//! | Env var settings         | `SUPERVISORGEN__POLICY=non-default ... generate render ...`                |
//! | Settings template        | `generate template`                                                        |
//! | Tracing output           | `RUST_LOG=supervisorgen=trace ... showcase`                                |

mod programs;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use supervisorgen::{GenerateArgs, RenderPolicy, Renderer, Supervisorgen};

/// supervisorgen demo: render supervisord configs from code or manifests.
#[derive(Parser, Debug)]
#[command(name = "supervisorgen-demo")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a cluster built with the Rust API.
    Showcase {
        /// Which optional fields to render.
        #[arg(long, value_enum, default_value = "explicit")]
        policy: RenderPolicy,
    },
    /// Render, check or template via manifests and settings.
    Generate(GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Showcase { policy } => {
            let group = programs::cluster().unwrap_or_else(|e| {
                eprintln!("Failed to build cluster:\n{e}");
                std::process::exit(1);
            });
            let text = Renderer::new(policy)
                .render_group(&group)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to render:\n{e}");
                    std::process::exit(1);
                });
            print!("{text}");
        }
        Commands::Generate(args) => {
            let mut builder = Supervisorgen::builder()
                .strict(!args.lenient)
                .override_policy(args.policy)
                .override_command_dir(args.command_dir.clone());
            if let Some(path) = &args.settings {
                builder = builder.settings_file(path);
            }

            let action = args.into_action();
            builder.handle_and_print(&action).unwrap_or_else(|e| {
                eprintln!("Generator error:\n{e}");
                std::process::exit(1);
            });
        }
    }
}
