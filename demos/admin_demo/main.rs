//! # adminfig demo application
//!
//! A small administration CLI over a site configuration file, for trying out
//! adminfig by hand.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example admin_demo -- --config-file site.toml info
//! cargo run --example admin_demo -- --config-file site.toml config save general.installed=on
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                        |
//! |------------------------|---------------------------------------------------------------------------|
//! | System information     | `cargo run --example admin_demo -- info`                                  |
//! | Show configuration     | `cargo run --example admin_demo -- config show`                           |
//! | Save (commit)          | `cargo run --example admin_demo -- config save database.host=db`          |
//! | Save (display only)    | `cargo run --example admin_demo -- config save --display general.installed=on` |
//! | Edits from JSON        | `cargo run --example admin_demo -- config save --json edits.json`         |
//! | Expire sessions        | `cargo run --example admin_demo -- expire-sessions`                       |
//! | Clear caches           | `clear-template-cache` / `clear-data-cache`                               |
//! | Token check            | `ADMIN_DEMO__ACCESS__TOKEN=s3cret ... --token s3cret info`                |
//! | Settings template      | `cargo run --example admin_demo -- --print-settings-template`             |
//! | Logging                | `RUST_LOG=adminfig=debug cargo run --example admin_demo -- info`          |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use adminfig::{AdminArgs, Adminfig, SearchPath, settings_template};

/// adminfig demo: site administration from the command line.
#[derive(Parser, Debug)]
#[command(name = "admin-demo")]
struct Cli {
    /// Site configuration file to administer (overrides `site.config_file`).
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    /// Admin token, required when `access.token` is configured.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Print a commented settings file for this tool and exit.
    #[arg(long)]
    print_settings_template: bool,

    #[command(flatten)]
    admin: AdminArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adminfig=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_settings_template {
        print!("{}", settings_template());
        return ExitCode::SUCCESS;
    }

    let result = cli.admin.into_action().and_then(|action| {
        Adminfig::builder()
            .app_name("admin-demo")
            .file_name("admin-demo.toml")
            .env_prefix("ADMIN_DEMO")
            .add_search_path(SearchPath::Cwd)
            .set_override(
                "site.config_file",
                cli.config_file.map(|p| p.display().to_string()),
            )
            .presented_token(cli.token)
            .handle_and_print(&action)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
