use std::{fmt::Display, process::exit};

use clap::{Parser, Subcommand};
use dep_installer::{output::now, ConsoleOutput, DependencyInstaller, InstallOptions};

fn main() {
    dotenv::dotenv().ok();

    let opts = CliOpts::parse();
    let output = ConsoleOutput::new(opts.verbose, opts.quiet);

    let res = DependencyInstaller::new(&opts.manifest, output)
        .and_then(|mut installer| match &opts.command {
            Command::Package { name, version, dev, no_update, keep_version } => {
                let options = InstallOptions {
                    update_if_exists: !no_update,
                    allow_override_version: !keep_version,
                };

                installer.install_package(name, version, *dev, options).map(|_| ())
            },
            Command::Repository { name, kind, url } =>
                installer.install_repository(name, kind, url),
        });

    if let Err(e) = res {
        log(format!("Updating {} failed: {e}", opts.manifest));
        exit(-1)
    }
}

#[derive(Parser, Clone)]
#[command(author, version, about)]
struct CliOpts {
    #[arg(short, long, env, default_value = "composer.json",
        help = "The manifest file to edit.")]
    manifest: String,

    #[arg(short, long, env, default_value_t = false,
        help = "Also report entries that were left untouched.")]
    verbose: bool,

    #[arg(short, long, env, default_value_t = false,
        help = "Only report failures.")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Require a package
    Package {
        name: String,

        #[arg(help = "Version constraint, e.g. ^2.0 or @stable")]
        version: String,

        #[arg(short, long, default_value_t = false,
            help = "Add to require-dev instead of require.")]
        dev: bool,

        #[arg(long, default_value_t = false,
            help = "Leave the package alone if it is already required.")]
        no_update: bool,

        #[arg(long, default_value_t = false,
            help = "Never replace the version constraint of an already required package.")]
        keep_version: bool,
    },

    /// Add or replace a package repository
    Repository {
        name: String,

        #[arg(value_name = "TYPE")]
        kind: String,

        url: String,
    },
}

fn log<M: Display>(msg: M) {
    eprintln!("{} {msg}", now());
}
