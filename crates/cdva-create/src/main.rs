//! cdva-create - one command to scaffold a Cordova project
//!
//! Thin CLI over `cdva-core`: parses arguments, dispatches to the create,
//! config-edit, or help path, and maps every failure to exit code 1.

use anyhow::Result;
use cdva_core::config::{self, HostOs};
use cdva_core::cordova::ShellRunner;
use cdva_core::project::{self, CreateRequest};
use clap::Parser;
use colored::Colorize;
use std::process;

const USAGE: &str = "cdva-create folder app_id app_name [platform list]";
const HELP_TEXT: &str = include_str!("help.txt");
const CONFIG_TOKEN: &str = "/config";
const STARS: &str = "********************************";

/// Command-line surface
///
/// Three positional arguments (plus optional trailing platforms) scaffold a
/// project. The single argument `/config`, in any case, opens the settings
/// file instead. Any other shape prints the usage line and the bundled help
/// text, then exits with status 1.
#[derive(Parser, Debug)]
#[command(name = "cdva-create")]
#[command(about = "Creates a Cordova project with a configurable set of platforms and plugins")]
#[command(version)]
struct Args {
    /// Folder to create the project in, or "/config" to edit settings
    target_folder: Option<String>,

    /// Application ID in reverse-domain format (e.g. com.example.app)
    app_id: Option<String>,

    /// Application display name
    app_name: Option<String>,

    /// Platforms to add, overriding the configured platform list
    platforms: Vec<String>,
}

/// What a parsed command line asks the tool to do
#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Create(CreateRequest),
    EditConfig,
    Help,
}

fn dispatch(args: Args) -> Invocation {
    match (args.target_folder, args.app_id, args.app_name) {
        (Some(target_folder), Some(app_id), Some(app_name)) => Invocation::Create(CreateRequest {
            target_folder,
            app_id,
            app_name,
            platforms: args.platforms,
        }),
        (Some(token), None, None) if token.eq_ignore_ascii_case(CONFIG_TOKEN) => {
            Invocation::EditConfig
        }
        _ => Invocation::Help,
    }
}

fn run(invocation: Invocation) -> Result<()> {
    let os = HostOs::current();
    match invocation {
        Invocation::Create(request) => {
            let settings = config::load_default(os)?;
            project::create_project(&request, &settings, &mut ShellRunner)?;
        }
        Invocation::EditConfig => project::edit_config(os)?,
        Invocation::Help => {
            show_help();
            process::exit(1);
        }
    }
    Ok(())
}

fn show_help() {
    eprintln!();
    eprintln!(
        "{}",
        "Missing one or more parameters, the proper command format is:".red()
    );
    eprintln!("{}", format!("\n  {}\n", USAGE).red());
    println!("{}", HELP_TEXT);
}

fn banner() {
    println!();
    println!("{}", STARS.green());
    println!("{}", "* Cordova Create (cdva-create) *".green());
    println!("{}", STARS.green());
}

fn main() {
    let args = Args::parse();
    banner();

    if let Err(err) = run(dispatch(args)) {
        eprintln!("{}", format!("Error: {:#}", err).red());
        process::exit(1);
    }
}
