// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Arguments shared by `cook` and `flags`
fn build_args() -> Vec<Arg> {
    vec![
        Arg::new("recipe").required(true).help("Recipe name (boost, fmt, qt)"),
        Arg::new("profile")
            .short('p')
            .long("profile")
            .value_name("FILE")
            .help("Profile file with settings and option overrides"),
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help("Setting override, applied after the profile"),
        Arg::new("option")
            .short('o')
            .long("option")
            .value_name("NAME=BOOL")
            .action(ArgAction::Append)
            .help("Option override, applied after the profile"),
        Arg::new("source_repo")
            .long("source-repo")
            .value_name("DIR")
            .env("PANTRY_SOURCE_REPO")
            .help("Directory holding the source archives"),
        Arg::new("build_root")
            .long("build-root")
            .value_name("DIR")
            .help("Parent directory of working directories"),
        Arg::new("package_root")
            .long("package-root")
            .value_name("DIR")
            .help("Parent directory of package folders"),
        Arg::new("jobs")
            .short('j')
            .long("jobs")
            .value_name("N")
            .help("Number of parallel build jobs"),
        Arg::new("keep_builddir")
            .long("keep-builddir")
            .action(ArgAction::SetTrue)
            .help("Keep the working directory after a successful cook"),
    ]
}

fn build_cli() -> Command {
    Command::new("pantry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cook vendored C++ libraries from local source archives")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Kitchen config file"),
        )
        .subcommand(
            Command::new("cook")
                .about("Build a recipe and install it into its package folder")
                .args(build_args()),
        )
        .subcommand(
            Command::new("flags")
                .about("Print the command line of every lifecycle step (dry run)")
                .args(build_args()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show a recipe's metadata and declared options")
                .arg(Arg::new("recipe").required(true).help("Recipe name")),
        )
        .subcommand(Command::new("list").about("List known recipes"))
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pantry.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
