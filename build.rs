// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("appdex")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Appdex Contributors")
        .about("App catalog with fallback metadata resolution from the Play Store")
        .subcommand_required(false)
        .subcommand(
            Command::new("init")
                .about("Initialize the Appdex catalog database")
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .value_name("PATH")
                        .default_value("/var/lib/appdex/appdex.db")
                        .help("Database path"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve metadata for a package id or Play Store URL")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("Package id (e.g. com.example.app) or store URL"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Resolve metadata and add the record to the catalog")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("Package id (e.g. com.example.app) or store URL"),
                )
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .default_value("/var/lib/appdex/appdex.db"),
                )
                .arg(
                    Arg::new("tags")
                        .short('t')
                        .long("tags")
                        .help("Comma-separated tags for the new record"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List catalog records in insertion order")
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .default_value("/var/lib/appdex/appdex.db"),
                ),
        )
        .subcommand(
            Command::new("latest")
                .about("List catalog records newest-first by update date")
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .default_value("/var/lib/appdex/appdex.db"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search the catalog by name, package id, or developer")
                .arg(Arg::new("query").required(true).help("Search query"))
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .default_value("/var/lib/appdex/appdex.db"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show a single catalog record as JSON")
                .arg(Arg::new("id").required(true).help("Record id"))
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .default_value("/var/lib/appdex/appdex.db"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("appdex.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
