//! kvdb CLI Client
//!
//! Command-line interface for interacting with kvdb.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kvdb::backup::overview;
use kvdb::network::Client;

/// kvdb CLI
#[derive(Parser, Debug)]
#[command(name = "kvdb-cli")]
#[command(about = "CLI for the kvdb key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5511")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one query, e.g. `kvdb-cli query GET users.alice`
    Query {
        /// Query words, joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Read queries from stdin, one per line
    Repl,

    /// Print a snapshot file as a tree
    Overview {
        /// Snapshot file
        #[arg(short, long, env = "KVDB_DATABASE")]
        database: PathBuf,
    },

    /// Print the version
    Version,
}

fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Query { query } => run_query(&args.server, &query.join(" ")),
        Commands::Repl => run_repl(&args.server),
        Commands::Overview { database } => {
            overview(&database).map(|tree| print!("{}", tree))
        }
        Commands::Version => {
            println!("kvdb version: {}", kvdb::VERSION);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run_query(server: &str, query: &str) -> kvdb::Result<()> {
    let mut client = Client::connect(server)?;
    println!("{}", client.query(query)?);
    Ok(())
}

fn run_repl(server: &str) -> kvdb::Result<()> {
    let mut client = Client::connect(server)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "kvdb> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            writeln!(stdout, "{}", client.query(&line)?)?;
        }
        write!(stdout, "kvdb> ")?;
        stdout.flush()?;
    }

    writeln!(stdout)?;
    Ok(())
}
