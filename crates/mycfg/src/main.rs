mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use mycfg_core::ini::EncodeOptions;
use mycfg_core::{ini, json, Config, Error, Result, Value};

/// mycfg: read and write hierarchical INI/JSON configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Config file to use (.ini or .json); defaults to the per-user config.ini
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    /// Config name, used to locate the per-user config directory
    #[arg(long, short, default_value = "mycfg", global = true)]
    name: String,

    /// Treat a missing config file as empty
    #[arg(long, global = true)]
    ignore_missing: bool,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value at a dotted path as JSON
    Get {
        /// Dotted path, e.g. `server.port`; `.` prints the whole config
        key: String,
    },
    /// Set a value and save (`true`, `false` and `null` are typed)
    Set {
        key: String,
        value: String,
    },
    /// Delete a value and save
    Delete {
        key: String,
    },
    /// Print the whole config
    Dump {
        #[arg(long, value_enum, default_value_t = DumpFormat::Ini)]
        format: DumpFormat,
        /// Sort keys (INI only)
        #[arg(long)]
        sort: bool,
        /// Align `=` within each section (INI only)
        #[arg(long)]
        align: bool,
    },
    /// Print the config file path
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DumpFormat {
    Ini,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init_logging(args.verbose);
    debug!("parsed args: {:?}", args);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mycfg: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let file = args.file.as_deref();

    match args.command {
        Commands::Path => {
            let config = Config::new(args.name.as_str())?;
            let path = match file {
                Some(file) => file.to_path_buf(),
                None => config.config_path()?,
            };
            println!("{}", path.display());
        }
        Commands::Get { key } => {
            let config = Config::load(&args.name, file, args.ignore_missing).await?;
            let value = config
                .query(&key)
                .ok_or_else(|| missing_key(&key))?;
            println!("{}", value.to_json());
        }
        Commands::Set { key, value } => {
            // set creates the file when it is missing
            let mut config = Config::load(&args.name, file, true).await?;
            config.set(&key, Value::from_ini_scalar(&value));
            save(&mut config, file).await?;
        }
        Commands::Delete { key } => {
            let mut config = Config::load(&args.name, file, args.ignore_missing).await?;
            if !config.delete(&key) {
                return Err(missing_key(&key));
            }
            save(&mut config, file).await?;
        }
        Commands::Dump { format, sort, align } => {
            let config = Config::load(&args.name, file, args.ignore_missing).await?;
            match format {
                DumpFormat::Ini => {
                    let options = EncodeOptions {
                        sort,
                        align,
                        ..Default::default()
                    };
                    print!("{}", ini::encode(config.data(), &options));
                }
                DumpFormat::Json => println!("{}", json::encode(config.data())?),
            }
        }
    }

    Ok(())
}

async fn save(config: &mut Config, file: Option<&Path>) -> Result<()> {
    let dirty = config.dirty();
    config.save(file).await?;
    debug!("saved config '{}' ({} changed keys)", config.name(), dirty);
    Ok(())
}

fn missing_key(key: &str) -> Error {
    format!("key '{}' not found", key).into()
}
