use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use codesage::config::Config;
use codesage::display;
use codesage::language::Language;
use codesage::session::Session;

#[derive(Parser)]
#[command(
    name = "codesage",
    version,
    about = "AI-powered code analysis and generation from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a source file for errors, warnings, and improvements
    Analyze {
        /// File to analyze
        file: PathBuf,
        /// Language of the file (inferred from the extension when omitted)
        #[arg(short, long)]
        language: Option<Language>,
    },
    /// Generate code from a natural-language description
    Generate {
        /// What the code should do
        description: String,
        /// Target language
        #[arg(short, long)]
        language: Language,
        /// Write the generated code to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Store the API key for the AI gateway
    Key {
        /// The API key
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default()?;
    let default_language = config.display.default_language;
    let mut session = Session::new(config);

    match cli.command {
        Command::Key { api_key } => {
            session.set_credential(api_key);
            session.persist()?;
            println!("{}", "API key saved.".green());
        }

        Command::Analyze { file, language } => {
            let code = std::fs::read_to_string(&file)?;
            let language = language
                .or_else(|| {
                    file.extension()
                        .and_then(|ext| ext.to_str())
                        .and_then(Language::from_extension)
                })
                .or(default_language)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "could not infer the language of {}; pass --language",
                        file.display()
                    )
                })?;

            session.set_language(language);
            session.set_code(code);

            match session.analyze().await {
                Ok(report) => print!("{}", display::render_report(&report)),
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }

        Command::Generate {
            description,
            language,
            output,
        } => {
            session.set_language(language);

            match session.generate(&description).await {
                Ok(code) => match output {
                    Some(path) => {
                        std::fs::write(&path, &code)?;
                        println!("Wrote {}", path.display());
                    }
                    None => println!("{}", code),
                },
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
