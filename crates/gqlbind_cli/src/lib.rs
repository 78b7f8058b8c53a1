//! Command-line interface for gqlbind.
//!
//! # Usage
//!
//! ```bash
//! # Generate bindings for every language
//! gqlbind generate schema/*.graphql --out generated --tables tables.json
//!
//! # Only Kotlin and Swift, without forthcoming declarations
//! gqlbind generate schema/*.graphql --out generated --lang kotlin,swift --exclude-future
//!
//! # Validate a schema
//! gqlbind check schema/*.graphql
//!
//! # Dump the intermediate representation
//! gqlbind ir schema/*.graphql > ir.json
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use gqlbind_codegen::{CodeGenerator, CodegenOptions, GeneratedFile, Language};
use gqlbind_ir::{IrSchema, Tables};
use miette::{IntoDiagnostic, Report};
use std::path::{Path, PathBuf};

/// Exit code for schema, table or transform errors.
pub const EXIT_INVALID_SCHEMA: i32 = 1;
/// Exit code when at least one language failed to generate.
pub const EXIT_PLUGIN_FAILED: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "gqlbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug events
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate bindings from GraphQL schema files
    Generate {
        /// Schema files, concatenated in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Target languages (defaults to all)
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<Language>,

        /// Lookup tables (legacy aliases, platform defaults, custom inputs)
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Leave out declarations marked `# Future`
        #[arg(long)]
        exclude_future: bool,

        /// Omit the "generated, do not edit" header
        #[arg(long)]
        no_header: bool,

        /// Package or module name for languages that declare one
        #[arg(long)]
        package: Option<String>,
    },

    /// Parse and validate schema files without generating anything
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// Print the intermediate representation as JSON
    Ir {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Leave out declarations marked `# Future`
        #[arg(long)]
        exclude_future: bool,
    },

    /// List supported languages
    Languages,

    /// Print version information
    Version,
}

/// Runs a parsed command line and returns the process exit code.
pub fn run(cli: Cli) -> miette::Result<i32> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Generate {
            files,
            out,
            lang,
            tables,
            exclude_future,
            no_header,
            package,
        } => {
            let languages = if lang.is_empty() {
                Language::ALL.to_vec()
            } else {
                dedup(lang)
            };
            let options = CodegenOptions {
                include_future: !exclude_future,
                header: !no_header,
                package,
            };
            Ok(generate(&files, tables.as_deref(), &out, &languages, options, quiet))
        }
        Commands::Check { files, tables } => Ok(check(&files, tables.as_deref(), quiet)),
        Commands::Ir {
            files,
            tables,
            exclude_future,
        } => dump_ir(&files, tables.as_deref(), exclude_future),
        Commands::Languages => {
            for language in Language::ALL {
                let plugin = gqlbind_codegen::plugin_for(language);
                println!("{:<12} {}", language.as_str(), plugin.file_name().dimmed());
            }
            Ok(0)
        }
        Commands::Version => {
            println!("gqlbind {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

/// Parses, validates and lowers the schema. Failures are reported on
/// stderr and come back as the exit code.
pub fn load(files: &[PathBuf], tables: Option<&Path>) -> Result<(IrSchema, Tables), i32> {
    let tables = match tables {
        Some(path) => Tables::load(path).map_err(report)?,
        None => Tables::default(),
    };
    let (schema, markers) = gqlbind_syntax::parse(files).map_err(report)?;
    let ir = gqlbind_ir::transform(&schema, &markers, &tables).map_err(report)?;
    Ok((ir, tables))
}

fn report(err: impl miette::Diagnostic + Send + Sync + 'static) -> i32 {
    eprintln!("{:?}", Report::new(err));
    EXIT_INVALID_SCHEMA
}

fn dedup(languages: Vec<Language>) -> Vec<Language> {
    let mut seen = Vec::with_capacity(languages.len());
    for language in languages {
        if !seen.contains(&language) {
            seen.push(language);
        }
    }
    seen
}

fn generate(
    files: &[PathBuf],
    tables: Option<&Path>,
    out: &Path,
    languages: &[Language],
    options: CodegenOptions,
    quiet: bool,
) -> i32 {
    let (ir, tables) = match load(files, tables) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let generator = CodeGenerator::new(&ir, &tables).with_options(options);
    let mut failed = 0;
    for outcome in generator.generate_all(languages) {
        let written = outcome
            .result
            .and_then(|file| gqlbind_codegen::write_output(out, &file).map(|path| (file, path)));
        match written {
            Ok((file, path)) => {
                if !quiet {
                    print_summary(&file, &path);
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} {}", "Failed".red().bold(), outcome.language);
                eprintln!("{:?}", Report::new(err));
            }
        }
    }

    if failed > 0 {
        tracing::warn!(failed, total = languages.len(), "some languages failed");
        EXIT_PLUGIN_FAILED
    } else {
        0
    }
}

fn print_summary(file: &GeneratedFile, path: &Path) {
    println!(
        "{} {:<10} {} ({})",
        "Generated".green(),
        file.language.as_str(),
        path.display(),
        file.summary.to_string().dimmed()
    );
}

fn check(files: &[PathBuf], tables: Option<&Path>, quiet: bool) -> i32 {
    match load(files, tables) {
        Ok((ir, _)) => {
            if !quiet {
                println!(
                    "{} {} file(s) checked ({})",
                    "Success:".green().bold(),
                    files.len(),
                    gqlbind_codegen::Summary::of(&ir)
                );
                let future = ir.future_types();
                if !future.is_empty() {
                    println!("{} {}", "Future:".yellow(), future.join(", "));
                }
            }
            0
        }
        Err(code) => code,
    }
}

fn dump_ir(files: &[PathBuf], tables: Option<&Path>, exclude_future: bool) -> miette::Result<i32> {
    let ir = match load(files, tables) {
        Ok((ir, _)) if exclude_future => ir.without_future(),
        Ok((ir, _)) => ir,
        Err(code) => return Ok(code),
    };
    let json = serde_json::to_string_pretty(&ir).into_diagnostic()?;
    println!("{json}");
    Ok(0)
}
