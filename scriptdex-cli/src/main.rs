//! scriptdex CLI - query a script symbol index from the command line

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use scriptdex_core::{
    Category, Config, IndexReader, MemberDescriptor, MemberKind, RawRecord, ScriptdexError,
    SqliteIndex, TypeDescriptor,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scriptdex")]
#[command(about = "Query a content-assist symbol index", long_about = None)]
struct Cli {
    /// Index database file
    #[arg(long, global = true, env = "SCRIPTDEX_DB", default_value = "scriptdex.db")]
    db: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "SCRIPTDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load records from a JSON-lines file ({"category", "word", "documents"} per line)
    Import {
        /// File to read
        file: PathBuf,
    },

    /// List the names of all indexed types
    Types,

    /// Show the records of one type
    Type {
        /// Type name (Array<T> resolves to Array)
        name: String,

        /// Attach properties, functions and events
        #[arg(short, long)]
        members: bool,
    },

    /// List members owned by one or more types
    Members {
        /// Owning type names
        #[arg(required = true)]
        types: Vec<String>,

        /// Restrict to one kind of member
        #[arg(short, long, value_enum)]
        kind: Option<MemberKindArg>,

        /// Exact, case-sensitive member name (uses the first type only)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List the supertypes of a type, nearest first
    Ancestors {
        /// Type name
        name: String,
    },

    /// List the modules a document requires
    Requires {
        /// Document identifier as recorded by the indexer
        document: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MemberKindArg {
    Property,
    Function,
    Event,
}

impl From<MemberKindArg> for Category {
    fn from(kind: MemberKindArg) -> Self {
        match kind {
            MemberKindArg::Property => Category::Property,
            MemberKindArg::Function => Category::Function,
            MemberKindArg::Event => Category::Event,
        }
    }
}

/// One line of an import file
#[derive(Debug, Deserialize)]
struct ImportLine {
    category: Category,
    #[serde(flatten)]
    record: RawRecord,
}

#[derive(Serialize)]
struct ImportStats {
    records: usize,
    entries: usize,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        init_tracing(&config);
        run(&cli, &config)
    });

    if let Err(e) = result {
        if cli.json {
            let error_json = serde_json::json!({ "code": error_code(&e), "message": e.to_string() });
            eprintln!("{error_json:#}");
        } else {
            eprintln!("{}: {}", "Error".red(), e);
        }
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> scriptdex_core::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("SCRIPTDEX_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, config: &Config) -> scriptdex_core::Result<()> {
    let index = SqliteIndex::open(&cli.db)?;
    let reader = IndexReader::from_config(config);

    match &cli.command {
        Commands::Import { file } => cmd_import(&index, file, cli.json),
        Commands::Types => cmd_types(&reader, &index, cli.json),
        Commands::Type { name, members } => cmd_type(&reader, &index, name, *members, cli.json),
        Commands::Members { types, kind, name } => {
            cmd_members(&reader, &index, types, *kind, name.as_deref(), cli.json)
        }
        Commands::Ancestors { name } => cmd_ancestors(&reader, &index, name, cli.json),
        Commands::Requires { document } => cmd_requires(&reader, &index, document, cli.json),
    }
}

fn cmd_import(index: &SqliteIndex, file: &Path, json: bool) -> scriptdex_core::Result<()> {
    if !file.exists() {
        return Err(ScriptdexError::FileNotFound(file.to_path_buf()));
    }
    let content = std::fs::read_to_string(file)?;

    let lines = parse_import(&content)?;
    index.add_records(import_triples(&lines))?;

    let stats = ImportStats {
        records: lines.len(),
        entries: index.entry_count()?,
    };
    tracing::info!(records = stats.records, entries = stats.entries, "import finished");

    if json {
        print_json(&stats)
    } else {
        println!(
            "{}: {} records ({} entries in index)",
            "Imported".green(),
            stats.records,
            stats.entries
        );
        Ok(())
    }
}

/// Parse the lines of an import file. Blank lines are skipped; any other
/// line that is not an import record fails the whole import.
fn parse_import(content: &str) -> scriptdex_core::Result<Vec<ImportLine>> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| serde_json::from_str::<ImportLine>(line).map_err(ScriptdexError::from))
        .collect()
}

/// One (category, word, document) entry per document of each line
fn import_triples(lines: &[ImportLine]) -> impl Iterator<Item = (Category, &str, &str)> + '_ {
    lines.iter().flat_map(|line| {
        line.record
            .documents
            .iter()
            .map(move |doc| (line.category, line.record.word.as_str(), doc.as_str()))
    })
}

fn cmd_types(reader: &IndexReader, index: &SqliteIndex, json: bool) -> scriptdex_core::Result<()> {
    let names = reader.type_names(index)?;

    if json {
        return print_json(&names);
    }
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

fn cmd_type(
    reader: &IndexReader,
    index: &SqliteIndex,
    name: &str,
    members: bool,
    json: bool,
) -> scriptdex_core::Result<()> {
    let types = reader.get_type(index, name, members)?;

    if json {
        return print_json(&types);
    }
    if types.is_empty() {
        println!("{} {}", "No type named".yellow(), name);
    }
    for ty in &types {
        print_type(ty);
    }
    Ok(())
}

fn cmd_members(
    reader: &IndexReader,
    index: &SqliteIndex,
    types: &[String],
    kind: Option<MemberKindArg>,
    name: Option<&str>,
    json: bool,
) -> scriptdex_core::Result<()> {
    let categories = match kind {
        Some(kind) => vec![Category::from(kind)],
        None => vec![Category::Property, Category::Function, Category::Event],
    };

    let mut members = Vec::new();
    for category in categories {
        match (name, types.first()) {
            (Some(name), Some(owner)) => {
                members.extend(reader.members_named(index, category, owner, name)?)
            }
            _ => members.extend(reader.members_for_types(index, category, types)?),
        }
    }

    if json {
        return print_json(&members);
    }
    for member in &members {
        print_member(member, "");
    }
    Ok(())
}

fn cmd_ancestors(
    reader: &IndexReader,
    index: &SqliteIndex,
    name: &str,
    json: bool,
) -> scriptdex_core::Result<()> {
    let ancestors = reader.type_ancestors(index, name)?;

    if json {
        return print_json(&ancestors);
    }
    for ancestor in &ancestors {
        println!("{ancestor}");
    }
    Ok(())
}

fn cmd_requires(
    reader: &IndexReader,
    index: &SqliteIndex,
    document: &str,
    json: bool,
) -> scriptdex_core::Result<()> {
    let requires = reader.requires_for_location(index, document)?;

    if json {
        return print_json(&requires);
    }
    for path in &requires {
        println!("{path}");
    }
    Ok(())
}

fn print_type(ty: &TypeDescriptor) {
    let parents = if ty.parent_types.is_empty() {
        String::new()
    } else {
        format!(" : {}", ty.parent_types.join(", "))
    };
    println!("{}{}", ty.name.bold(), parents.dimmed());
    if let Some(description) = &ty.description {
        println!("  {description}");
    }
    println!("  {} {}", "documents:".dimmed(), ty.documents.join(", "));

    for member in ty.properties.iter().chain(&ty.events) {
        print_member(member, "  ");
    }
}

fn print_member(member: &MemberDescriptor, indent: &str) {
    let detail = match &member.kind {
        MemberKind::Property(p) => p.types.join("|"),
        MemberKind::Function(f) => {
            let returns = f.return_types.join("|");
            if returns.is_empty() {
                f.signature(&member.name)
            } else {
                format!("{} -> {}", f.signature(&member.name), returns)
            }
        }
        MemberKind::Event(e) => e
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    };

    println!(
        "{indent}{:<8} {}.{} {}",
        member.category().as_str().cyan(),
        member.owning_type,
        member.name.bold(),
        detail.dimmed()
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> scriptdex_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn error_code(e: &ScriptdexError) -> &'static str {
    match e {
        ScriptdexError::InvalidPattern { .. } => "invalid_pattern",
        ScriptdexError::UnknownCategory(_) => "unknown_category",
        ScriptdexError::Database(_) => "database",
        ScriptdexError::Io(_) | ScriptdexError::FileNotFound(_) => "io",
        ScriptdexError::ConfigParse(_) => "config",
        ScriptdexError::SchemaVersionMismatch { .. } => "schema_version",
        ScriptdexError::Backend(_) => "backend",
        ScriptdexError::Serialization(_) => "serialization",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPORT: &str = concat!(
        r#"{"category":"type","word":"Widget\u0000\u0000A UI widget","documents":["lib/widget.js"]}"#,
        "\n\n",
        r#"{"category":"PROPERTY","word":"Widget\u0000visible\u0000Boolean","documents":["lib/widget.js","lib/legacy.js"]}"#,
        "\n",
    );

    #[test]
    fn test_parse_import_lines() {
        let lines = parse_import(IMPORT).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].category, Category::Type);
        assert_eq!(lines[0].record.word, "Widget\0\0A UI widget");
        assert_eq!(lines[0].record.documents, vec!["lib/widget.js"]);
        assert_eq!(lines[1].category, Category::Property);
    }

    #[test]
    fn test_import_triples_one_per_document() {
        let lines = parse_import(IMPORT).unwrap();
        let triples: Vec<_> = import_triples(&lines).collect();

        assert_eq!(
            triples,
            vec![
                (Category::Type, "Widget\0\0A UI widget", "lib/widget.js"),
                (Category::Property, "Widget\0visible\0Boolean", "lib/widget.js"),
                (Category::Property, "Widget\0visible\0Boolean", "lib/legacy.js"),
            ]
        );

        let index = SqliteIndex::open_in_memory().unwrap();
        index.add_records(import_triples(&lines)).unwrap();
        assert_eq!(index.entry_count().unwrap(), 2);

        let widget = IndexReader::default().get_type(&index, "Widget", true).unwrap();
        assert_eq!(widget[0].properties[0].documents, vec!["lib/widget.js", "lib/legacy.js"]);
    }

    #[test]
    fn test_malformed_import_line_rejected() {
        for bad in [
            "not json",
            r#"{"category":"module","word":"x","documents":[]}"#,
            r#"{"category":"type","documents":["a.js"]}"#,
        ] {
            let err = parse_import(bad).unwrap_err();
            assert!(matches!(err, ScriptdexError::Serialization(_)), "{bad}");
        }
    }
}
