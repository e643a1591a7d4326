use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use labsheet_pdf::{
    Error, ExportOptions, Exporter, LaboratoryRecord, Language, RecordFields, RecordStore,
    fields_from_json, normalize_record,
};

#[derive(Parser)]
#[command(
    name = "labsheet-pdf",
    version,
    about = "Manage laboratory records and export them as PDF sheets"
)]
struct Cli {
    /// JSON file holding the record collection
    #[arg(long, global = true, default_value = "laboratories.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List stored records
    List,
    /// Add a record from a JSON object of fields
    Add {
        #[arg(long)]
        from: PathBuf,
    },
    /// Replace the fields of an existing record
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        from: PathBuf,
    },
    /// Delete a record
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Export a stored record to PDF
    Export {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Export a record read straight from a JSON file, without the store
    Render {
        #[arg(long)]
        from: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Institution logo (PNG or JPEG)
    #[arg(long, default_value = "assets/logo.png")]
    logo: PathBuf,
    /// Directory with per-faculty graphics named <BADGE>.png
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Font family to embed instead of Helvetica
    #[arg(long)]
    font: Option<String>,
}

impl From<RenderArgs> for ExportOptions {
    fn from(args: RenderArgs) -> Self {
        ExportOptions {
            output_dir: args.out,
            logo_path: Some(args.logo),
            faculty_assets_dir: args.assets,
            font_family: args.font,
            generated_on: None,
        }
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_fields(path: &Path) -> Result<RecordFields, Error> {
    let value = read_json(path)?;
    fields_from_json(&value)
}

/// A full record when the file has one, otherwise bare fields under a placeholder identity.
fn read_record(path: &Path) -> Result<LaboratoryRecord, Error> {
    let value = read_json(path)?;
    if let Some(record) = normalize_record(&value)
        && !record.id.is_empty()
    {
        return Ok(record);
    }
    let fields = fields_from_json(&value)?;
    Ok(LaboratoryRecord::new(
        "local".to_string(),
        chrono::Utc::now().to_rfc3339(),
        fields,
    ))
}

fn run(cli: Cli) -> Result<(), (Error, Language)> {
    let fail = |language: Language| move |e: Error| (e, language);
    let default_lang = Language::default();
    let mut store = RecordStore::open(&cli.store);

    match cli.command {
        Command::List => {
            for r in store.records() {
                println!(
                    "{}\t{}\t{}\t{}",
                    r.id, r.fields.code, r.fields.faculty, r.fields.name
                );
            }
        }
        Command::Add { from } => {
            let fields = read_fields(&from).map_err(fail(default_lang))?;
            let language = fields.language;
            let record = store.create(fields).map_err(fail(language))?;
            println!("{}", record.id);
        }
        Command::Update { id, from } => {
            let fields = read_fields(&from).map_err(fail(default_lang))?;
            let language = fields.language;
            store.update(&id, fields).map_err(fail(language))?;
        }
        Command::Delete { id } => {
            if !store.delete(&id).map_err(fail(default_lang))? {
                return Err((Error::RecordNotFound(id), default_lang));
            }
        }
        Command::Export { id, render } => {
            let record = store
                .get(&id)
                .cloned()
                .ok_or_else(|| (Error::RecordNotFound(id.clone()), default_lang))?;
            let path = Exporter::new()
                .export(&record, &render.into())
                .map_err(fail(record.language()))?;
            println!("{}", path.display());
        }
        Command::Render { from, render } => {
            let record = read_record(&from).map_err(fail(default_lang))?;
            let path = Exporter::new()
                .export(&record, &render.into())
                .map_err(fail(record.language()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err((e, language)) => {
            log::error!("{e}");
            eprintln!("{}", e.user_message(language));
            ExitCode::FAILURE
        }
    }
}
