// ==========================================
// Asset import - CLI entry point
// ==========================================
// Commands: init-db, import, template, config
// DB path: --db, else ASSET_IMPORT_DB_PATH, else the user data dir
// ==========================================

use anyhow::Result;
use asset_import::api::{ApiError, ImportApi};
use asset_import::db::default_db_path;
use asset_import::{logging, CancelHandle};
use clap::Parser;
use std::path::PathBuf;

/// Bulk asset import
#[derive(Parser, Debug)]
#[command(name = "asset-import", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit JSON logs
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Create the asset tables
    InitDb {
        #[arg(long)]
        db: Option<String>,
    },
    /// Import a spreadsheet into a category table
    Import {
        #[arg(short, long)]
        category: String,
        file: PathBuf,
        #[arg(long)]
        db: Option<String>,
    },
    /// Write the header-only template of a category
    Template {
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Override an import setting (import.* keys)
    Config {
        key: String,
        value: String,
        #[arg(long)]
        db: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::info!("{} v{}", asset_import::APP_NAME, asset_import::VERSION);

    match cli.command {
        Commands::InitDb { db } => {
            let api = ImportApi::new(db.unwrap_or_else(default_db_path));
            let version = api.init_db()?;
            println!("Base de datos lista: {} (schema v{})", api.db_path(), version);
        }
        Commands::Import { category, file, db } => {
            let api = ImportApi::new(db.unwrap_or_else(default_db_path));

            let cancel = CancelHandle::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("cancelación solicitada");
                    on_signal.cancel();
                }
            });

            let file_path = file.to_string_lossy().to_string();
            match api
                .import_assets_with_cancel(&category, &file_path, cancel)
                .await
            {
                Ok(response) => {
                    println!("\n--- Resumen de importación ---");
                    println!("  Ejecución:   {}", response.run_id);
                    println!("  Tabla:       {}", response.table);
                    println!("  Filas:       {}", response.total_rows);
                    println!("  Insertadas:  {}", response.inserted);
                    if let (Some(first), Some(last)) =
                        (&response.first_assigned_id, &response.last_assigned_id)
                    {
                        println!("  IDs asignados: {} .. {}", first, last);
                    }
                    for warning in &response.warnings {
                        println!("  AVISO: {}", warning);
                    }
                    for v in &response.dq_violations {
                        println!("  fila {} [{:?}] {}: {}", v.row_number, v.level, v.field, v.message);
                    }
                    println!("  Tiempo:      {} ms", response.elapsed_ms);
                }
                Err(ApiError::ValidationError { message, violations }) => {
                    eprintln!("{}", message);
                    for v in &violations {
                        eprintln!("  fila {} [{:?}] {}: {}", v.row_number, v.level, v.field, v.message);
                    }
                    return Err(anyhow::anyhow!("importación rechazada"));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Template { category, out } => {
            let api = ImportApi::new(default_db_path());
            let response = api.export_template(&category, &out.to_string_lossy())?;
            println!(
                "Plantilla escrita: {} ({} columnas)",
                response.path, response.columns
            );
        }
        Commands::Config { key, value, db } => {
            let api = ImportApi::new(db.unwrap_or_else(default_db_path));
            api.set_config_value(&key, &value)?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}
