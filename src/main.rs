use clap::Parser;
use jotter::cli::{
    handle_add, handle_categories, handle_delete, handle_edit, handle_get, handle_list,
    handle_serve, Cli, Commands,
};
use jotter::Config;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { .. } => init_tracing("jotter=info,tower_http=info"),
        _ => init_tracing("jotter=warn"),
    }

    let notes_file = cli.notes_file;
    let result = match cli.command {
        Commands::Serve { host, port } => handle_serve(Config {
            notes_path: notes_file,
            host,
            port,
        }),
        Commands::List { json } => handle_list(&notes_file, json),
        Commands::Add {
            title,
            content,
            topics,
            categories,
            json,
        } => handle_add(&notes_file, title, content, topics, categories, json),
        Commands::Get { id, json } => handle_get(&notes_file, id, json),
        Commands::Edit {
            id,
            title,
            content,
            topics,
            categories,
            json,
        } => handle_edit(&notes_file, id, title, content, topics, categories, json),
        Commands::Delete { id } => handle_delete(&notes_file, id),
        Commands::Categories { json } => handle_categories(&notes_file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
