use std::path::PathBuf;

use anyhow::Context;
use bookshelf_app::book::{query, BookDto, BookStore};
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Bookshelf catalog service and offline query tool
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// Collection document to read instead of the configured one
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    #[command(flatten)]
    Query(QueryCommand),
}

#[derive(Debug, Subcommand)]
enum QueryCommand {
    /// Print stored books, optionally filtered
    List {
        /// Keep books whose author contains this text, ignoring case
        #[arg(long)]
        author: Option<String>,
        /// Keep books whose title contains this text, ignoring case
        #[arg(long)]
        title: Option<String>,
        /// Order by rating, highest first
        #[arg(long)]
        sorted: bool,
    },
    /// Print the highest rated book
    TopRated,
    /// Print the book with the most copies sold
    MostPopular,
    /// Print the largest copies-sold figure among an author's books
    CopiesSold {
        #[arg(long)]
        author: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_query(command: QueryCommand, settings: &Settings) -> anyhow::Result<()> {
    let path = settings.storage.file_path();
    let store =
        BookStore::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    let books = store.all();

    match command {
        QueryCommand::List {
            author,
            title,
            sorted,
        } => {
            let mut selected = query::all(books);
            if let Some(author) = author {
                selected = query::by_author(&selected, &author);
            }
            if let Some(title) = title {
                selected = query::search_by_title(&selected, &title);
            }
            if sorted {
                selected = query::sorted_by_rating(&selected);
            }
            tracing::debug!(count = selected.len(), "books selected");
            let out: Vec<BookDto> = selected.into_iter().map(BookDto::from).collect();
            print_json(&out)
        }
        QueryCommand::TopRated => print_json(&BookDto::from(query::top_rated(books)?)),
        QueryCommand::MostPopular => print_json(&BookDto::from(query::most_popular(books)?)),
        QueryCommand::CopiesSold { author } => {
            print_json(&query::total_copies_sold_by_author(books, &author)?)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    if let Some(path) = &cli.data_file {
        settings.storage.data_dir = path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        if let Some(name) = path.file_name() {
            settings.storage.file_name = name.to_string_lossy().into_owned();
        }
    }

    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(bookshelf_app::run(settings))
        }
        Command::Query(command) => run_query(command, &settings),
    }
}
