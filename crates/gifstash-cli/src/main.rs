use clap::{Parser, Subcommand};
use gifstash_client::{
    ClipboardSink, FileSink, HttpApi, NoticeLevel, Phase, SearchController,
};
use std::error::Error;
use std::io::{self, Write as _};

#[derive(Parser)]
#[command(name = "gifstash")]
#[command(about = "A CLI for searching GIFs and managing favorites")]
struct Cli {
    /// Base URL for the Gifstash service
    #[arg(long, default_value = "http://localhost:3000")]
    service_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for GIFs
    Search {
        /// Search term
        term: String,
        /// Results per page
        #[arg(short, long, default_value_t = 9)]
        limit: u32,
        /// Number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show currently trending GIFs
    Trending {
        /// Results per page
        #[arg(short, long, default_value_t = 9)]
        limit: u32,
    },
    /// List saved favorites
    Favorites,
    /// Add or remove a favorite from search results
    Toggle {
        /// Search term that surfaces the GIF
        term: String,
        /// GIF id to toggle
        gif_id: String,
    },
    /// Check whether a GIF is a favorite
    Check {
        /// GIF id to check
        gif_id: String,
    },
    /// Remove a favorite by GIF id
    Remove {
        /// GIF id to remove
        gif_id: String,
    },
    /// Copy a GIF's original URL (prints it to stdout)
    Copy {
        /// Search term that surfaces the GIF
        term: String,
        /// GIF id to copy
        gif_id: String,
    },
    /// Download a GIF's original rendition to the current directory
    Download {
        /// Search term that surfaces the GIF
        term: String,
        /// GIF id to download
        gif_id: String,
    },
}

/// Clipboard stand-in for a terminal: the URL goes to stdout.
struct TerminalClipboard;

impl ClipboardSink for TerminalClipboard {
    fn set_text(&mut self, text: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{text}")
    }
}

struct DiskSink;

impl FileSink for DiskSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(filename, bytes)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let api = HttpApi::new(cli.service_url.clone());

    match cli.command {
        Commands::Search { term, limit, pages } => {
            let mut controller = SearchController::with_limit(api, limit);
            controller.search(&term).await;
            for _ in 1..pages {
                if !controller.has_more() {
                    break;
                }
                controller.load_more().await;
            }
            controller.refresh_favorites().await;
            print_results(&mut controller)?;
        }
        Commands::Trending { limit } => {
            let mut controller = SearchController::with_limit(api, limit);
            controller.show_trending().await;
            controller.refresh_favorites().await;
            print_results(&mut controller)?;
        }
        Commands::Favorites => {
            let mut controller = SearchController::new(api);
            controller.refresh_favorites().await;
            drain_notices(&mut controller);
            for favorite in controller.favorites() {
                println!(
                    "{}  {}  {}",
                    favorite.gif_id,
                    favorite.gif_title.as_deref().unwrap_or("(untitled)"),
                    favorite.gif_url
                );
            }
        }
        Commands::Toggle { term, gif_id } => {
            let mut controller = SearchController::new(api);
            controller.search(&term).await;
            bail_on_error(&controller)?;
            controller.refresh_favorites().await;
            controller.toggle_favorite(&gif_id).await;
            drain_notices(&mut controller);
        }
        Commands::Check { gif_id } => {
            use gifstash_client::GifStashApi as _;
            let favorited = api.is_favorite(&gif_id).await?;
            println!("{favorited}");
        }
        Commands::Remove { gif_id } => {
            use gifstash_client::GifStashApi as _;
            if api.remove_favorite(&gif_id).await? {
                println!("Favorite removed");
            } else {
                eprintln!("No favorite with GIF id {gif_id}");
            }
        }
        Commands::Copy { term, gif_id } => {
            let mut controller = SearchController::new(api);
            controller.search(&term).await;
            bail_on_error(&controller)?;
            controller.copy_original(&gif_id, &mut TerminalClipboard);
            drain_notices(&mut controller);
        }
        Commands::Download { term, gif_id } => {
            let mut controller = SearchController::new(api);
            controller.search(&term).await;
            bail_on_error(&controller)?;
            controller.download_original(&gif_id, &mut DiskSink).await;
            drain_notices(&mut controller);
        }
    }

    Ok(())
}

fn print_results<A: gifstash_client::GifStashApi>(
    controller: &mut SearchController<A>,
) -> Result<(), Box<dyn Error>> {
    bail_on_error(controller)?;
    for view in controller.views() {
        let marker = if view.is_favorite { "*" } else { " " };
        println!(
            "{marker} {}  {}  {}",
            view.item.id,
            view.item.title.as_deref().unwrap_or("(untitled)"),
            view.item.images.original.url
        );
    }
    if controller.has_more() {
        println!("(more results available)");
    }
    drain_notices(controller);
    Ok(())
}

fn bail_on_error<A: gifstash_client::GifStashApi>(
    controller: &SearchController<A>,
) -> Result<(), Box<dyn Error>> {
    if controller.phase() == Phase::Errored {
        if let Some(message) = controller.last_error() {
            return Err(message.to_string().into());
        }
        return Err("request failed".into());
    }
    Ok(())
}

fn drain_notices<A: gifstash_client::GifStashApi>(controller: &mut SearchController<A>) {
    for notice in controller.take_notices() {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }
}
