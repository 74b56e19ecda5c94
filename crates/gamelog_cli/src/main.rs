//! gamelog - terminal frontend for the game-review journal.
//!
//! # Responsibility
//! - Map subcommands onto the core browse/compose/backup services.
//! - Render the card and table list views in the terminal.

use clap::{Parser, Subcommand, ValueEnum};
use gamelog_core::model::markup;
use gamelog_core::{
    db, BrowseSession, KvReviewRepository, Review, ReviewComposer, ReviewId, ReviewPatch,
    SqliteKeyValueStore, ViewMode, PAGE_SIZE, RATING_MAX,
};
use log::debug;
use std::error::Error;
use std::path::PathBuf;
use std::process;

type Session = BrowseSession<KvReviewRepository<SqliteKeyValueStore>>;

/// gamelog - record and browse personal game reviews
#[derive(Parser, Debug)]
#[command(name = "gamelog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the database file (default: <data dir>/gamelog/gamelog.db)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log directory (default: <data dir>/gamelog/logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed empty storage and show collection stats
    Init,

    /// List reviews, one page at a time
    List {
        /// Page number, 1-based
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Display mode
        #[arg(short, long, value_enum, default_value_t = ViewArg::Cards)]
        view: ViewArg,
    },

    /// Show one review in full
    Show {
        /// Review id
        id: ReviewId,
    },

    /// Add a new review
    Add {
        /// Game title
        #[arg(short, long)]
        title: String,

        /// Review body (rich markup); defaults to the rubric template
        #[arg(short, long)]
        contents: Option<String>,

        /// Star rating, 1-5
        #[arg(short, long)]
        rating: Option<u8>,

        /// Cover image URL
        #[arg(short, long)]
        image_url: Option<String>,

        /// Print the external cover-search URL for the title and exit
        #[arg(long)]
        search_cover: bool,
    },

    /// Edit an existing review
    Edit {
        /// Review id
        id: ReviewId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        contents: Option<String>,

        /// Star rating, 0-5
        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        image_url: Option<String>,

        /// Clear the stored cover image URL
        #[arg(long, conflicts_with = "image_url")]
        clear_image: bool,
    },

    /// Delete a review
    Rm {
        /// Review id
        id: ReviewId,
    },

    /// Write a timestamped JSON backup
    Export {
        /// Target directory (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Replace the collection from a JSON backup
    Import {
        /// Backup file path
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ViewArg {
    Cards,
    Table,
}

impl From<ViewArg> for ViewMode {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Cards => ViewMode::Cards,
            ViewArg::Table => ViewMode::Table,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    init_logging(&cli);

    let db_path = cli.db.clone().unwrap_or_else(|| data_dir().join("gamelog.db"));
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_db(&db_path)?;
    let store = SqliteKeyValueStore::try_new(conn)?;
    let mut session = Session::open(KvReviewRepository::new(store))?;
    debug!(
        "event=cli_start module=cli status=ok version={} db={}",
        gamelog_core::core_version(),
        db_path.display()
    );

    match cli.command {
        Commands::Init => {
            println!(
                "storage ready: {} review(s), {} page(s)",
                session.total(),
                session.page_count()
            );
        }
        Commands::List { page, view } => {
            session.set_view_mode(view.into());
            session.goto_page(page.saturating_sub(1))?;
            render_list(&session);
        }
        Commands::Show { id } => match session.find(id)? {
            Some(review) => render_detail(&review),
            None => {
                eprintln!("review not found: {id}");
                process::exit(1);
            }
        },
        Commands::Add {
            title,
            contents,
            rating,
            image_url,
            search_cover,
        } => {
            let mut composer = ReviewComposer::new();
            composer.title = title;
            if search_cover {
                match composer.cover_search_url() {
                    Some(url) => println!("{url}"),
                    None => eprintln!("enter a title to search covers for"),
                }
                return Ok(());
            }
            if let Some(contents) = contents {
                composer.contents = contents;
            }
            if let Some(stars) = rating {
                composer.set_rating(stars)?;
            }
            composer.image_url = image_url;

            let review = composer.submit(&mut session)?;
            println!("added #{} {}", review.id, review.title);
        }
        Commands::Edit {
            id,
            title,
            contents,
            rating,
            image_url,
            clear_image,
        } => {
            if let Some(stars) = rating {
                if stars > RATING_MAX {
                    return Err(format!("rating {stars} is out of range 0..={RATING_MAX}").into());
                }
            }
            let patch = ReviewPatch {
                title,
                contents,
                rating,
                image_url: if clear_image {
                    Some(None)
                } else {
                    image_url.map(Some)
                },
            };
            if patch.is_empty() {
                return Err("nothing to change; pass at least one field flag".into());
            }

            let review = session.update(id, &patch)?;
            println!("updated #{} {}", review.id, review.title);
        }
        Commands::Rm { id } => {
            session.remove(id)?;
            println!("removed #{id}");
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)?;
            let path = session.export(&dir)?;
            println!("exported {} review(s) to {}", session.total(), path.display());
        }
        Commands::Import { file } => {
            let imported = session.import(&file)?;
            println!("imported {imported} review(s)");
            render_list(&session);
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| data_dir().join("logs"));
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| gamelog_core::default_log_level().to_string());

    if let Some(log_dir) = log_dir.to_str() {
        // logging is diagnostics only; a failed init must not block the CLI
        if let Err(err) = gamelog_core::init_logging(&level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gamelog")
}

fn render_list(session: &Session) {
    if session.items().is_empty() {
        println!("no reviews yet");
        return;
    }

    match session.view_mode() {
        ViewMode::Cards => render_cards(session.items()),
        ViewMode::Table => render_table(session.items()),
    }

    println!(
        "page {}/{} - {} review(s), {} per page",
        session.page() + 1,
        session.page_count().max(1),
        session.total(),
        PAGE_SIZE
    );
}

fn render_cards(reviews: &[Review]) {
    for review in reviews {
        println!("+----------------------------------------");
        println!("| #{} {}", review.id, review.title);
        println!("| {}  {}", stars(review.rating), review.created_at);
        println!("| {}", markup::summary(&review.contents, 60));
        println!("+----------------------------------------");
    }
}

fn render_table(reviews: &[Review]) {
    println!("{:>4}  {:<32} {:<7} {}", "ID", "TITLE", "RATING", "CREATED");
    for review in reviews {
        println!(
            "{:>4}  {:<32} {:<7} {}",
            review.id,
            truncate(&review.title, 32),
            stars(review.rating),
            review.created_at
        );
    }
}

fn render_detail(review: &Review) {
    println!("#{} {}", review.id, review.title);
    println!("{}", stars(review.rating));
    if let Some(url) = &review.image_url {
        println!("cover: {url}");
    }
    println!("created: {}", review.created_at);
    println!("updated: {}", review.updated_at);
    println!();
    println!("{}", markup::plain_text(&review.contents));
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(RATING_MAX));
    let empty = usize::from(RATING_MAX) - filled;
    format!("{}{}", "*".repeat(filled), "-".repeat(empty))
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
