use clap::{Args, Parser, Subcommand};

use crate::storefront::Language;

#[derive(Debug, Parser)]
#[command(name = "libinventory", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse the inventory export into book records (JSONL).
    Parse(ParseArgs),
    /// Print the category hierarchy inferred from the catalog.
    Categories(CategoriesArgs),
    /// Search and filter the catalog, one page at a time.
    Search(SearchArgs),
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },
    /// Submit the cart as an order.
    Checkout(CheckoutArgs),
    /// Upload a cover image for a book.
    UploadImage(UploadImageArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Local CSV export (instead of fetching the sheet).
    #[arg(long, conflicts_with = "sheet_url")]
    pub csv: Option<String>,

    /// Published CSV export URL (default: $LIBINVENTORY_SHEET_URL).
    #[arg(long)]
    pub sheet_url: Option<String>,

    /// JSON file of per-title image overrides.
    #[arg(long)]
    pub overrides: Option<String>,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file for `books.jsonl` (default: stdout).
    #[arg(long)]
    pub out: Option<String>,

    /// Overwrite `--out` if it exists.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Language of the "All" pseudo-category.
    #[arg(long, value_enum, default_value_t = Language::Ar)]
    pub lang: Language,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Case-insensitive text matched against title, author and category.
    #[arg(long, default_value = "")]
    pub query: String,

    /// Top-level category (or full label with `--exact`).
    #[arg(long)]
    pub category: Option<String>,

    /// Treat `--category` as a full category label.
    #[arg(long, default_value_t = false)]
    pub exact: bool,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, value_enum, default_value_t = Language::Ar)]
    pub lang: Language,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add one copy of a book to the cart.
    Add(CartAddArgs),
    /// Change how many copies of a book are in the cart (0 removes it).
    Set(CartSetArgs),
    /// Remove a book from the cart.
    Remove(CartRemoveArgs),
    /// Print the cart with its total.
    Show(CartShowArgs),
}

#[derive(Debug, Args)]
pub struct CartAddArgs {
    /// Cart state file.
    #[arg(long)]
    pub cart: String,

    /// Exact book title.
    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct CartSetArgs {
    #[arg(long)]
    pub cart: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub quantity: u32,
}

#[derive(Debug, Args)]
pub struct CartRemoveArgs {
    #[arg(long)]
    pub cart: String,

    #[arg(long)]
    pub title: String,
}

#[derive(Debug, Args)]
pub struct CartShowArgs {
    #[arg(long)]
    pub cart: String,
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub cart: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub address: String,

    /// Order form endpoint (default: $LIBINVENTORY_ORDER_URL).
    #[arg(long)]
    pub order_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct UploadImageArgs {
    /// Exact book title the image belongs to.
    #[arg(long)]
    pub title: String,

    /// Image file (png, jpg, gif, webp).
    #[arg(long)]
    pub image: String,

    /// Upload script endpoint (default: $LIBINVENTORY_UPLOAD_URL).
    #[arg(long)]
    pub upload_url: Option<String>,

    /// Record the uploaded URL in this override file.
    #[arg(long)]
    pub overrides: Option<String>,
}
