use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::cli::{CategoriesArgs, ParseArgs, SearchArgs, SourceArgs};
use crate::config;
use crate::formats::BookRecord;
use crate::overrides::{ImageOverrides, OverrideStore};
use crate::sheet::{self, CatalogSource, FileSource, HttpSheetSource};
use crate::storefront::{Catalog, ITEMS_PER_PAGE, Language, paginate};

pub fn open_source(args: &SourceArgs) -> anyhow::Result<Box<dyn CatalogSource>> {
    if let Some(csv) = &args.csv {
        return Ok(Box::new(FileSource::new(csv)));
    }
    let url = config::required_endpoint(
        args.sheet_url.as_deref(),
        config::SHEET_URL_ENV,
        "--csv, --sheet-url",
    )?;
    Ok(Box::new(HttpSheetSource::new(reqwest::Client::new(), &url)?))
}

pub async fn load_books(args: &SourceArgs) -> anyhow::Result<Vec<BookRecord>> {
    let source = open_source(args)?;
    let overrides = match &args.overrides {
        Some(path) => OverrideStore::new(path).load().await,
        None => ImageOverrides::default(),
    };
    sheet::load_books(source.as_ref(), &overrides).await
}

pub async fn parse(args: ParseArgs) -> anyhow::Result<()> {
    let books = load_books(&args.source).await.context("load books")?;

    match &args.out {
        Some(out) => {
            let out_path = Path::new(out);
            let mut options = OpenOptions::new();
            options.write(true);
            if args.force {
                options.create(true).truncate(true);
            } else {
                if out_path.exists() {
                    anyhow::bail!("books output already exists: {}", out_path.display());
                }
                options.create_new(true);
            }
            let mut file = options
                .open(out_path)
                .with_context(|| format!("create books output: {}", out_path.display()))?;
            write_jsonl(&mut file, &books)?;
            file.flush().context("flush books output")?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            write_jsonl(&mut stdout, &books)?;
        }
    }

    Ok(())
}

fn write_jsonl(out: &mut impl std::io::Write, books: &[BookRecord]) -> anyhow::Result<()> {
    for book in books {
        serde_json::to_writer(&mut *out, book).context("serialize book record")?;
        out.write_all(b"\n").context("write book newline")?;
    }
    Ok(())
}

pub async fn categories(args: CategoriesArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.source, args.lang).await?;
    print_json(catalog.hierarchy())
}

pub async fn search(args: SearchArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.source, args.lang).await?;
    let filter = catalog.category_filter(args.category.as_deref(), args.exact);
    tracing::debug!(?filter, query = %args.query, page = args.page, "search catalog");

    let matches = catalog.filter(&filter, &args.query);
    print_json(&paginate(matches, args.page, ITEMS_PER_PAGE))
}

async fn load_catalog(source: &SourceArgs, lang: Language) -> anyhow::Result<Catalog> {
    let books = load_books(source).await.context("load books")?;
    Ok(Catalog::new(books, lang))
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("serialize output")?;
    stdout.write_all(b"\n").context("write output newline")?;
    Ok(())
}
