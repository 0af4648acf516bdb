use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use libinventory::cli::{CartCommand, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    libinventory::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Parse(args) => {
            libinventory::catalog::parse(args).await.context("parse")?;
        }
        Command::Categories(args) => {
            libinventory::catalog::categories(args)
                .await
                .context("categories")?;
        }
        Command::Search(args) => {
            libinventory::catalog::search(args).await.context("search")?;
        }
        Command::Cart {
            command: CartCommand::Add(args),
        } => {
            libinventory::checkout::cart_add(args)
                .await
                .context("cart add")?;
        }
        Command::Cart {
            command: CartCommand::Set(args),
        } => {
            libinventory::checkout::cart_set(args)
                .await
                .context("cart set")?;
        }
        Command::Cart {
            command: CartCommand::Remove(args),
        } => {
            libinventory::checkout::cart_remove(args)
                .await
                .context("cart remove")?;
        }
        Command::Cart {
            command: CartCommand::Show(args),
        } => {
            libinventory::checkout::cart_show(args)
                .await
                .context("cart show")?;
        }
        Command::Checkout(args) => {
            libinventory::checkout::checkout(args)
                .await
                .context("checkout")?;
        }
        Command::UploadImage(args) => {
            libinventory::checkout::upload_image(args)
                .await
                .context("upload image")?;
        }
    }

    Ok(())
}
