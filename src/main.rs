use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use whisker::app::AppContext;
use whisker::cli::{commands, Cli, Commands};
use whisker::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Random {
            limit,
            size,
            breed,
            category,
            with_info,
        } => {
            commands::random_cats(&ctx, limit, size, breed, category, with_info).await?;
        }
        Commands::Image { image_id } => {
            commands::show_image(&ctx, &image_id).await?;
        }
        Commands::Breeds {
            search,
            limit,
            origin,
            temperament,
        } => {
            commands::list_breeds(&ctx, search, limit, origin, temperament).await?;
        }
        Commands::BreedImages {
            breed_id,
            limit,
            quality,
        } => {
            commands::breed_images(&ctx, &breed_id, limit, quality).await?;
        }
        Commands::Categories => {
            commands::list_categories(&ctx).await?;
        }
        Commands::Favorites { toggle } => {
            commands::favorites(&ctx, toggle)?;
        }
        Commands::Upload {
            path,
            sub_id,
            breed_ids,
        } => {
            commands::upload_image(&ctx, &path, sub_id, breed_ids).await?;
        }
        Commands::Delete { image_id } => {
            commands::delete_image(&ctx, &image_id).await?;
        }
        Commands::Tui => {
            whisker::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
