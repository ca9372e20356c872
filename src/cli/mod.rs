pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "whisker")]
#[command(about = "A terminal cat image browser", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch random cat images
    Random {
        /// Number of images (clamped to 1-100)
        #[arg(short, long, default_value_t = 10)]
        limit: i32,

        /// Image size: small, med or full
        #[arg(short, long)]
        size: Option<String>,

        /// Filter by breed id (e.g. "siam")
        #[arg(short, long)]
        breed: Option<String>,

        /// Filter by category id
        #[arg(long)]
        category: Option<i32>,

        /// Only show cats with breed descriptions
        #[arg(long)]
        with_info: bool,
    },
    /// Show a single image by id
    Image {
        /// The image id
        image_id: String,
    },
    /// List or search breeds
    Breeds {
        /// Search breeds by name instead of listing
        #[arg(short, long)]
        search: Option<String>,

        /// Number of breeds to list (clamped to 1-100)
        #[arg(short, long)]
        limit: Option<i32>,

        /// Keep only breeds whose origin contains this text
        #[arg(long)]
        origin: Option<String>,

        /// Keep only breeds whose temperament contains this text
        #[arg(long)]
        temperament: Option<String>,
    },
    /// List images for one breed
    BreedImages {
        /// The breed id
        breed_id: String,

        /// Number of images (clamped to 1-100)
        #[arg(short, long)]
        limit: Option<i32>,

        /// Rank results by metadata quality
        #[arg(short, long)]
        quality: bool,
    },
    /// List categories
    Categories,
    /// List favorites, or toggle one
    Favorites {
        /// Toggle this cat id instead of listing
        #[arg(short, long)]
        toggle: Option<String>,
    },
    /// Upload an image
    Upload {
        /// Path to the image file
        path: std::path::PathBuf,

        /// Optional sub id for internal identification
        #[arg(long)]
        sub_id: Option<String>,

        /// Optional comma-separated breed ids
        #[arg(long)]
        breed_ids: Option<String>,
    },
    /// Delete an uploaded image
    Delete {
        /// The image id to delete
        image_id: String,
    },
    /// Launch the TUI
    Tui,
}
