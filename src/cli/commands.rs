use std::path::Path;

use crate::api::ImageUpload;
use crate::app::{AppContext, Result, WhiskerError};
use crate::domain::{Breed, Cat};
use crate::query::{
    BreedImagesQuery, BreedQuery, BreedSort, CategoryQuery, CategorySort, GetBreeds,
    GetCategories, GetImagesByBreed, GetRandomCats, RandomCatsQuery,
};

pub async fn random_cats(
    ctx: &AppContext,
    limit: i32,
    size: Option<String>,
    breed: Option<String>,
    category: Option<i32>,
    with_info: bool,
) -> Result<()> {
    let query = RandomCatsQuery {
        limit,
        size,
        breed_ids: breed,
        category_ids: category.map(|id| id.to_string()),
        prefer_breeds_with_info: with_info,
        include_breeds: Some(true),
        include_categories: Some(true),
        ..RandomCatsQuery::default()
    };

    let cats = GetRandomCats::new(ctx.service.clone()).run(query).await?;

    if cats.is_empty() {
        println!("No cats found");
        return Ok(());
    }
    for cat in &cats {
        print_cat(cat, ctx);
    }
    Ok(())
}

pub async fn show_image(ctx: &AppContext, image_id: &str) -> Result<()> {
    let cat = ctx.service.get_image(image_id).await?;
    print_cat(&cat, ctx);
    if let Some(breed) = cat.primary_breed() {
        if let Some(description) = &breed.description {
            println!("  {}", description);
        }
    }
    Ok(())
}

pub async fn list_breeds(
    ctx: &AppContext,
    search: Option<String>,
    limit: Option<i32>,
    origin: Option<String>,
    temperament: Option<String>,
) -> Result<()> {
    let use_case = GetBreeds::new(ctx.service.clone());

    let breeds = match search {
        Some(query) => use_case.search(&query).await?,
        None => {
            let query = BreedQuery {
                limit,
                filter_by_origin: origin,
                filter_by_temperament: temperament,
                sort_by: Some(BreedSort::Name),
                ..BreedQuery::default()
            };
            use_case.run(query).await?
        }
    };

    if breeds.is_empty() {
        println!("No breeds found");
        return Ok(());
    }
    for breed in &breeds {
        print_breed(breed);
    }
    Ok(())
}

pub async fn breed_images(
    ctx: &AppContext,
    breed_id: &str,
    limit: Option<i32>,
    quality: bool,
) -> Result<()> {
    let query = BreedImagesQuery {
        breed_id: breed_id.to_string(),
        limit,
        include_breeds: Some(true),
        include_categories: Some(true),
        prioritize_quality: quality,
        ..BreedImagesQuery::default()
    };

    let cats = GetImagesByBreed::new(ctx.service.clone()).run(query).await?;

    if cats.is_empty() {
        println!("No images for breed: {}", breed_id);
        return Ok(());
    }
    for cat in &cats {
        print_cat(cat, ctx);
    }
    Ok(())
}

pub async fn list_categories(ctx: &AppContext) -> Result<()> {
    let query = CategoryQuery {
        sort_by: Some(CategorySort::Name),
        ..CategoryQuery::default()
    };
    let categories = GetCategories::new(ctx.service.clone()).run(query).await?;

    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

pub fn favorites(ctx: &AppContext, toggle: Option<String>) -> Result<()> {
    if let Some(cat_id) = toggle {
        ctx.favorites.toggle(&cat_id)?;
        if ctx.favorites.favorites()?.contains(&cat_id) {
            println!("Added favorite: {}", cat_id);
        } else {
            println!("Removed favorite: {}", cat_id);
        }
        return Ok(());
    }

    let mut ids: Vec<String> = ctx.favorites.favorites()?.into_iter().collect();
    if ids.is_empty() {
        println!("No favorites");
        return Ok(());
    }
    ids.sort();
    for id in ids {
        println!("★ {}", id);
    }
    Ok(())
}

pub async fn upload_image(
    ctx: &AppContext,
    path: &Path,
    sub_id: Option<String>,
    breed_ids: Option<String>,
) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| WhiskerError::Validation(format!("Invalid file name: {}", path.display())))?
        .to_string();

    let upload = ImageUpload {
        bytes,
        filename,
        sub_id,
        breed_ids,
    };

    let cat = ctx.service.upload_image(&upload).await?;
    println!("Uploaded image: {}", cat.id);
    println!("  {}", cat.image_url);
    Ok(())
}

pub async fn delete_image(ctx: &AppContext, image_id: &str) -> Result<()> {
    ctx.service.delete_image(image_id).await?;
    println!("Deleted image: {}", image_id);
    Ok(())
}

fn print_cat(cat: &Cat, ctx: &AppContext) {
    let favorite = ctx
        .favorites
        .favorites()
        .map(|ids| ids.contains(&cat.id))
        .unwrap_or(false);
    let marker = if favorite { "★" } else { " " };
    let breed = cat
        .primary_breed()
        .map(|b| b.name.as_str())
        .unwrap_or("-");
    println!(
        "{} {:<12} {:>4}x{:<4} {:<20} {}",
        marker, cat.id, cat.width, cat.height, breed, cat.image_url
    );
}

fn print_breed(breed: &Breed) {
    let origin = breed.origin.as_deref().unwrap_or("-");
    println!("{:<6} {:<24} {}", breed.id, breed.name, origin);
    if let Some(temperament) = &breed.temperament {
        println!("       {}", temperament);
    }
}
