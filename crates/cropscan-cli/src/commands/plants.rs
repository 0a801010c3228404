use anyhow::Result;
use cropscan_application::AppContext;
use cropscan_application::views::{DashboardStats, filter_plant_rows, plant_rows};

use super::store_failure;

/// Fetches plant records, refreshing the catalog for disease names.
///
/// A failed catalog refresh falls back to the cached catalog.
async fn refresh(ctx: &AppContext) -> Result<()> {
    if let Err(e) = ctx.plants.fetch_user_plants().await {
        return Err(store_failure(e, ctx.plants.error().await));
    }
    if let Err(e) = ctx.diseases.fetch_diseases().await {
        tracing::warn!(error = %e, "Using cached disease catalog for labels");
    }
    Ok(())
}

pub async fn list(ctx: &AppContext, search: Option<&str>) -> Result<()> {
    refresh(ctx).await?;

    let state = ctx.plants.state().await;
    if let Some(info) = &state.error {
        println!("{info}");
    }

    let rows = plant_rows(&state.user_plants, &ctx.diseases.diseases().await);
    let shown = filter_plant_rows(&rows, search.unwrap_or_default());
    for row in &shown {
        println!(
            "{:>5}  {:<24} {:<20} {:<26} {}",
            row.id, row.disease_label, row.location, row.datetime, row.plant_image
        );
    }
    println!("{} of {} records", shown.len(), rows.len());
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    refresh(ctx).await?;

    let stats = DashboardStats::compute(
        &ctx.plants.user_plants().await,
        &ctx.diseases.diseases().await,
    );
    println!("Plant records:        {}", stats.total_records);
    println!("Distinct locations:   {}", stats.distinct_locations);
    println!("Unknown disease refs: {}", stats.unknown_disease_refs);
    println!("Diseases in catalog:  {}", stats.catalog_size);
    Ok(())
}
