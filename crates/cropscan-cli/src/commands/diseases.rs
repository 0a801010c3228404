use anyhow::Result;
use cropscan_application::AppContext;
use cropscan_application::views::filter_diseases;

use super::store_failure;

pub async fn list(ctx: &AppContext, search: Option<&str>) -> Result<()> {
    if let Err(e) = ctx.diseases.fetch_diseases().await {
        return Err(store_failure(e, ctx.diseases.error().await));
    }

    let state = ctx.diseases.state().await;
    if let Some(info) = &state.error {
        println!("{info}");
    }

    let shown = filter_diseases(&state.diseases, search.unwrap_or_default());
    for disease in &shown {
        println!(
            "{:>5}  {:<28} {:<14} {}",
            disease.id, disease.name, disease.category, disease.solution
        );
    }
    println!("{} of {} diseases", shown.len(), state.diseases.len());
    Ok(())
}

pub async fn populate(ctx: &AppContext) -> Result<()> {
    if let Err(e) = ctx.diseases.populate_diseases().await {
        return Err(store_failure(e, ctx.diseases.error().await));
    }
    println!(
        "Catalog populated: {} diseases",
        ctx.diseases.diseases().await.len()
    );
    Ok(())
}

pub async fn update(ctx: &AppContext, id: i64, solution: &str) -> Result<()> {
    if let Err(e) = ctx.diseases.update_disease(id, solution).await {
        return Err(store_failure(e, ctx.diseases.error().await));
    }
    println!("Updated solution for disease {id}");
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: i64) -> Result<()> {
    if let Err(e) = ctx.diseases.delete_disease(id).await {
        return Err(store_failure(e, ctx.diseases.error().await));
    }
    println!("Deleted disease {id}");
    Ok(())
}

pub async fn clear(ctx: &AppContext) -> Result<()> {
    if let Err(e) = ctx.diseases.clear_all_diseases().await {
        return Err(store_failure(e, ctx.diseases.error().await));
    }
    println!("Cleared all diseases");
    Ok(())
}
