use anyhow::{Context, Result};
use cropscan_application::AppContext;
use cropscan_infrastructure::ConfigService;

pub fn show(ctx: &AppContext, config_service: &ConfigService) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&ctx.config).context("Failed to render configuration")?;
    println!("# {}", config_service.path().display());
    print!("{rendered}");
    Ok(())
}
