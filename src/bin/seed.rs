use anyhow::{Context, Result};
use land_desk::seed::{sample_properties, seed, tally};
use land_desk::services::SupabaseClient;
use land_desk::{init_tracing, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Missing Supabase credentials")?;
    init_tracing(&config.logging.level);

    info!("🌱 Starting database seed...");

    let client = SupabaseClient::new(&config.supabase, &config.http)
        .context("Failed to create Supabase client")?;
    let rows = sample_properties();

    let report = match seed(&client, &rows).await {
        Ok(report) => report,
        Err(e) => {
            error!("💡 Make sure you have:");
            error!("   1. Created the {} table", config.supabase.table);
            error!("   2. Set up row-level security policies that allow inserts");
            error!("   3. Used the correct Supabase credentials");
            return Err(e).context("Error accessing properties table");
        }
    };

    println!("{}", "=".repeat(50));
    println!("🎉 Database seeding completed!");
    println!("✅ Successfully added: {} properties", report.succeeded);
    if report.failed > 0 {
        println!("❌ Failed: {} properties", report.failed);
    }

    println!("\n📊 Summary by Location:");
    for (location, count) in tally(&rows, |r| r.location.as_str()) {
        println!("   • {}: {} properties", location, count);
    }

    println!("\n📊 Summary by Agent:");
    for (agent, count) in tally(&rows, |r| r.agent_name.as_str()) {
        println!("   • {}: {} properties", agent, count);
    }

    if !report.is_clean() {
        anyhow::bail!("{} of {} inserts failed", report.failed, rows.len());
    }
    Ok(())
}
