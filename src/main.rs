use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use land_desk::dashboard::ConsoleOperator;
use land_desk::models::{format_amount, Property, PropertyDraft};
use land_desk::services::{CloudinaryHost, SupabaseClient, UploadFile};
use land_desk::{init_tracing, AdminDashboard, Config};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Back office for the land listings site
#[derive(Parser)]
#[command(name = "land-desk", version)]
struct Cli {
    /// Operator account
    #[arg(long, env = "LAND_DESK_EMAIL")]
    email: String,

    #[arg(long, env = "LAND_DESK_PASSWORD", hide_env_values = true)]
    password: String,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all listings, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a listing from a JSON draft
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace every field of a listing with a JSON draft
    Edit {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a listing
    Delete { id: String },
    /// Upload images and append them to a listing
    Upload {
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Upload preset, overrides PUBLIC_CLOUDINARY_UPLOAD_PRESET
        #[arg(long)]
        preset: Option<String>,
    },
    /// Append an image URL to a listing
    AddImage { id: String, url: String },
    /// Remove the image at a position (0 is the cover)
    RemoveImage { id: String, index: usize },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.logging.level);

    let supabase = Arc::new(
        SupabaseClient::new(&config.supabase, &config.http)
            .context("Failed to create Supabase client")?,
    );
    let media = Arc::new(
        CloudinaryHost::new(&config.cloudinary, &config.http)
            .context("Failed to create Cloudinary client")?,
    );
    let operator = Arc::new(ConsoleOperator::new(cli.yes));

    let mut dashboard = AdminDashboard::new(supabase.clone(), supabase, media, operator);
    dashboard.set_upload_target(config.cloudinary.preset());

    dashboard
        .authenticate(&cli.email, &cli.password)
        .await
        .context("Login failed")?;

    let result = run(&mut dashboard, cli.command).await;
    dashboard.logout().await;
    result
}

async fn run(dashboard: &mut AdminDashboard, command: Command) -> Result<()> {
    match command {
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(dashboard.properties())?);
            } else {
                print_listing(dashboard);
            }
        }
        Command::Create { file } => {
            let draft = read_draft(&file).await?;
            dashboard.new_entry()?;
            *dashboard.draft_mut() = draft;
            let saved = dashboard.save_draft().await?;
            info!("✅ Created {} (ID: {})", saved.title, saved.id);
        }
        Command::Edit { id, file } => {
            let mut draft = read_draft(&file).await?;
            dashboard.edit_entry(&id)?;
            draft.id = Some(id);
            *dashboard.draft_mut() = draft;
            let saved = dashboard.save_draft().await?;
            info!("✅ Updated {}", saved.id);
        }
        Command::Delete { id } => {
            if dashboard.delete_property(&id).await? {
                info!("🗑️  Deleted {}", id);
            } else {
                info!("Delete cancelled");
            }
        }
        Command::Upload { id, files, preset } => {
            let mut selected = Vec::with_capacity(files.len());
            for path in &files {
                selected.push(UploadFile::read(path).await?);
            }

            dashboard.edit_entry(&id)?;
            if let Some(preset) = preset {
                dashboard.set_upload_target(preset);
            }

            let before = dashboard.draft().images.len();
            let outcome = dashboard.upload_images(&selected).await;
            // Keep whatever made it to the host before a failure
            if dashboard.draft().images.len() > before {
                dashboard.save_draft().await?;
            } else {
                dashboard.cancel()?;
            }
            let uploaded = outcome?;
            info!("📸 Added {} images to {}", uploaded, id);
        }
        Command::AddImage { id, url } => {
            dashboard.edit_entry(&id)?;
            if !dashboard.add_image_url(&url)? {
                warn!("Ignoring blank image URL");
                dashboard.cancel()?;
                return Ok(());
            }
            dashboard.save_draft().await?;
            info!("✅ Added image to {}", id);
        }
        Command::RemoveImage { id, index } => {
            dashboard.edit_entry(&id)?;
            match dashboard.remove_image(index)? {
                Some(url) => {
                    dashboard.save_draft().await?;
                    info!("✅ Removed {} from {}", url, id);
                }
                None => {
                    dashboard.cancel()?;
                    anyhow::bail!("{} has no image at position {}", id, index);
                }
            }
        }
    }
    Ok(())
}

async fn read_draft(path: &Path) -> Result<PropertyDraft> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid draft in {}", path.display()))
}

fn print_listing(dashboard: &AdminDashboard) {
    if let Some(message) = dashboard.empty_state_message() {
        println!("{}", message);
        return;
    }

    for (i, property) in dashboard.properties().iter().enumerate() {
        print_property(i + 1, property);
    }
}

fn print_property(position: usize, property: &Property) {
    println!("{}. {} ({})", position, property.title, property.location);
    println!(
        "   {} perches × LKR {} = LKR {}",
        property.total_perches,
        format_amount(property.perch_price),
        format_amount(property.total_value())
    );
    let utilities = property.utilities();
    if !utilities.is_empty() {
        println!("   Utilities: {}", utilities.join(", "));
    }
    if let Some(distance) = &property.distance_to_kandy {
        println!("   Distance: {}", distance);
    }
    println!("   Agent: {} ({})", property.agent_name, property.agent_phone);
    if let Some(cover) = property.cover_image() {
        println!("   Cover: {} (+{} more)", cover, property.images.len() - 1);
    }
    println!("   ID: {}", property.id);
    println!("   Added: {}", property.created_at.format("%Y-%m-%d %H:%M"));
    println!();
}
