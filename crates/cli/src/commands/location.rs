//! Location commands.

use anyhow::Result;
use clap::Args;

use super::{DbArgs, open_existing_store, open_store};
use crate::Config;

/// Arguments for the add-location command.
#[derive(Debug, Args)]
pub struct AddLocationArgs {
    /// Unique location name.
    pub name: String,

    /// Free-text description.
    #[arg(long, default_value = "")]
    pub description: String,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Arguments for the locations command.
#[derive(Debug, Args)]
pub struct LocationsArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Execute the add-location command.
pub fn add(args: AddLocationArgs, config: &Config) -> Result<()> {
    let store = open_store(&args.db.db, config)?;
    let id = store.add_location(&args.name, &args.description)?;
    println!("Added location {} ({id})", args.name.trim());
    Ok(())
}

/// Execute the locations command.
pub fn list(args: LocationsArgs, config: &Config) -> Result<()> {
    let store = open_existing_store(&args.db.db, config)?;
    let locations = store.list_locations()?;

    if locations.is_empty() {
        println!("No locations.");
        return Ok(());
    }
    for location in &locations {
        if location.description.is_empty() {
            println!("{}  {}", location.id, location.name);
        } else {
            println!("{}  {} - {}", location.id, location.name, location.description);
        }
    }
    Ok(())
}
