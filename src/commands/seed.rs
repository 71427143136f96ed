//! Seed command implementation

use crate::storage::FootballDatabase;
use crate::Result;

/// Handle the seed command. Returns whether sample data was written.
pub fn handle_seed(store: &FootballDatabase, reset: bool) -> Result<bool> {
    if reset {
        println!("Clearing stored data...");
        store.clear_all_data()?;
    }

    let seeded = store.seed_sample_data()?;
    if seeded {
        println!("✓ Sample data loaded");
    } else {
        println!("Database already holds data; nothing to do (use --reset to reload)");
    }
    Ok(seeded)
}
