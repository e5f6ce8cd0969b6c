//! Destinations command implementation
//!
//! Lists the combined destination index and edits the local destinations.
//! Global destinations come from the policy file and are shown read-only.

use crate::config::load_config;
use crate::core::registry::{AddressedDestination, DestinationOrigin, DestinationRegistry};
use crate::domain::DestinationEntry;
use clap::{Args, Subcommand};

/// Arguments for the destinations command
#[derive(Args, Debug)]
pub struct DestinationsArgs {
    #[command(subcommand)]
    pub action: DestinationsAction,
}

/// Destination actions
#[derive(Subcommand, Debug)]
pub enum DestinationsAction {
    /// List every destination with its index
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a local destination given as "name,host,port,destination AE,our AE"
    Add {
        /// Destination record
        record: String,
    },

    /// Remove the local destination at an index shown by `list`
    Remove {
        /// Combined destination index
        index: usize,
    },
}

impl DestinationsArgs {
    /// Execute the destinations command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mut registry = DestinationRegistry::open(&config.storage)?;

        match &self.action {
            DestinationsAction::List { json } => {
                if *json {
                    println!("{}", render_json(&registry)?);
                } else {
                    print!("{}", render_table(&registry));
                }
                Ok(0)
            }
            DestinationsAction::Add { record } => add_destination(&mut registry, record),
            DestinationsAction::Remove { index } => remove_destination(&mut registry, *index),
        }
    }
}

/// Parses, validates and persists a new local destination
pub(crate) fn add_destination(registry: &mut DestinationRegistry, record: &str) -> anyhow::Result<i32> {
    let entry: DestinationEntry = match record.parse() {
        Ok(entry) => entry,
        Err(e) => {
            println!("❌ Invalid destination record: {e}");
            println!("   Expected: name,host,port,destination AE,our AE");
            return Ok(2);
        }
    };

    let index = match registry.add_local(entry) {
        Ok(index) => index,
        Err(e) => {
            println!("❌ {e}");
            return Ok(2);
        }
    };
    registry.save_local()?;

    if let Ok(entry) = registry.resolve(index) {
        println!("✅ Added destination [{index}] {entry}");
    }
    Ok(0)
}

/// Removes a local destination and persists the remaining list
pub(crate) fn remove_destination(registry: &mut DestinationRegistry, index: usize) -> anyhow::Result<i32> {
    let removed = match registry.remove_local(index) {
        Ok(entry) => entry,
        Err(e) => {
            println!("❌ {e}");
            return Ok(2);
        }
    };
    registry.save_local()?;

    println!("✅ Removed destination {removed}");
    Ok(0)
}

pub(crate) fn render_json(registry: &DestinationRegistry) -> anyhow::Result<String> {
    let destinations: Vec<AddressedDestination<'_>> = registry.combined().collect();
    Ok(serde_json::to_string_pretty(&destinations)?)
}

pub(crate) fn render_table(registry: &DestinationRegistry) -> String {
    if registry.is_empty() {
        return "No destinations configured\n".to_string();
    }

    let mut out = String::new();
    for destination in registry.combined() {
        let marker = match destination.origin {
            DestinationOrigin::Global => " (managed)",
            DestinationOrigin::Local => "",
        };
        out.push_str(&format!(
            "[{}] {}{}\n",
            destination.index, destination.entry, marker
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::settings::{MemorySettingsStore, StaticPolicySource};
    use crate::core::registry::DESTINATIONS_NAMESPACE;

    fn registry(store: &MemorySettingsStore) -> DestinationRegistry {
        let policy = StaticPolicySource::with_values(DESTINATIONS_NAMESPACE, ["PACS,pacs.local,104,PACS,FERRY"]);
        let mut registry = DestinationRegistry::new(Box::new(store.clone()), Box::new(policy));
        registry.load_global();
        registry.load_local().unwrap();
        registry
    }

    #[test]
    fn test_render_table_marks_global() {
        let store = MemorySettingsStore::with_values(DESTINATIONS_NAMESPACE, ["Clinic A,10.0.0.5,104,AE1,US1"]);
        let table = render_table(&registry(&store));

        assert_eq!(
            table,
            "[0] PACS (PACS@pacs.local:104 as FERRY) (managed)\n\
             [1] Clinic A (AE1@10.0.0.5:104 as US1)\n"
        );
    }

    #[test]
    fn test_render_json() {
        let store = MemorySettingsStore::new();
        let json = render_json(&registry(&store)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["index"], 0);
        assert_eq!(value[0]["origin"], "global");
        assert_eq!(value[0]["destination_port"], 104);
    }

    #[test]
    fn test_add_destination_persists() {
        let store = MemorySettingsStore::new();
        let mut registry = registry(&store);

        let code = add_destination(&mut registry, "Clinic A, 10.0.0.5, 104, AE1, US1").unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            store.snapshot(DESTINATIONS_NAMESPACE),
            vec![("1".to_string(), "Clinic A,10.0.0.5,104,AE1,US1".to_string())]
        );
    }

    #[test]
    fn test_add_malformed_destination_is_rejected() {
        let store = MemorySettingsStore::new();
        let mut registry = registry(&store);

        assert_eq!(add_destination(&mut registry, "Clinic A,10.0.0.5").unwrap(), 2);
        assert_eq!(add_destination(&mut registry, "Clinic A,10.0.0.5,0,AE1,US1").unwrap(), 2);
        assert_eq!(store.flushes(), 0);
    }

    #[test]
    fn test_remove_global_destination_is_rejected() {
        let store = MemorySettingsStore::with_values(DESTINATIONS_NAMESPACE, ["Clinic A,10.0.0.5,104,AE1,US1"]);
        let mut registry = registry(&store);

        assert_eq!(remove_destination(&mut registry, 0).unwrap(), 2);
        assert_eq!(remove_destination(&mut registry, 5).unwrap(), 2);
        assert_eq!(remove_destination(&mut registry, 1).unwrap(), 0);
        assert!(store.snapshot(DESTINATIONS_NAMESPACE).is_empty());
    }
}
