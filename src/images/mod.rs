//! Migration of remotely hosted images to local assets: inventory, plan
//! manifest and download.

pub mod fetch;
pub mod inventory;
pub mod manifest;

pub use fetch::{FetchAction, FetchOutcome, ImageFetcher};
pub use inventory::{run_inventory, InventoryReport, MigrationPlanner, Section};
pub use manifest::{read_manifest, PlanRow};
