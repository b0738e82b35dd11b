//! Visual asset lookup
//!
//! Pure mapping from location keys to image paths. Nothing here touches the
//! filesystem; the front-end decides what to do with the paths.

use crate::location::{LocationCatalog, LocationId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTable {
    root: String,
}

impl AssetTable {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn background(&self, location_key: &str) -> String {
        format!("{}/{location_key}/background.jpg", self.root)
    }

    /// Portrait for the agent at `position` (0-based) in the roster
    pub fn portrait(&self, location_key: &str, position: usize) -> String {
        format!("{}/{location_key}/character_{:02}.png", self.root, position + 1)
    }
}

impl Default for AssetTable {
    fn default() -> Self {
        Self::new("/images")
    }
}

/// Label of the button that moves the player on.
///
/// The first location is "home": leaving it and coming back read differently.
pub fn location_button_label(catalog: &LocationCatalog, current: LocationId) -> String {
    let home = catalog.first();
    let name = display_name(&home.key);
    if current == home.id {
        format!("Leave {name}")
    } else {
        format!("Go back to {name}")
    }
}

/// `fairy_village` -> `Fairy Village`
pub fn display_name(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
