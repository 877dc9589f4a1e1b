//! Static tile categories.
//!
//! A category fixes a tile family's display identity, its point value and its
//! share of the board. The catalog is built once and never mutated.

use serde::{Deserialize, Serialize};

/// One concrete tile face within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub icon: String,
    /// Points scored when the tile is used.
    pub points: u32,
}

/// A tile category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable key, e.g. `"animals"`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub icon: String,
    /// Display color as a hex string.
    pub color: String,
    /// Points per tile, also the target reward per collected unit.
    pub points: u32,
    /// Relative share of board composition.
    pub weight: f64,
    /// The faces a tile of this category can show.
    pub tiles: Vec<TileType>,
}

impl Category {
    fn new(
        key: &str,
        name: &str,
        icon: &str,
        color: &str,
        points: u32,
        weight: f64,
        faces: &[(&str, &str)],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            points,
            weight,
            tiles: faces
                .iter()
                .map(|(name, icon)| TileType {
                    name: (*name).to_string(),
                    icon: (*icon).to_string(),
                    points,
                })
                .collect(),
        }
    }
}

/// The full set of categories available to the level generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from explicit categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The six themed categories the game ships with.
    pub fn standard() -> Self {
        Self::new(vec![
            Category::new(
                "animals",
                "Animals",
                "🐾",
                "#4361ee",
                100,
                0.20,
                &[
                    ("Elephant", "🐘"),
                    ("Lion", "🦁"),
                    ("Panda", "🐼"),
                    ("Fox", "🦊"),
                    ("Koala", "🐨"),
                    ("Tiger", "🐯"),
                    ("Unicorn", "🦄"),
                    ("Dolphin", "🐬"),
                ],
            ),
            Category::new(
                "birds",
                "Birds",
                "🦜",
                "#4cc9f0",
                120,
                0.15,
                &[
                    ("Eagle", "🦅"),
                    ("Peacock", "🦚"),
                    ("Swan", "🦢"),
                    ("Parrot", "🦜"),
                    ("Flamingo", "🦩"),
                    ("Owl", "🦉"),
                    ("Sparrow", "🐦"),
                    ("Duck", "🦆"),
                ],
            ),
            Category::new(
                "fruits",
                "Fruits",
                "🍓",
                "#f72585",
                80,
                0.20,
                &[
                    ("Apple", "🍎"),
                    ("Banana", "🍌"),
                    ("Grapes", "🍇"),
                    ("Strawberry", "🍓"),
                    ("Watermelon", "🍉"),
                    ("Peach", "🍑"),
                    ("Cherries", "🍒"),
                    ("Mango", "🥭"),
                ],
            ),
            Category::new(
                "flowers",
                "Flowers",
                "🌸",
                "#06d6a0",
                90,
                0.15,
                &[
                    ("Rose", "🌹"),
                    ("Hibiscus", "🌺"),
                    ("Sunflower", "🌻"),
                    ("Blossom", "🌸"),
                    ("Daisy", "🌼"),
                    ("Bouquet", "💐"),
                    ("Wilted Rose", "🥀"),
                    ("Lotus", "🪷"),
                ],
            ),
            Category::new(
                "food",
                "Food",
                "🍕",
                "#ffd166",
                70,
                0.15,
                &[
                    ("Pizza", "🍕"),
                    ("Burger", "🍔"),
                    ("Donut", "🍩"),
                    ("Ice Cream", "🍦"),
                    ("Chocolate", "🍫"),
                    ("Cupcake", "🧁"),
                    ("Lollipop", "🍭"),
                    ("Popcorn", "🍿"),
                ],
            ),
            Category::new(
                "travel",
                "Travel",
                "✈️",
                "#7209b7",
                110,
                0.15,
                &[
                    ("Airplane", "✈️"),
                    ("Rocket", "🚀"),
                    ("Car", "🚗"),
                    ("Ship", "🚢"),
                    ("Train", "🚂"),
                    ("Motorcycle", "🏍️"),
                    ("Helicopter", "🚁"),
                    ("Canoe", "🛶"),
                ],
            ),
        ])
    }

    /// All categories in catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by key.
    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
