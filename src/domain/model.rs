use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::SommelierError;

/// A wine as returned by the catalog service. Every field is optional on the
/// wire and scalar fields take either strings or numbers; a value of any other
/// shape is dropped rather than failing the record. Display defaults are
/// applied by the accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WineRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "wine", default, deserialize_with = "string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub winery: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "rating_object")]
    pub rating: Option<Rating>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default, deserialize_with = "string_or_number")]
    pub average: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reviews: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn rating_object<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

impl WineRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Wine")
    }

    pub fn display_winery(&self) -> &str {
        self.winery.as_deref().unwrap_or("N/A")
    }

    pub fn display_location(&self) -> &str {
        self.location.as_deref().unwrap_or("N/A")
    }

    /// `None` when the record has no rating object at all.
    pub fn display_rating(&self) -> Option<&str> {
        self.rating
            .as_ref()
            .map(|r| r.average.as_deref().unwrap_or("N/A"))
    }

    /// Case-insensitive substring match on the name; an empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.name
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(&term.to_lowercase())
    }
}

/// Declares a closed set of form options with their display labels.
macro_rules! form_options {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = SommelierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label() == s)
                    .ok_or_else(|| {
                        SommelierError::invalid_input(
                            stringify!($name),
                            format!("unknown option '{}'", s),
                        )
                    })
            }
        }
    };
}

form_options!(WineType {
    Red => "Red",
    White => "White",
    Rose => "Rosé",
    Sparkling => "Sparkling",
    Dessert => "Dessert",
    Any => "Any",
});

form_options!(PriceRange {
    Budget => "Budget ($)",
    Moderate => "Moderate ($$)",
    Premium => "Premium ($$$)",
    Luxury => "Luxury ($$$$)",
});

form_options!(TasteTag {
    Dry => "Dry",
    Sweet => "Sweet",
    Fruity => "Fruity",
    Oaky => "Oaky",
    Bold => "Bold",
    Light => "Light",
    Crisp => "Crisp",
    Smooth => "Smooth",
});

form_options!(MealType {
    Appetizers => "Appetizers",
    Seafood => "Seafood",
    Poultry => "Poultry",
    RedMeat => "Red Meat",
    Pasta => "Pasta",
    Vegetarian => "Vegetarian",
    Dessert => "Dessert",
    CheeseBoard => "Cheese Board",
});

form_options!(Occasion {
    CasualDinner => "Casual Dinner",
    RomanticEvening => "Romantic Evening",
    Celebration => "Celebration",
    BusinessDinner => "Business Dinner",
    Party => "Party",
    JustBecause => "Just Because",
});

pub const MIN_GUESTS: u32 = 1;
pub const MAX_GUESTS: u32 = 20;
pub const DEFAULT_GUESTS: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub wine_type: WineType,
    pub price_range: PriceRange,
    pub taste_profile: BTreeSet<TasteTag>,
    pub meal_type: MealType,
    pub meal_description: String,
    pub occasion: Occasion,
    pub guest_count: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            wine_type: WineType::default(),
            price_range: PriceRange::default(),
            taste_profile: BTreeSet::new(),
            meal_type: MealType::default(),
            meal_description: String::new(),
            occasion: Occasion::default(),
            guest_count: DEFAULT_GUESTS,
        }
    }
}

impl UserPreferences {
    /// Builds preferences from decoded form pairs. Absent selectors keep their
    /// defaults; `taste` may repeat.
    pub fn from_form<'a, I>(pairs: I) -> crate::utils::error::Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut prefs = Self::default();
        for (key, value) in pairs {
            match key {
                "wine_type" => prefs.wine_type = value.parse()?,
                "price_range" => prefs.price_range = value.parse()?,
                "taste" => {
                    prefs.taste_profile.insert(value.parse()?);
                }
                "meal_type" => prefs.meal_type = value.parse()?,
                "meal_description" => prefs.meal_description = value.to_string(),
                "occasion" => prefs.occasion = value.parse()?,
                "guests" => {
                    let count: u32 = value.trim().parse().map_err(|_| {
                        SommelierError::invalid_input("guests", "must be a whole number")
                    })?;
                    crate::utils::validation::validate_range("guests", count, MIN_GUESTS, MAX_GUESTS)
                        .map_err(|_| {
                            SommelierError::invalid_input(
                                "guests",
                                format!("must be between {} and {}", MIN_GUESTS, MAX_GUESTS),
                            )
                        })?;
                    prefs.guest_count = count;
                }
                _ => {}
            }
        }
        Ok(prefs)
    }
}
