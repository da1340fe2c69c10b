//! Plant library entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    pub enum CareLevel {
        Easy => "easy",
        Moderate => "moderate",
        Difficult => "difficult",
    }
}

text_enum! {
    pub enum Season {
        Spring => "spring",
        Summer => "summer",
        Autumn => "autumn",
        Winter => "winter",
        YearRound => "year_round",
    }
}

impl Season {
    /// Whether a plant marked with `self` is relevant during `other`.
    pub fn covers(&self, other: Season) -> bool {
        *self == Season::YearRound || other == Season::YearRound || *self == other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Plant {
    pub id: Uuid,
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub description: Option<String>,
    pub care_level: CareLevel,
    pub sunlight: Option<String>,
    pub watering: Option<String>,
    pub bloom_season: Option<Season>,
    pub planting_season: Option<Season>,
    pub harvest_season: Option<Season>,
    pub native_region: Option<String>,
    pub image_url: Option<String>,
    pub is_edible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// True if the plant blooms, is planted or is harvested in `season`.
    pub fn in_season(&self, season: Season) -> bool {
        [self.bloom_season, self.planting_season, self.harvest_season]
            .into_iter()
            .flatten()
            .any(|s| s.covers(season))
    }

    pub fn to_input(&self) -> PlantInput {
        PlantInput {
            common_name: self.common_name.clone(),
            scientific_name: self.scientific_name.clone(),
            family: self.family.clone(),
            description: self.description.clone(),
            care_level: self.care_level,
            sunlight: self.sunlight.clone(),
            watering: self.watering.clone(),
            bloom_season: self.bloom_season,
            planting_season: self.planting_season,
            harvest_season: self.harvest_season,
            native_region: self.native_region.clone(),
            image_url: self.image_url.clone(),
            is_edible: self.is_edible,
        }
    }
}

/// Fields an admin can set on a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantInput {
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub description: Option<String>,
    pub care_level: CareLevel,
    pub sunlight: Option<String>,
    pub watering: Option<String>,
    pub bloom_season: Option<Season>,
    pub planting_season: Option<Season>,
    pub harvest_season: Option<Season>,
    pub native_region: Option<String>,
    pub image_url: Option<String>,
    pub is_edible: bool,
}

impl Default for PlantInput {
    fn default() -> Self {
        Self {
            common_name: String::new(),
            scientific_name: None,
            family: None,
            description: None,
            care_level: CareLevel::Easy,
            sunlight: None,
            watering: None,
            bloom_season: None,
            planting_season: None,
            harvest_season: None,
            native_region: None,
            image_url: None,
            is_edible: false,
        }
    }
}

/// Query string of `GET /api/plants`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantFilter {
    pub search: Option<String>,
    pub care_level: Option<CareLevel>,
    pub season: Option<Season>,
    pub edible: Option<bool>,
}

impl PlantFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        if let Some(level) = self.care_level {
            query.push(("care_level", level.to_string()));
        }
        if let Some(season) = self.season {
            query.push(("season", season.to_string()));
        }
        if let Some(edible) = self.edible {
            query.push(("edible", edible.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(bloom: Option<Season>, harvest: Option<Season>) -> Plant {
        let now = Utc::now();
        Plant {
            id: Uuid::new_v4(),
            common_name: "Basil".into(),
            scientific_name: Some("Ocimum basilicum".into()),
            family: Some("Lamiaceae".into()),
            description: None,
            care_level: CareLevel::Easy,
            sunlight: Some("Full sun".into()),
            watering: None,
            bloom_season: bloom,
            planting_season: None,
            harvest_season: harvest,
            native_region: None,
            image_url: None,
            is_edible: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn in_season_checks_every_season_field() {
        let basil = plant(Some(Season::Summer), Some(Season::Autumn));
        assert!(basil.in_season(Season::Summer));
        assert!(basil.in_season(Season::Autumn));
        assert!(!basil.in_season(Season::Winter));
    }

    #[test]
    fn year_round_matches_everything() {
        let ivy = plant(Some(Season::YearRound), None);
        assert!(ivy.in_season(Season::Winter));
        assert!(!plant(None, None).in_season(Season::Spring));
    }

    #[test]
    fn year_round_filter_skips_seasonless_plants() {
        assert!(plant(Some(Season::Spring), None).in_season(Season::YearRound));
        assert!(!plant(None, None).in_season(Season::YearRound));
    }

    #[test]
    fn filter_query_skips_blank_search() {
        let filter = PlantFilter {
            search: Some("  ".into()),
            season: Some(Season::YearRound),
            ..Default::default()
        };
        assert_eq!(filter.to_query(), vec![("season", "year_round".to_string())]);
    }
}
