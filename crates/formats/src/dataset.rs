use std::collections::{BTreeMap, HashSet};

use foundation::geometry::{self, Geometry, GeometryError};
use foundation::ids::CountryId;
use foundation::math::LonLat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adjacency::AdjacencyGraph;
use crate::geojson::FeatureCollection;

/// Property carrying the stable country id.
pub const ID_PROPERTY: &str = "NE_ID";
/// Property carrying the display name.
pub const NAME_PROPERTY: &str = "NAME";

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub geometry: Geometry,
}

impl Country {
    pub fn centroid(&self) -> Result<LonLat, GeometryError> {
        geometry::centroid(&self.geometry)
    }

    pub fn bounding_angular_radius(&self) -> Result<f64, GeometryError> {
        geometry::bounding_angular_radius(&self.geometry)
    }

    pub fn contains(&self, p: LonLat) -> bool {
        geometry::contains(&self.geometry, p).unwrap_or(false)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum DetailLevel {
    #[default]
    Low,
    High,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

#[derive(Debug)]
pub enum DatasetError {
    MissingId { index: usize },
    CountryGeometry { id: CountryId, source: GeometryError },
    DuplicateEligible(CountryId),
    UnknownEligible(CountryId),
    UnknownTierCountry { tier: Difficulty, id: CountryId },
    DuplicateTierCountry { tier: Difficulty, id: CountryId },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::MissingId { index } => {
                write!(f, "country feature {index} has no {ID_PROPERTY}")
            }
            DatasetError::CountryGeometry { id, source } => {
                write!(f, "country {id}: {source}")
            }
            DatasetError::DuplicateEligible(id) => {
                write!(f, "country {id} appears twice in the eligible pool")
            }
            DatasetError::UnknownEligible(id) => {
                write!(f, "eligible country {id} is not in the country dataset")
            }
            DatasetError::UnknownTierCountry { tier, id } => {
                write!(f, "{tier} tier lists country {id}, which is not eligible")
            }
            DatasetError::DuplicateTierCountry { tier, id } => {
                write!(f, "{tier} tier lists country {id} more than once")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

/// Geometry for one resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailSet {
    pub countries: Vec<Country>,
    pub rivers: Vec<Geometry>,
    pub lakes: Vec<Geometry>,
}

impl DetailSet {
    pub fn new(countries: Vec<Country>, rivers: Vec<Geometry>, lakes: Vec<Geometry>) -> Self {
        Self {
            countries,
            rivers,
            lakes,
        }
    }

    /// Builds countries from features carrying `NE_ID`/`NAME` properties.
    ///
    /// Country geometry must be areal; anything else is rejected here so the
    /// scoring kernel only ever sees polygons from the dataset.
    pub fn from_collections(
        countries: &FeatureCollection,
        rivers: Option<&FeatureCollection>,
        lakes: Option<&FeatureCollection>,
    ) -> Result<Self, DatasetError> {
        let mut out = Vec::with_capacity(countries.features.len());
        for (index, feature) in countries.features.iter().enumerate() {
            let id = feature
                .property_i64(ID_PROPERTY)
                .or_else(|| feature.id.as_deref().and_then(|s| s.parse().ok()))
                .map(CountryId)
                .ok_or(DatasetError::MissingId { index })?;
            feature
                .geometry
                .polygons()
                .map_err(|source| DatasetError::CountryGeometry { id, source })?;
            let name = feature
                .property_str(NAME_PROPERTY)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{id}"));
            out.push(Country {
                id,
                name,
                geometry: feature.geometry.clone(),
            });
        }

        let geometries = |fc: Option<&FeatureCollection>| -> Vec<Geometry> {
            fc.map(|fc| fc.features.iter().map(|f| f.geometry.clone()).collect())
                .unwrap_or_default()
        };

        Ok(Self::new(out, geometries(rivers), geometries(lakes)))
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    /// First country whose polygon contains `p`, in dataset order.
    pub fn country_at(&self, p: LonLat) -> Option<&Country> {
        self.countries.iter().find(|c| c.contains(p))
    }
}

/// Everything the engine needs, loaded once at startup and passed around explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    low: DetailSet,
    high: DetailSet,
    adjacency: AdjacencyGraph,
    eligible: Vec<CountryId>,
    tiers: BTreeMap<Difficulty, Vec<CountryId>>,
}

impl Dataset {
    /// Validates the pool invariants: eligible ids are unique and resolve in the
    /// high-detail country set; tier ids are eligible and unique per tier.
    pub fn new(
        low: DetailSet,
        high: DetailSet,
        adjacency: AdjacencyGraph,
        eligible: Vec<CountryId>,
        tiers: BTreeMap<Difficulty, Vec<CountryId>>,
    ) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(eligible.len());
        for &id in &eligible {
            if !seen.insert(id) {
                return Err(DatasetError::DuplicateEligible(id));
            }
            if high.country(id).is_none() {
                return Err(DatasetError::UnknownEligible(id));
            }
        }
        for (&tier, ids) in &tiers {
            let mut in_tier = HashSet::with_capacity(ids.len());
            for &id in ids {
                if !seen.contains(&id) {
                    return Err(DatasetError::UnknownTierCountry { tier, id });
                }
                if !in_tier.insert(id) {
                    return Err(DatasetError::DuplicateTierCountry { tier, id });
                }
            }
        }

        let missing_adjacency = eligible.iter().filter(|id| !adjacency.contains(**id)).count();
        if missing_adjacency > 0 {
            warn!(missing_adjacency, "eligible countries without an adjacency entry");
        }

        Ok(Self {
            low,
            high,
            adjacency,
            eligible,
            tiers,
        })
    }

    /// Single-resolution dataset where every country is eligible.
    pub fn from_detail_set(set: DetailSet, adjacency: AdjacencyGraph) -> Result<Self, DatasetError> {
        let eligible = set.countries.iter().map(|c| c.id).collect();
        Self::new(set.clone(), set, adjacency, eligible, BTreeMap::new())
    }

    pub fn detail(&self, level: DetailLevel) -> &DetailSet {
        match level {
            DetailLevel::Low => &self.low,
            DetailLevel::High => &self.high,
        }
    }

    /// Authoritative (high-detail) country record, used for scoring.
    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.high.country(id)
    }

    pub fn adjacency(&self) -> &AdjacencyGraph {
        &self.adjacency
    }

    pub fn eligible(&self) -> &[CountryId] {
        &self.eligible
    }

    /// Pool for a tier, or the full eligible pool when `tier` is `None`.
    ///
    /// A tier missing from the partition yields an empty pool.
    pub fn pool(&self, tier: Option<Difficulty>) -> &[CountryId] {
        match tier {
            None => &self.eligible,
            Some(t) => self.tiers.get(&t).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn has_tiers(&self) -> bool {
        !self.tiers.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use super::{Country, Dataset, DatasetError, DetailLevel, DetailSet, Difficulty};
    use crate::adjacency::AdjacencyGraph;
    use crate::geojson::FeatureCollection;
    use foundation::geometry::Geometry;
    use foundation::ids::CountryId;
    use foundation::math::LonLat;

    pub(crate) fn square_country(id: i64, lon: f64, lat: f64, size: f64) -> Country {
        Country {
            id: CountryId(id),
            name: format!("Country {id}"),
            geometry: Geometry::Polygon(vec![vec![
                LonLat::new(lon, lat),
                LonLat::new(lon + size, lat),
                LonLat::new(lon + size, lat + size),
                LonLat::new(lon, lat + size),
                LonLat::new(lon, lat),
            ]]),
        }
    }

    fn set() -> DetailSet {
        DetailSet::new(
            vec![square_country(1, 0.0, 0.0, 5.0), square_country(2, 5.0, 0.0, 5.0)],
            vec![],
            vec![],
        )
    }

    #[test]
    fn country_lookup_and_hit_test() {
        let s = set();
        assert_eq!(s.country(CountryId(2)).map(|c| c.name.as_str()), Some("Country 2"));
        assert_eq!(s.country_at(LonLat::new(7.0, 2.0)).map(|c| c.id), Some(CountryId(2)));
        assert_eq!(s.country_at(LonLat::new(-20.0, 2.0)), None);
    }

    #[test]
    fn rejects_duplicate_and_unknown_pool_entries() {
        let dup = Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(1), CountryId(1)], BTreeMap::new());
        assert!(matches!(dup, Err(DatasetError::DuplicateEligible(CountryId(1)))));

        let unknown = Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(9)], BTreeMap::new());
        assert!(matches!(unknown, Err(DatasetError::UnknownEligible(CountryId(9)))));

        let mut tiers = BTreeMap::new();
        tiers.insert(Difficulty::Hard, vec![CountryId(2)]);
        let bad_tier = Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(1)], tiers);
        assert!(matches!(
            bad_tier,
            Err(DatasetError::UnknownTierCountry { tier: Difficulty::Hard, id: CountryId(2) })
        ));
    }

    #[test]
    fn rejects_repeated_tier_entries() {
        let mut tiers = BTreeMap::new();
        tiers.insert(Difficulty::Easy, vec![CountryId(1), CountryId(1), CountryId(2)]);
        let repeated = Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(1), CountryId(2)], tiers);
        assert!(matches!(
            repeated,
            Err(DatasetError::DuplicateTierCountry { tier: Difficulty::Easy, id: CountryId(1) })
        ));

        let mut shared = BTreeMap::new();
        shared.insert(Difficulty::Easy, vec![CountryId(1)]);
        shared.insert(Difficulty::Hard, vec![CountryId(1), CountryId(2)]);
        assert!(Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(1), CountryId(2)], shared).is_ok());
    }

    #[test]
    fn pools_by_tier() {
        let mut tiers = BTreeMap::new();
        tiers.insert(Difficulty::Easy, vec![CountryId(2)]);
        let ds = Dataset::new(set(), set(), AdjacencyGraph::new(), vec![CountryId(1), CountryId(2)], tiers)
            .expect("dataset");
        assert_eq!(ds.pool(None).len(), 2);
        assert_eq!(ds.pool(Some(Difficulty::Easy)), &[CountryId(2)]);
        assert!(ds.pool(Some(Difficulty::Hard)).is_empty());
        assert_eq!(ds.detail(DetailLevel::Low).countries.len(), 2);
    }

    #[test]
    fn builds_countries_from_features() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NE_ID":42,"NAME":"Answerland"},
             "geometry":{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,0]]]]}}
        ]}"#;
        let fc = FeatureCollection::from_geojson_str(payload).expect("parse");
        let s = DetailSet::from_collections(&fc, None, None).expect("detail set");
        assert_eq!(s.countries[0].id, CountryId(42));
        assert_eq!(s.countries[0].name, "Answerland");

        let line = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NE_ID":43},
             "geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}
        ]}"#;
        let fc = FeatureCollection::from_geojson_str(line).expect("parse");
        assert!(matches!(
            DetailSet::from_collections(&fc, None, None),
            Err(DatasetError::CountryGeometry { id: CountryId(43), .. })
        ));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
