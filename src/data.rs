//! Per-species datasets read from the data directory
//!
//! | file                                   | keyed by                   |
//! |----------------------------------------|----------------------------|
//! | `reasons_of_endangerment.csv`          | `Species` column           |
//! | `endangered_species_population.csv`    | one column per species     |
//! | `endangered_status_data.csv`           | one column per species     |
//! | `cleaned_species_distribution.geojson` | `Species` feature property |

use crate::error::DataError;
use crate::species::Species;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

pub const THREATS_FILE: &str = "reasons_of_endangerment.csv";
pub const POPULATION_FILE: &str = "endangered_species_population.csv";
pub const STATUS_FILE: &str = "endangered_status_data.csv";
pub const DISTRIBUTION_FILE: &str = "cleaned_species_distribution.geojson";

/// Threat categories and their CSV columns, in legend order.
pub const THREAT_COLUMNS: [(&str, &str); 6] = [
    ("Habitat Loss", "Habitat Loss (%)"),
    ("Poaching", "Poaching (%)"),
    ("Climate Change", "Climate Change (%)"),
    ("Pollution", "Pollution (%)"),
    ("Human-Wildlife Conflict", "Human-Wildlife Conflict (%)"),
    ("Other", "Other (%)"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Threat {
    pub category: &'static str,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct YearPoint {
    pub year: i32,
    pub population: f64,
    pub status: String,
}

impl YearPoint {
    pub fn is_endangered(&self) -> bool {
        self.status == "Endangered"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CountryPoint {
    pub country: String,
    pub lon: f64,
    pub lat: f64,
}

/// Threats for `species`, keeping only categories above zero.
/// `Ok(None)` when the species has no row.
pub fn parse_threats<R: Read>(
    reader: R,
    species: Species,
) -> Result<Option<Vec<Threat>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let Some(species_col) = column("Species") else {
        return Ok(None);
    };

    for record in reader.records() {
        let record = record?;
        if record.get(species_col).map(str::trim) != Some(species.label()) {
            continue;
        }
        let threats = THREAT_COLUMNS
            .iter()
            .filter_map(|&(category, header)| {
                let percent = column(header)
                    .and_then(|i| record.get(i))
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .unwrap_or(0.0);
                (percent > 0.0).then_some(Threat { category, percent })
            })
            .collect();
        return Ok(Some(threats));
    }
    Ok(None)
}

/// Population by year from the species' column. Rows with a missing, zero
/// or unparsable value are dropped.
pub fn parse_population<R: Read>(
    reader: R,
    species: Species,
) -> Result<Vec<(i32, f64)>, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let year_col = headers.iter().position(|h| h.trim() == "Year");
    let species_col = headers.iter().position(|h| h.trim() == species.label());
    let (Some(year_col), Some(species_col)) = (year_col, species_col) else {
        return Ok(Vec::new());
    };

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let year = record.get(year_col).and_then(|v| v.trim().parse::<i32>().ok());
        let population = record.get(species_col).and_then(|v| v.trim().parse::<f64>().ok());
        if let (Some(year), Some(population)) = (year, population) {
            if population != 0.0 && population.is_finite() {
                points.push((year, population));
            }
        }
    }
    points.sort_by_key(|&(year, _)| year);
    Ok(points)
}

/// Conservation status by year from the species' column.
pub fn parse_status<R: Read>(
    reader: R,
    species: Species,
) -> Result<HashMap<i32, String>, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let year_col = headers.iter().position(|h| h.trim() == "Year");
    let species_col = headers.iter().position(|h| h.trim() == species.label());

    let mut statuses = HashMap::new();
    let Some(year_col) = year_col else {
        return Ok(statuses);
    };
    for record in reader.records() {
        let record = record?;
        let Some(year) = record.get(year_col).and_then(|v| v.trim().parse::<i32>().ok()) else {
            continue;
        };
        let status = species_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown");
        statuses.insert(year, status.to_string());
    }
    Ok(statuses)
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: HashMap<String, serde_json::Value>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

/// Countries where `species` occurs, with their centroid when the feature
/// carries point geometry. Duplicate countries are merged.
pub fn parse_distribution(
    json: &str,
    species: Species,
) -> Result<Vec<CountryPoint>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_str(json)?;
    let mut countries: Vec<CountryPoint> = Vec::new();

    for feature in collection.features {
        let prop = |key: &str| feature.properties.get(key).and_then(|v| v.as_str());
        if prop("Species") != Some(species.label()) {
            continue;
        }
        let Some(country) = prop("Country") else {
            continue;
        };
        if countries.iter().any(|c| c.country == country) {
            continue;
        }
        let (lon, lat) = feature
            .geometry
            .as_ref()
            .filter(|g| g.kind == "Point")
            .and_then(|g| {
                let c = g.coordinates.as_array()?;
                Some((c.first()?.as_f64()?, c.get(1)?.as_f64()?))
            })
            .unwrap_or((f64::NAN, f64::NAN));
        countries.push(CountryPoint { country: country.to_string(), lon, lat });
    }
    Ok(countries)
}

/// File-backed access to the datasets. Every read goes to disk; nothing is cached.
#[derive(Clone, Debug)]
pub struct Dataset {
    dir: PathBuf,
}

impl Dataset {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn open(&self, name: &str) -> Result<(PathBuf, fs::File), DataError> {
        let path = self.dir.join(name);
        let file = fs::File::open(&path).map_err(|e| DataError::io(&path, e))?;
        Ok((path, file))
    }

    pub fn threats(&self, species: Species) -> Result<Option<Vec<Threat>>, DataError> {
        let (path, file) = self.open(THREATS_FILE)?;
        parse_threats(file, species).map_err(|e| DataError::csv(path, e))
    }

    /// Population series joined with per-year status.
    pub fn trend(&self, species: Species) -> Result<Vec<YearPoint>, DataError> {
        let (path, file) = self.open(POPULATION_FILE)?;
        let population = parse_population(file, species).map_err(|e| DataError::csv(path, e))?;

        // Status is decoration: without it every point reads "Unknown"
        let statuses = match self.open(STATUS_FILE) {
            Ok((path, file)) => parse_status(file, species).map_err(|e| DataError::csv(path, e)),
            Err(e) => Err(e),
        }
        .unwrap_or_else(|e| {
            log::warn!("status data unavailable: {}", e);
            HashMap::new()
        });

        Ok(population
            .into_iter()
            .map(|(year, population)| YearPoint {
                year,
                population,
                status: statuses.get(&year).cloned().unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect())
    }

    pub fn distribution(&self, species: Species) -> Result<Vec<CountryPoint>, DataError> {
        let path = self.dir.join(DISTRIBUTION_FILE);
        let json = fs::read_to_string(&path).map_err(|e| DataError::io(&path, e))?;
        parse_distribution(&json, species)
            .map_err(|e| DataError::json(path.display().to_string(), e))
    }
}
