//! Care directory: hospitals and emergency numbers.
//!
//! The hospital directory always contains the built-in entry and is optionally extended from a
//! CSV table (`name, address, city, latitude, longitude, specialties, contact, rating`, with
//! specialties separated by `;`). Distances are geodesic distances on the WGS84 ellipsoid.

use crate::constants::INTERNATIONAL_COUNTRY;
use crate::store::unavailable;
use crate::{AdvisorError, AdvisorResult};
use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hospital {
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub specialties: Vec<String>,
    pub contact: String,
    pub rating: Option<f64>,
}

impl Hospital {
    pub fn offers(&self, specialty: &str) -> bool {
        let wanted = specialty.trim();
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(wanted))
    }

    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        geodesic_km(latitude, longitude, self.latitude, self.longitude)
    }
}

/// A hospital together with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyHospital {
    pub hospital: Hospital,
    pub distance_km: f64,
}

/// Geodesic distance between two WGS84 coordinates, in kilometres.
pub fn geodesic_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // geo points are (x = longitude, y = latitude).
    Geodesic::distance(Point::new(lon1, lat1), Point::new(lon2, lat2)) / 1000.0
}

fn validate_coordinates(latitude: f64, longitude: f64) -> AdvisorResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AdvisorError::InvalidInput(format!(
            "coordinates out of range: {latitude}, {longitude}"
        )));
    }
    Ok(())
}

const REQUIRED_COLUMNS: [&str; 3] = ["name", "latitude", "longitude"];

#[derive(Debug, Deserialize)]
struct HospitalRow {
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    specialties: String,
    #[serde(default)]
    contact: String,
    #[serde(default)]
    rating: Option<f64>,
}

impl HospitalRow {
    /// `None` for rows without a name or without usable coordinates.
    fn into_hospital(self) -> Option<Hospital> {
        let name = self.name.trim().to_string();
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        if name.is_empty() || validate_coordinates(latitude, longitude).is_err() {
            return None;
        }
        Some(Hospital {
            name,
            address: self.address,
            city: self.city,
            latitude,
            longitude,
            specialties: self
                .specialties
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            contact: self.contact,
            rating: self.rating,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HospitalDirectory {
    hospitals: Vec<Hospital>,
}

impl Default for HospitalDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HospitalDirectory {
    pub fn builtin() -> Self {
        Self {
            hospitals: vec![Hospital {
                name: "City General Hospital".into(),
                address: "123 Main St".into(),
                city: "Metropolis".into(),
                latitude: 12.9716,
                longitude: 77.5946,
                specialties: vec!["Emergency".into(), "Cardiology".into(), "Pediatrics".into()],
                contact: "555-1234".into(),
                rating: Some(4.5),
            }],
        }
    }

    /// Built-in hospitals followed by the rows of a CSV table.
    ///
    /// Rows that cannot be parsed, or that have a blank name or missing or out-of-range
    /// coordinates, are skipped one by one.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::DataSourceUnavailable` if the header cannot be read or lacks one
    /// of the `name`, `latitude` and `longitude` columns.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> AdvisorResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| unavailable(source_name, e))?;
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(unavailable(
                source_name,
                format!("missing '{missing}' column"),
            ));
        }

        let mut directory = Self::builtin();
        for (index, row) in csv_reader.deserialize::<HospitalRow>().enumerate() {
            let hospital = match row {
                Ok(row) => row.into_hospital(),
                Err(e) => {
                    tracing::warn!("skipping hospital row {} in {}: {}", index + 1, source_name, e);
                    continue;
                }
            };
            match hospital {
                Some(hospital) => directory.hospitals.push(hospital),
                None => tracing::debug!("skipping unusable hospital row {} in {}", index + 1, source_name),
            }
        }

        tracing::info!(
            "loaded {} hospitals from {}",
            directory.hospitals.len() - 1,
            source_name
        );
        Ok(directory)
    }

    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| unavailable(&source_name, e))?;
        Self::from_reader(file, &source_name)
    }

    /// Loads the optional hospital table.
    ///
    /// A missing file is not an error: the table is optional. Any other failure degrades to the
    /// built-in directory and is returned as a warning.
    pub fn load_or_builtin(path: &Path) -> (Self, Option<AdvisorError>) {
        if !path.exists() {
            tracing::debug!("no hospital table at {}", path.display());
            return (Self::builtin(), None);
        }
        match Self::load(path) {
            Ok(directory) => (directory, None),
            Err(e) => {
                tracing::warn!("hospital table unavailable, using built-in list: {}", e);
                (Self::builtin(), Some(e))
            }
        }
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// Up to `limit` hospitals ordered by distance, optionally restricted to one specialty.
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::InvalidInput` for coordinates outside the valid range.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        specialty: Option<&str>,
        limit: usize,
    ) -> AdvisorResult<Vec<NearbyHospital>> {
        validate_coordinates(latitude, longitude)?;

        let mut nearby: Vec<NearbyHospital> = self
            .hospitals
            .iter()
            .filter(|h| specialty.is_none_or(|s| h.offers(s)))
            .map(|h| NearbyHospital {
                distance_km: h.distance_km(latitude, longitude),
                hospital: h.clone(),
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby.truncate(limit);
        Ok(nearby)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyNumber {
    pub country: &'static str,
    pub number: &'static str,
}

/// Static emergency numbers by country.
#[derive(Debug, Clone)]
pub struct EmergencyDirectory {
    entries: Vec<EmergencyNumber>,
}

impl Default for EmergencyDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmergencyDirectory {
    pub fn builtin() -> Self {
        let entries = [
            (INTERNATIONAL_COUNTRY, "112"),
            ("United States", "911"),
            ("India", "112"),
            ("United Kingdom", "999"),
        ]
        .into_iter()
        .map(|(country, number)| EmergencyNumber { country, number })
        .collect();
        Self { entries }
    }

    pub fn all(&self) -> &[EmergencyNumber] {
        &self.entries
    }

    /// Case-insensitive lookup, falling back to the international number.
    pub fn lookup(&self, country: &str) -> &EmergencyNumber {
        let wanted = country.trim();
        self.entries
            .iter()
            .find(|e| e.country.eq_ignore_ascii_case(wanted))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.country == INTERNATIONAL_COUNTRY)
            })
            .unwrap_or(&self.entries[0])
    }
}
