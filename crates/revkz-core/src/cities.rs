//! Whitelist of Kazakhstan cities accepted for business branches.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Built-in city list, in the order the UI presents it.
pub const KZ_CITIES: [&str; 20] = [
    "Алматы",
    "Астана",
    "Шымкент",
    "Караганда",
    "Актобе",
    "Тараз",
    "Павлодар",
    "Усть-Каменогорск",
    "Семей",
    "Костанай",
    "Кызылорда",
    "Атырау",
    "Уральск",
    "Актау",
    "Петропавловск",
    "Туркестан",
    "Кокшетау",
    "Талдыкорган",
    "Жезказган",
    "Рудный",
];

/// Trims and collapses internal whitespace runs to a single space.
#[must_use]
pub fn normalize_city(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Immutable set of accepted city names.
///
/// Membership is an exact string match after [`normalize_city`]; case is
/// significant, matching how the names are offered to users.
#[derive(Debug, Clone)]
pub struct CityWhitelist {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl CityWhitelist {
    /// Builds a whitelist from arbitrary names. Names are normalized and
    /// deduplicated; blank entries are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for name in names {
            let city = normalize_city(name.as_ref());
            if city.is_empty() {
                continue;
            }
            if lookup.insert(city.clone()) {
                ordered.push(city);
            }
        }
        Self { ordered, lookup }
    }

    /// Returns the normalized form of `raw` if it is on the list.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let city = normalize_city(raw);
        self.lookup.contains(&city).then_some(city)
    }

    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_some()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.ordered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl Default for CityWhitelist {
    fn default() -> Self {
        Self::new(KZ_CITIES)
    }
}

#[derive(Debug, Deserialize)]
struct CitiesFile {
    cities: Vec<String>,
}

/// Loads the city whitelist, using the built-in list when `path` is `None`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if it
/// yields no usable city names.
pub fn load_cities(path: Option<&Path>) -> Result<CityWhitelist, ConfigError> {
    let Some(path) = path else {
        return Ok(CityWhitelist::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: CitiesFile = serde_yaml::from_str(&content).map_err(ConfigError::CitiesFileParse)?;

    let whitelist = CityWhitelist::new(&file.cities);
    if whitelist.is_empty() {
        return Err(ConfigError::Validation(
            "cities list must contain at least one non-empty name".to_string(),
        ));
    }
    Ok(whitelist)
}
