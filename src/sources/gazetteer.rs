use async_trait::async_trait;
use std::collections::HashMap;

use crate::models::Coordinate;
use crate::sources::{LocationResolver, SourceError};
use crate::utils::constants::{DEFAULT_CITY, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};

/// Local place-name table used in place of a network geocoder.
/// Names match case-insensitively, ignoring surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct PlaceGazetteer {
    places: HashMap<String, Coordinate>,
}

impl PlaceGazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gazetteer that only knows the default city.
    pub fn with_default_city() -> Self {
        let mut gazetteer = Self::new();
        gazetteer.insert(
            DEFAULT_CITY,
            Coordinate::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
        );
        gazetteer
    }

    pub fn insert(&mut self, name: &str, coordinate: Coordinate) {
        self.places.insert(Self::normalize(name), coordinate);
    }

    pub fn lookup(&self, name: &str) -> Option<Coordinate> {
        self.places.get(&Self::normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn normalize(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

impl<'a> FromIterator<(&'a str, Coordinate)> for PlaceGazetteer {
    fn from_iter<I: IntoIterator<Item = (&'a str, Coordinate)>>(iter: I) -> Self {
        let mut gazetteer = Self::new();
        for (name, coordinate) in iter {
            gazetteer.insert(name, coordinate);
        }
        gazetteer
    }
}

#[async_trait]
impl LocationResolver for PlaceGazetteer {
    async fn resolve(&self, place: &str) -> Result<Option<Coordinate>, SourceError> {
        Ok(self.lookup(place))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let gazetteer: PlaceGazetteer =
            [("Paris", Coordinate::new(48.8566, 2.3522))].into_iter().collect();

        assert_eq!(gazetteer.lookup("paris"), Some(Coordinate::new(48.8566, 2.3522)));
        assert_eq!(gazetteer.lookup("  PARIS "), Some(Coordinate::new(48.8566, 2.3522)));
        assert_eq!(gazetteer.lookup("Lyon"), None);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_none() {
        let gazetteer = PlaceGazetteer::with_default_city();
        assert_eq!(gazetteer.len(), 1);
        assert!(gazetteer.resolve("Atlantis").await.unwrap().is_none());
        assert_eq!(
            gazetteer.resolve("los angeles").await.unwrap(),
            Some(Coordinate::new(34.0522, -118.2437))
        );
    }
}
