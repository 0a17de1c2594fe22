//! In-memory secondary index: topic -> storage locations.
//!
//! A location is listed under a topic iff the block stored there has that
//! topic as a key of its `header.index`. The index is a cache; it is rebuilt
//! from storage on startup and never pruned.

use shared_types::Location;
use std::collections::{HashMap, HashSet};

/// Locations of one topic: insertion order plus a membership set.
#[derive(Debug, Clone, Default)]
struct TopicLocations {
    ordered: Vec<Location>,
    known: HashSet<Location>,
}

impl TopicLocations {
    fn insert(&mut self, location: &str) {
        if !self.known.contains(location) {
            self.known.insert(location.to_string());
            self.ordered.push(location.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationByTopic {
    locations: HashMap<String, TopicLocations>,
}

impl LocationByTopic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `location` under every topic of the block stored there.
    ///
    /// Lists keep insertion order and never hold the same location twice.
    pub fn push_location_indexed_with_block_topics<'a, I>(&mut self, location: &str, topics: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for topic in topics {
            self.locations
                .entry(topic.clone())
                .or_default()
                .insert(location);
        }
    }

    /// Locations registered for `topic`, in insertion order.
    pub fn get_locations_from_topic(&self, topic: &str) -> Vec<Location> {
        self.locations
            .get(topic)
            .map(|entry| entry.ordered.clone())
            .unwrap_or_default()
    }

    pub fn topic_count(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_unknown_topic_is_empty() {
        assert!(LocationByTopic::new()
            .get_locations_from_topic("0xaaaa")
            .is_empty());
    }

    #[test]
    fn test_locations_kept_in_insertion_order() {
        let mut index = LocationByTopic::new();
        index.push_location_indexed_with_block_topics("loc2", &topics(&["0xaaaa", "0xbbbb"]));
        index.push_location_indexed_with_block_topics("loc1", &topics(&["0xaaaa"]));

        assert_eq!(index.get_locations_from_topic("0xaaaa"), vec!["loc2", "loc1"]);
        assert_eq!(index.get_locations_from_topic("0xbbbb"), vec!["loc2"]);
        assert_eq!(index.topic_count(), 2);
    }

    #[test]
    fn test_same_location_never_listed_twice() {
        let mut index = LocationByTopic::new();
        index.push_location_indexed_with_block_topics("loc1", &topics(&["0xaaaa", "0xaaaa"]));
        index.push_location_indexed_with_block_topics("loc2", &topics(&["0xaaaa"]));
        index.push_location_indexed_with_block_topics("loc1", &topics(&["0xaaaa"]));

        assert_eq!(index.get_locations_from_topic("0xaaaa"), vec!["loc1", "loc2"]);
    }

    #[test]
    fn test_large_topic_keeps_order_without_duplicates() {
        let mut index = LocationByTopic::new();
        let topic = topics(&["0xaaaa"]);
        let locations: Vec<String> = (0..5_000).map(|i| format!("loc{i:05}")).collect();

        for location in &locations {
            index.push_location_indexed_with_block_topics(location, &topic);
        }
        for location in locations.iter().rev() {
            index.push_location_indexed_with_block_topics(location, &topic);
        }

        assert_eq!(index.get_locations_from_topic("0xaaaa"), locations);
    }
}
