//! Click log store
//!
//! Holds the user click events in log order and answers the lookups the
//! recommenders need. Log order is the natural ordering used for every
//! tie-break downstream.

use crate::types::{ItemId, RawId, UserId};
use article_reco_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A single click of a user on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId) -> Self {
        Self { user_id, item_id }
    }
}

/// Click row as exported upstream, before identifier coercion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRecord {
    pub user_id: RawId,
    #[serde(alias = "item_id")]
    pub click_article_id: RawId,
}

/// Indexed, immutable click log
#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    events: Vec<Interaction>,
    /// user -> event positions, ascending
    by_user: HashMap<UserId, Vec<usize>>,
}

impl InteractionStore {
    pub fn new(events: Vec<Interaction>) -> Self {
        let mut by_user: HashMap<UserId, Vec<usize>> = HashMap::new();
        for (pos, event) in events.iter().enumerate() {
            by_user.entry(event.user_id).or_default().push(pos);
        }
        Self { events, by_user }
    }

    /// Build from raw rows, coercing every identifier once
    pub fn from_records(records: &[ClickRecord]) -> Result<Self> {
        let events = records
            .iter()
            .map(|r| -> Result<Interaction> {
                Ok(Interaction::new(r.user_id.to_id()?, r.click_article_id.to_id()?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(events))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Interaction] {
        &self.events
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.by_user.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Items clicked by the user in log order, one entry per click
    pub fn items_read_by(&self, user_id: UserId) -> Vec<ItemId> {
        self.by_user
            .get(&user_id)
            .map(|positions| positions.iter().map(|&p| self.events[p].item_id).collect())
            .unwrap_or_default()
    }

    pub fn read_set(&self, user_id: UserId) -> HashSet<ItemId> {
        self.items_read_by(user_id).into_iter().collect()
    }

    /// Distinct items in order of first appearance
    pub fn distinct_items(&self) -> Vec<ItemId> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .filter(|e| seen.insert(e.item_id))
            .map(|e| e.item_id)
            .collect()
    }

    /// Click count per item, descending; ties keep first-appearance order
    pub fn popularity(&self) -> Vec<(ItemId, usize)> {
        let mut order: Vec<ItemId> = Vec::new();
        let mut counts: HashMap<ItemId, usize> = HashMap::new();
        for event in &self.events {
            let count = counts.entry(event.item_id).or_insert_with(|| {
                order.push(event.item_id);
                0
            });
            *count += 1;
        }

        let mut ranked: Vec<(ItemId, usize)> =
            order.into_iter().map(|item| (item, counts[&item])).collect();
        // stable: equal counts stay in first-appearance order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Top `n` items by click count
    pub fn most_popular(&self, n: usize) -> Vec<ItemId> {
        self.popularity()
            .into_iter()
            .take(n)
            .map(|(item, _)| item)
            .collect()
    }

    /// Users who clicked at least one item the target clicked, the target
    /// included, in order of first qualifying click
    pub fn similar_users(&self, user_id: UserId) -> Vec<UserId> {
        let read = self.read_set(user_id);
        let mut seen = HashSet::new();
        self.events
            .iter()
            .filter(|e| read.contains(&e.item_id))
            .filter(|e| seen.insert(e.user_id))
            .map(|e| e.user_id)
            .collect()
    }

    /// Items clicked by the target's similar users that the target has not
    /// read, unique, in log order
    pub fn co_reader_items(&self, user_id: UserId) -> Vec<ItemId> {
        let read = self.read_set(user_id);
        let similar: HashSet<UserId> = self.similar_users(user_id).into_iter().collect();
        let mut seen = HashSet::new();
        self.events
            .iter()
            .filter(|e| similar.contains(&e.user_id))
            .filter(|e| seen.insert(e.item_id))
            .map(|e| e.item_id)
            .filter(|item| !read.contains(item))
            .collect()
    }

    /// Click count per (user, item), ordered by user then item
    pub fn click_counts(&self) -> Vec<(UserId, ItemId, u32)> {
        let mut grouped: BTreeMap<(UserId, ItemId), u32> = BTreeMap::new();
        for event in &self.events {
            *grouped.entry((event.user_id, event.item_id)).or_insert(0) += 1;
        }
        grouped
            .into_iter()
            .map(|((user, item), count)| (user, item, count))
            .collect()
    }
}

impl FromIterator<Interaction> for InteractionStore {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
