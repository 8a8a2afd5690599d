//! QuestCatalog - The canonical quest set and lookups over it

use crate::{Quest, QuestId, ViewportBounds};
use geo::{BoundingRect, MultiPoint};
use std::collections::HashMap;
use std::sync::Arc;

/// Canonical set of loaded quests, in fetch order
///
/// Ids are unique: when a set with repeated ids is installed, the first
/// occurrence wins and the rest are dropped.
#[derive(Clone, Debug, Default)]
pub struct QuestCatalog {
    quests: Vec<Arc<Quest>>,
    /// Position of each quest in `quests`
    index: HashMap<QuestId, usize>,
}

impl QuestCatalog {
    /// Build a catalog from fetched quests
    pub fn from_quests(quests: Vec<Quest>) -> Self {
        let mut catalog = Self {
            quests: Vec::with_capacity(quests.len()),
            index: HashMap::with_capacity(quests.len()),
        };

        for quest in quests {
            if catalog.index.contains_key(quest.id()) {
                tracing::warn!("Dropping quest with duplicate id {}", quest.id());
                continue;
            }
            catalog
                .index
                .insert(quest.id().clone(), catalog.quests.len());
            catalog.quests.push(Arc::new(quest));
        }

        catalog
    }

    /// Look up a single quest by id
    #[inline]
    pub fn get(&self, id: &QuestId) -> Option<&Arc<Quest>> {
        self.index.get(id).and_then(|&i| self.quests.get(i))
    }

    #[inline]
    pub fn contains(&self, id: &QuestId) -> bool {
        self.index.contains_key(id)
    }

    /// Quests created by the given account, in canonical order
    pub fn owned_by<'a>(&'a self, owner_id: &'a str) -> impl Iterator<Item = &'a Arc<Quest>> {
        self.quests
            .iter()
            .filter(move |quest| quest.owner().id == owner_id)
    }

    #[inline]
    pub fn quests(&self) -> &[Arc<Quest>] {
        &self.quests
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Quest>> {
        self.quests.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Extent of all anchor locations, `None` when the catalog is empty
    pub fn bounding_box(&self) -> Option<ViewportBounds> {
        let anchors: MultiPoint<f64> = self
            .quests
            .iter()
            .map(|quest| quest.anchor_location().to_point())
            .collect();

        anchors.bounding_rect().map(|rect| ViewportBounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }
}

impl<'a> IntoIterator for &'a QuestCatalog {
    type Item = &'a Arc<Quest>;
    type IntoIter = std::slice::Iter<'a, Arc<Quest>>;

    fn into_iter(self) -> Self::IntoIter {
        self.quests.iter()
    }
}
