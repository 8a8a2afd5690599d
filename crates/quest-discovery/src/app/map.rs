//! Map capability for a terminal session
//!
//! There is no map widget to drive, so commands are logged and the latest
//! camera target and highlight are kept for the rendered view.

use quest_discovery_lib::{FlyTo, LatLng, MapCapability, QuestId};

#[derive(Debug, Default)]
pub struct ConsoleMap {
    /// Target of the most recent fly-to
    camera: Option<LatLng>,
    /// Marker currently highlighted
    highlighted: Option<QuestId>,
    fly_to_count: usize,
}

impl ConsoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn camera(&self) -> Option<LatLng> {
        self.camera
    }

    #[inline]
    pub fn highlighted(&self) -> Option<&QuestId> {
        self.highlighted.as_ref()
    }

    #[inline]
    pub fn fly_to_count(&self) -> usize {
        self.fly_to_count
    }
}

impl MapCapability for ConsoleMap {
    fn fly_to(&mut self, command: &FlyTo) {
        tracing::info!("Map: fly to {} (#{})", command.target, command.request_id);
        self.camera = Some(command.target);
        self.fly_to_count += 1;
    }

    fn highlight(&mut self, id: Option<&QuestId>) {
        if self.highlighted.as_ref() != id {
            match id {
                Some(id) => tracing::debug!("Map: highlight marker {id}"),
                None => tracing::debug!("Map: clear highlight"),
            }
        }
        self.highlighted = id.cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_map_records_commands() {
        let mut map = ConsoleMap::new();
        let target = LatLng::new(48.85, 2.35);
        map.fly_to(&FlyTo {
            request_id: 1,
            target,
        });
        map.fly_to(&FlyTo {
            request_id: 2,
            target,
        });
        assert_eq!(map.camera(), Some(target));
        assert_eq!(map.fly_to_count(), 2);

        map.highlight(Some(&QuestId::from("q")));
        assert_eq!(map.highlighted(), Some(&QuestId::from("q")));
        map.highlight(None);
        assert!(map.highlighted().is_none());
    }
}
