use crate::input::DisplayBackend;

/// A display rectangle as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    pub id: usize,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub center_x: i32,
    pub center_y: i32,
}

impl MonitorInfo {
    pub fn from_region(id: usize, region: Region) -> Self {
        Self {
            id,
            x1: region.left,
            y1: region.top,
            x2: region.right,
            y2: region.bottom,
            center_x: (region.left + region.right).div_euclid(2),
            center_y: (region.top + region.bottom).div_euclid(2),
        }
    }

    /// Inclusive on all four edges, so a point on a shared border belongs to
    /// whichever monitor was enumerated first.
    pub fn contains(&self, point: (i32, i32)) -> bool {
        point.0 >= self.x1 && point.0 <= self.x2 && point.1 >= self.y1 && point.1 <= self.y2
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }
}

/// Monitor layout captured once when the engine starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorTopology {
    monitors: Vec<MonitorInfo>,
}

impl MonitorTopology {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        let monitors = regions
            .into_iter()
            .enumerate()
            .map(|(id, region)| MonitorInfo::from_region(id, region))
            .collect();
        Self { monitors }
    }

    pub fn capture(display: &dyn DisplayBackend) -> Self {
        let topology = Self::new(display.enumerate_regions());
        if topology.is_empty() {
            tracing::warn!("no display regions reported; reset and cycle actions are disabled");
        } else {
            tracing::info!(count = topology.len(), "captured monitor layout");
        }
        topology
    }

    pub fn monitors(&self) -> &[MonitorInfo] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Id of the first monitor containing `point`, or `0` when none does.
    pub fn current_monitor(&self, point: (i32, i32)) -> usize {
        self.monitors
            .iter()
            .find(|mon| mon.contains(point))
            .map(|mon| mon.id)
            .unwrap_or(0)
    }

    /// Center of the monitor currently holding the pointer.
    pub fn reset_target(&self, point: (i32, i32)) -> Option<(i32, i32)> {
        self.monitors
            .get(self.current_monitor(point))
            .map(MonitorInfo::center)
    }

    /// Center of the monitor after the one holding the pointer, wrapping
    /// from the last monitor back to the first.
    pub fn cycle_target(&self, point: (i32, i32)) -> Option<(i32, i32)> {
        if self.monitors.is_empty() {
            return None;
        }
        let next = (self.current_monitor(point) + 1) % self.monitors.len();
        self.monitors.get(next).map(MonitorInfo::center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side_by_side() -> MonitorTopology {
        MonitorTopology::new([Region::new(0, 0, 100, 100), Region::new(100, 0, 200, 100)])
    }

    #[test]
    fn current_monitor_by_containment() {
        let topology = side_by_side();
        assert_eq!(topology.current_monitor((50, 50)), 0);
        assert_eq!(topology.current_monitor((150, 50)), 1);
        // shared edge resolves to the first monitor enumerated
        assert_eq!(topology.current_monitor((100, 50)), 0);
    }

    #[test]
    fn uncontained_point_falls_back_to_first_monitor() {
        let topology = side_by_side();
        assert_eq!(topology.current_monitor((300, 300)), 0);
        assert_eq!(topology.reset_target((300, 300)), Some((50, 50)));
    }

    #[test]
    fn cycle_wraps_around() {
        let topology = side_by_side();
        assert_eq!(topology.cycle_target((50, 50)), Some((150, 50)));
        assert_eq!(topology.cycle_target((150, 50)), Some((50, 50)));
    }

    #[test]
    fn centers_round_toward_negative_infinity() {
        let topology = MonitorTopology::new([Region::new(-1921, -1, 0, 1080)]);
        let mon = topology.monitors()[0];
        assert_eq!(mon.center(), (-961, 539));
    }

    #[test]
    fn empty_topology_has_no_targets() {
        let topology = MonitorTopology::default();
        assert_eq!(topology.current_monitor((10, 10)), 0);
        assert_eq!(topology.reset_target((10, 10)), None);
        assert_eq!(topology.cycle_target((10, 10)), None);
    }
}
