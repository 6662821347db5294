// src/engine/slots.rs

use std::collections::HashSet;

use crate::engine::temporal::canonical_time;

/// The fixed daily slot grid for a doctor: `HH:mm` strings at a fixed
/// increment across clinic hours. A slot is available when no non-terminal
/// appointment already occupies it (the backend decides occupancy; this type
/// only does grid arithmetic).
#[derive(Debug, Clone)]
pub struct SlotGrid {
    times: Vec<String>,
}

impl SlotGrid {
    pub fn new(open_hour: u32, close_hour: u32, slot_minutes: u32) -> Self {
        let mut times = Vec::new();
        let mut minute = open_hour.min(24) * 60;
        let end = close_hour.min(24) * 60;
        let step = slot_minutes.max(1);
        while minute < end {
            times.push(format!("{:02}:{:02}", minute / 60, minute % 60));
            minute += step;
        }
        SlotGrid { times }
    }

    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn contains(&self, time: &str) -> bool {
        let time = canonical_time(time);
        self.times.iter().any(|t| t == time)
    }

    /// Grid minus occupied, preserving grid order.
    pub fn available(&self, occupied: &HashSet<String>) -> Vec<String> {
        let occupied: HashSet<&str> = occupied.iter().map(|t| canonical_time(t)).collect();
        self.times
            .iter()
            .filter(|t| !occupied.contains(t.as_str()))
            .cloned()
            .collect()
    }

    /// An off-grid time is never free.
    pub fn is_slot_free(&self, occupied: &HashSet<String>, time: &str) -> bool {
        let time = canonical_time(time);
        self.contains(time) && !occupied.iter().any(|t| canonical_time(t) == time)
    }
}

impl Default for SlotGrid {
    /// Half-hour grid across default clinic hours, 09:00 through 16:30.
    fn default() -> Self {
        SlotGrid::new(9, 17, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_covers_clinic_hours_in_half_hour_steps() {
        let grid = SlotGrid::default();
        assert_eq!(grid.times().len(), 16);
        assert_eq!(grid.times().first().unwrap(), "09:00");
        assert_eq!(grid.times().last().unwrap(), "16:30");
        assert!(grid.contains("14:00"));
        assert!(!grid.contains("17:00"));
    }

    #[test]
    fn available_is_grid_minus_occupied() {
        let grid = SlotGrid::default();
        let occupied: HashSet<String> =
            ["09:00".to_string(), "14:00:00".to_string()].into_iter().collect();
        let available = grid.available(&occupied);
        assert_eq!(available.len(), 14);
        assert!(!available.contains(&"09:00".to_string()));
        assert!(!available.contains(&"14:00".to_string()));
        assert_eq!(available.first().unwrap(), "09:30");
    }

    #[test]
    fn occupied_slot_is_not_free() {
        let grid = SlotGrid::default();
        let occupied: HashSet<String> = ["14:00".to_string()].into_iter().collect();
        assert!(!grid.is_slot_free(&occupied, "14:00"));
        assert!(!grid.is_slot_free(&occupied, "14:00:00"));
        assert!(grid.is_slot_free(&occupied, "14:30"));
    }

    #[test]
    fn off_grid_times_are_never_free() {
        let grid = SlotGrid::default();
        assert!(!grid.is_slot_free(&HashSet::new(), "14:10"));
        assert!(!grid.is_slot_free(&HashSet::new(), "23:00"));
    }
}
