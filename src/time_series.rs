use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::model::Snapshot;

/// Line colors, cycled by series index.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (0xe6, 0x19, 0x4b),
    (0x3c, 0xb4, 0x4b),
    (0xff, 0xe1, 0x19),
    (0x43, 0x63, 0xd8),
    (0xf5, 0x82, 0x31),
    (0x91, 0x1e, 0xb4),
    (0x46, 0xf0, 0xf0),
    (0xf0, 0x32, 0xe6),
    (0xbc, 0xf6, 0x0c),
    (0xfa, 0xbe, 0xbe),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub club: String,
    /// One entry per axis label; `None` where the club is missing from that snapshot.
    pub positions: Vec<Option<i64>>,
    pub color_index: usize,
}

impl TimeSeries {
    pub fn color(&self) -> (u8, u8, u8) {
        palette_rgb(self.color_index)
    }

    /// Runs of consecutive present points as `(axis index, position)`, so a
    /// line renderer can draw each run separately and leave absences as gaps.
    pub fn segments(&self) -> Vec<Vec<(usize, i64)>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for (idx, pos) in self.positions.iter().enumerate() {
            match pos {
                Some(pos) => current.push((idx, *pos)),
                None if !current.is_empty() => out.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

pub fn palette_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// One rank series per selected club, in name order, aligned to `labels`.
pub fn build_series(
    labels: &[String],
    filtered: &[Snapshot],
    selected: &BTreeSet<String>,
) -> Vec<TimeSeries> {
    let mut series: Vec<TimeSeries> = selected
        .iter()
        .enumerate()
        .map(|(idx, club)| TimeSeries {
            club: club.clone(),
            positions: vec![None; labels.len()],
            color_index: idx,
        })
        .collect();
    let slots: HashMap<&str, usize> = selected
        .iter()
        .enumerate()
        .map(|(idx, club)| (club.as_str(), idx))
        .collect();

    for (i, snap) in filtered.iter().enumerate().take(labels.len()) {
        for club in &snap.clubs {
            if let Some(&slot) = slots.get(club.name.as_str()) {
                series[slot].positions[i] = club.position;
            }
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_gaps() {
        let series = TimeSeries {
            club: "Lille".to_string(),
            positions: vec![Some(4), Some(3), None, None, Some(5), None],
            color_index: 0,
        };
        assert_eq!(
            series.segments(),
            vec![vec![(0, 4), (1, 3)], vec![(4, 5)]]
        );
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_rgb(0), palette_rgb(10));
        assert_ne!(palette_rgb(0), palette_rgb(1));
    }
}
