//! Time-window overlap between a request and the stops of a schedule.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schedule::{Activity, ScheduleRecord};

/// How a stop's window relates to a request's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRelation {
    Disjoint,
    /// Partial overlap on either side.
    Overlaps,
    /// The stop window lies inside the request window (equality included).
    Within,
    /// The stop window covers the request window, strictly wider on at least one side.
    Covers,
    /// The windows only share a boundary instant.
    Touches,
}

impl WindowRelation {
    pub fn of(node: (i64, i64), request: (i64, i64)) -> Self {
        let (node_start, node_end) = node;
        let (start, end) = request;

        if node_start >= start && node_end <= end {
            WindowRelation::Within
        } else if node_start <= start && node_end >= end {
            WindowRelation::Covers
        } else if node_end > start && node_start < end {
            WindowRelation::Overlaps
        } else if node_end == start || node_start == end {
            WindowRelation::Touches
        } else {
            WindowRelation::Disjoint
        }
    }

    pub fn overlaps(self) -> bool {
        self != WindowRelation::Disjoint
    }
}

/// Candidate detour endpoints around the stops whose windows overlap a request.
///
/// `outbound[i]` and `inbound[i]` form the i-th (leave, return) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowOverlapSets {
    pub outbound: Vec<usize>,
    pub inbound: Vec<usize>,
    pub all_nodes: Vec<usize>,
}

impl WindowOverlapSets {
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() || self.inbound.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.outbound.iter().copied().zip(self.inbound.iter().copied())
    }
}

/// Collect the stops among `nodes` whose effective window overlaps `window`
/// and turn each block of consecutive positions into detour endpoints.
///
/// Every position in a block is a leave and return candidate. The first block
/// also gets the stop just before it as a leave candidate, unless the block
/// opens with a depot-leave stop. Each block gets the stop just after it as a
/// return candidate.
pub fn overlapping_window<'r, I>(nodes: I, window: (i64, i64)) -> WindowOverlapSets
where
    I: IntoIterator<Item = (usize, &'r ScheduleRecord)>,
{
    let matched: BTreeMap<usize, Activity> = nodes
        .into_iter()
        .filter(|(_, record)| WindowRelation::of(record.window(), window).overlaps())
        .map(|(position, record)| (position, record.activity))
        .collect();

    let mut blocks: Vec<Vec<usize>> = Vec::new();
    for &position in matched.keys() {
        match blocks.last_mut() {
            Some(block) if block.last().is_some_and(|last| last + 1 == position) => {
                block.push(position)
            }
            _ => blocks.push(vec![position]),
        }
    }

    let mut outbound = Vec::new();
    let mut inbound = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        let (min, max) = (block[0], block[block.len() - 1]);
        outbound.extend_from_slice(block);

        if index == 0 {
            let opens_at_depot = matched.get(&min) == Some(&Activity::LeaveDepot);
            match min.checked_sub(1) {
                Some(before) if !opens_at_depot => {
                    outbound.push(before);
                    inbound.extend_from_slice(block);
                }
                _ => inbound.extend_from_slice(&block[1..]),
            }
        } else {
            inbound.extend_from_slice(&block[1..]);
        }
        inbound.push(max + 1);
    }

    outbound.sort_unstable();
    inbound.sort_unstable();
    let mut all_nodes: Vec<usize> = outbound.iter().chain(inbound.iter()).copied().collect();
    all_nodes.sort_unstable();
    all_nodes.dedup();

    WindowOverlapSets {
        outbound,
        inbound,
        all_nodes,
    }
}
