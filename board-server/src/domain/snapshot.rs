//! Snapshot of every stop's departures at one poll.

use super::departure::Departure;

/// Departures for one board page, sorted by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopBoard {
    pub name: String,
    departures: Vec<Departure>,
}

impl StopBoard {
    /// Create a board, sorting departures by time.
    ///
    /// The sort is stable, so departures at the same instant keep their
    /// feed order.
    pub fn new(name: impl Into<String>, mut departures: Vec<Departure>) -> Self {
        departures.sort_by_key(|d| d.departure_time);
        Self {
            name: name.into(),
            departures,
        }
    }

    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Distinct destinations in order of first appearance.
    pub fn destinations(&self) -> Vec<&str> {
        group_by_destination(&self.departures)
            .into_iter()
            .map(|g| g.destination)
            .collect()
    }
}

/// All departures sharing a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationGroup<'a> {
    pub destination: &'a str,
    pub departures: Vec<&'a Departure>,
}

/// Group departures by destination, keeping first-appearance order of
/// destinations and the input order within each group.
pub fn group_by_destination(departures: &[Departure]) -> Vec<DestinationGroup<'_>> {
    let mut groups: Vec<DestinationGroup<'_>> = Vec::new();
    for departure in departures {
        match groups
            .iter_mut()
            .find(|g| g.destination == departure.destination)
        {
            Some(group) => group.departures.push(departure),
            None => groups.push(DestinationGroup {
                destination: &departure.destination,
                departures: vec![departure],
            }),
        }
    }
    groups
}

/// Every stop's departures as of one successful poll.
///
/// Stop order is the configuration order, followed by the rail stations.
/// A snapshot is never edited after construction; a new poll builds a new
/// one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    stops: Vec<StopBoard>,
}

impl Snapshot {
    pub fn new(stops: Vec<StopBoard>) -> Self {
        Self { stops }
    }

    /// Number of board pages.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Board at `index`, wrapping around the stop count.
    pub fn stop_wrapped(&self, index: usize) -> Option<&StopBoard> {
        if self.stops.is_empty() {
            return None;
        }
        self.stops.get(index % self.stops.len())
    }

    pub fn stops(&self) -> &[StopBoard] {
        &self.stops
    }

    /// Stop names in board order.
    pub fn stop_names(&self) -> impl Iterator<Item = &str> {
        self.stops.iter().map(|s| s.name.as_str())
    }

    /// Total departures across all stops.
    pub fn departure_count(&self) -> usize {
        self.stops.iter().map(|s| s.departures.len()).sum()
    }
}
