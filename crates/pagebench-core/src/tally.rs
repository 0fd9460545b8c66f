use std::time::Duration;

use serde::Serialize;

/// Elapsed time per strategy, in the order strategies first ran.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub samples: Vec<Duration>,
}

impl Entry {
    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }
}

impl Tally {
    pub fn record(&mut self, name: &str, elapsed: Duration) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.samples.push(elapsed),
            None => self.entries.push(Entry { name: name.to_string(), samples: vec![elapsed] }),
        }
    }

    pub fn total(&self, name: &str) -> Option<Duration> {
        self.get(name).map(Entry::total)
    }

    pub fn samples(&self, name: &str) -> Option<&[Duration]> {
        self.get(name).map(|e| e.samples.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<Summary> {
        self.entries.iter().map(Summary::from).collect()
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub rounds: usize,
    pub total_secs: f64,
    pub mean_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

impl From<&Entry> for Summary {
    fn from(entry: &Entry) -> Self {
        let secs: Vec<f64> = entry.samples.iter().map(Duration::as_secs_f64).collect();
        let total_secs = entry.total().as_secs_f64();
        let rounds = secs.len();
        Self {
            name: entry.name.clone(),
            rounds,
            total_secs,
            mean_secs: if rounds == 0 { 0.0 } else { total_secs / rounds as f64 },
            min_secs: secs.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_secs: secs.iter().copied().reduce(f64::max).unwrap_or(0.0),
        }
    }
}
