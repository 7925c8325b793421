use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::DateRange;

/// A scheduled block of work for one resource.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Project {
    pub id: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Seconds consumed per day (used for hourly day-packing).
    pub occupancy: u32,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub bg_color: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
            occupancy: 0,
            title: String::new(),
            subtitle: None,
            description: None,
            bg_color: None,
        }
    }

    pub fn with_occupancy(mut self, seconds: u32) -> Self {
        self.occupancy = seconds;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_bg_color(mut self, bg_color: impl Into<String>) -> Self {
        self.bg_color = Some(bg_color.into());
        self
    }

    pub fn is_in_range(&self, range: &DateRange) -> bool {
        range.overlaps(self.start_date, self.end_date)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowLabel {
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<String>,
}

impl RowLabel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            icon: None,
        }
    }
}

/// One resource (person) and the projects assigned to it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub id: String,
    pub label: RowLabel,
    pub data: Vec<Project>,
}

impl Row {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: RowLabel::new(title),
            data: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: RowLabel) -> Self {
        self.label = label;
        self
    }

    pub fn with_projects(mut self, projects: impl IntoIterator<Item = Project>) -> Self {
        self.data.extend(projects);
        self
    }
}

/// An ordered, shared sequence of rows.
///
/// Cloning is cheap (reference counted). Reference identity is observable via
/// [`SchedulerData::ptr_eq`] and is preserved by the transforms in this module whenever they
/// change nothing, so renderers can memoize on it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SchedulerData(Arc<[Arc<Row>]>);

impl SchedulerData {
    pub fn new(rows: Vec<Row>) -> Self {
        Self(rows.into_iter().map(Arc::new).collect())
    }

    pub fn from_shared(rows: Vec<Arc<Row>>) -> Self {
        Self(Arc::from(rows))
    }

    pub fn empty() -> Self {
        Self::from_shared(Vec::new())
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.0
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Total number of projects over all rows.
    pub fn project_count(&self) -> usize {
        self.0.iter().map(|row| row.data.len()).sum()
    }

    pub fn find_row(&self, id: &str) -> Option<&Arc<Row>> {
        self.0.iter().find(|row| row.id == id)
    }
}

impl Default for SchedulerData {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for SchedulerData {
    type Target = [Arc<Row>];

    fn deref(&self) -> &[Arc<Row>] {
        &self.0
    }
}

impl From<Vec<Row>> for SchedulerData {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for SchedulerData {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arc::new).collect())
    }
}

/// `[min(start_date), max(end_date)]` over every project, or `None` when there are none.
pub fn data_range(rows: &[Arc<Row>]) -> Option<DateRange> {
    let mut projects = rows.iter().flat_map(|row| row.data.iter());
    let first = projects.next()?;
    let mut range = DateRange::new(first.start_date, first.end_date);
    for project in projects {
        range.start = range.start.min(project.start_date);
        range.end = range.end.max(project.end_date);
    }
    Some(range)
}

/// A row of a merge in progress. It is copied on first write.
struct MergedRow {
    shared: Arc<Row>,
    owned: Option<(Row, HashMap<String, usize>)>,
}

impl MergedRow {
    fn shared(row: &Arc<Row>) -> Self {
        Self {
            shared: Arc::clone(row),
            owned: None,
        }
    }

    fn owned(&mut self) -> (&mut Row, &mut HashMap<String, usize>) {
        let shared = &self.shared;
        let (row, index) = self.owned.get_or_insert_with(|| {
            let row = Row::clone(shared);
            let index = row
                .data
                .iter()
                .enumerate()
                .map(|(i, project)| (project.id.clone(), i))
                .collect();
            (row, index)
        });
        (row, index)
    }

    fn into_shared(self) -> Arc<Row> {
        match self.owned {
            Some((row, _)) => Arc::new(row),
            None => self.shared,
        }
    }
}

/// Merges `incoming` rows into `current`.
///
/// - Every row id appears exactly once, in first-seen order (`current` first, then new ids from
///   `incoming` in arrival order).
/// - For rows present in both, the incoming label replaces the current one and projects are
///   unioned by id; an incoming project replaces an existing one with the same id in place.
/// - Rows untouched by `incoming` keep their identity.
pub fn merge_scheduler_data(current: &SchedulerData, incoming: &SchedulerData) -> SchedulerData {
    if incoming.is_empty() {
        return current.clone();
    }

    let mut merged: Vec<MergedRow> = Vec::with_capacity(current.len() + incoming.len());
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(merged.capacity());
    for row in current.iter() {
        positions.insert(row.id.as_str(), merged.len());
        merged.push(MergedRow::shared(row));
    }

    for row in incoming.iter() {
        let Some(&pos) = positions.get(row.id.as_str()) else {
            positions.insert(row.id.as_str(), merged.len());
            merged.push(MergedRow::shared(row));
            continue;
        };

        let (target, index) = merged[pos].owned();
        target.label = row.label.clone();
        for project in &row.data {
            match index.get(&project.id) {
                Some(&i) => target.data[i] = project.clone(),
                None => {
                    index.insert(project.id.clone(), target.data.len());
                    target.data.push(project.clone());
                }
            }
        }
    }

    vtrace!(
        current = current.len(),
        incoming = incoming.len(),
        merged = merged.len(),
        "merge_scheduler_data"
    );
    SchedulerData::from_shared(merged.into_iter().map(MergedRow::into_shared).collect())
}

/// Keeps only the projects overlapping `range` (inclusive).
///
/// Rows are never dropped. A row whose projects all survive is returned as the same `Arc`, and
/// when nothing is removed at all the input sequence itself is returned.
pub fn trim_data_to_range(rows: &SchedulerData, range: &DateRange) -> SchedulerData {
    let mut removed = 0usize;
    let trimmed: Vec<Arc<Row>> = rows
        .iter()
        .map(|row| {
            let kept = row.data.iter().filter(|p| p.is_in_range(range)).count();
            if kept == row.data.len() {
                return Arc::clone(row);
            }
            removed += row.data.len() - kept;
            Arc::new(Row {
                id: row.id.clone(),
                label: row.label.clone(),
                data: row
                    .data
                    .iter()
                    .filter(|p| p.is_in_range(range))
                    .cloned()
                    .collect(),
            })
        })
        .collect();

    if removed == 0 {
        return rows.clone();
    }
    vdebug!(removed, "trim_data_to_range: evicted projects");
    SchedulerData::from_shared(trimmed)
}
