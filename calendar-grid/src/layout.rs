use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{Project, Row};

/// A resource whose projects have been stacked into non-overlapping sub-rows.
#[derive(Clone, Debug)]
pub struct PackedResource<'a> {
    pub row: &'a Row,
    pub sub_rows: Vec<Vec<&'a Project>>,
}

impl PackedResource<'_> {
    /// Vertical rows this resource occupies. Always at least one, even with no projects.
    pub fn row_count(&self) -> usize {
        self.sub_rows.len().max(1)
    }
}

/// Stacks a resource's projects into sub-rows.
///
/// Projects are visited in start order and each goes into the first sub-row whose latest end
/// lies strictly before its start (inclusive overlap never shares a sub-row).
pub fn pack_resource(row: &Row) -> PackedResource<'_> {
    let mut projects: Vec<&Project> = row.data.iter().collect();
    projects.sort_by_key(|p| (p.start_date, p.end_date));

    let mut sub_rows: Vec<Vec<&Project>> = Vec::new();
    let mut row_ends: Vec<NaiveDateTime> = Vec::new();
    for project in projects {
        let end = project.end_date.max(project.start_date);
        match row_ends.iter().position(|&last| last < project.start_date) {
            Some(i) => {
                sub_rows[i].push(project);
                row_ends[i] = row_ends[i].max(end);
            }
            None => {
                sub_rows.push(vec![project]);
                row_ends.push(end);
            }
        }
    }

    PackedResource { row, sub_rows }
}

pub fn pack_resources(rows: &[Arc<Row>]) -> Vec<PackedResource<'_>> {
    rows.iter().map(|row| pack_resource(row)).collect()
}

pub fn rows_per_resource(packed: &[PackedResource<'_>]) -> Vec<usize> {
    packed.iter().map(PackedResource::row_count).collect()
}

/// The flattened index of each resource's first row.
///
/// A running sum of [`PackedResource::row_count`].
pub fn row_offsets(packed: &[PackedResource<'_>]) -> Vec<usize> {
    let mut offset = 0;
    packed
        .iter()
        .map(|resource| {
            let start = offset;
            offset += resource.row_count();
            start
        })
        .collect()
}
