use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::layout::{PackedResource, pack_resources, row_offsets};
use crate::types::{format_day, shift_ms, unit_diff};
use crate::{DateRange, GridGeometry, Project, Row, TileOptions, ZoomLevel};

/// Everything tile placement needs from the calendar state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementContext {
    pub zoom: ZoomLevel,
    /// Tiles that do not overlap this range are skipped.
    pub visible_range: DateRange,
    /// Continuous center date (see [`GridGeometry::center_date_from_scroll`]).
    pub center_date: NaiveDateTime,
    pub cols: usize,
}

/// Pixel placement of one tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedTile {
    /// Stable render key: the project id, suffixed with `-YYYY-MM-DD` for hourly day tiles.
    pub key: String,
    pub project_id: String,
    pub resource_index: usize,
    /// Flattened row index across all resources.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Places every visible project of `data`.
///
/// Week and day zoom produce one tile per project. Hour zoom splits each project into one tile
/// per day it touches inside the visible range, packing same-day projects of a resource one
/// after another from `day_start_hour`.
pub fn place_tiles(
    data: &[Arc<Row>],
    geometry: &GridGeometry,
    options: &TileOptions,
    ctx: &PlacementContext,
) -> Vec<PlacedTile> {
    let packed = pack_resources(data);
    let offsets = row_offsets(&packed);
    let mut tiles = Vec::new();

    for (resource_index, (resource, &offset)) in packed.iter().zip(&offsets).enumerate() {
        match ctx.zoom {
            ZoomLevel::Hour => place_hourly(
                resource,
                resource_index,
                offset,
                geometry,
                options,
                ctx,
                &mut tiles,
            ),
            _ => {
                for (sub_row, projects) in resource.sub_rows.iter().enumerate() {
                    for project in projects.iter().filter(|p| p.is_in_range(&ctx.visible_range)) {
                        tiles.push(place_regular(
                            project,
                            resource_index,
                            offset + sub_row,
                            geometry,
                            options,
                            ctx,
                        ));
                    }
                }
            }
        }
    }

    tiles
}

fn place_regular(
    project: &Project,
    resource_index: usize,
    row: usize,
    geometry: &GridGeometry,
    options: &TileOptions,
    ctx: &PlacementContext,
) -> PlacedTile {
    if project.end_date < project.start_date {
        vwarn!(project = %project.id, "project ends before it starts");
    }
    let cell_width = geometry.cell_width(ctx.zoom);
    let duration = unit_diff(project.end_date, project.start_date, ctx.zoom.unit());

    PlacedTile {
        key: project.id.clone(),
        project_id: project.id.clone(),
        resource_index,
        row,
        x: geometry.tile_x(project.start_date, ctx.center_date, ctx.zoom, ctx.cols),
        y: row_y(row, options),
        width: (duration * cell_width).max(0.0),
        start: project.start_date,
        end: project.end_date,
    }
}

fn place_hourly(
    resource: &PackedResource<'_>,
    resource_index: usize,
    offset: usize,
    geometry: &GridGeometry,
    options: &TileOptions,
    ctx: &PlacementContext,
    tiles: &mut Vec<PlacedTile>,
) {
    let visible = &ctx.visible_range;
    let visible_start_day = visible.start.date();
    let visible_end_day = visible.end.date();
    let day_start = NaiveTime::from_hms_opt(options.day_start_hour.min(23), 0, 0)
        .unwrap_or(NaiveTime::MIN);
    // Fresh per resource: the end of the last tile placed on each day.
    let mut cursors: HashMap<NaiveDate, NaiveDateTime> = HashMap::new();

    for (sub_row, projects) in resource.sub_rows.iter().enumerate() {
        let row = offset + sub_row;
        for project in projects.iter().filter(|p| p.is_in_range(visible)) {
            let first_day = project.start_date.date().max(visible_start_day);
            let last_day = project.end_date.date().min(visible_end_day);

            for day in first_day.iter_days().take_while(|day| *day <= last_day) {
                let start = cursors
                    .get(&day)
                    .copied()
                    .unwrap_or_else(|| day.and_time(day_start));
                let end = occupied_until(start, project.occupancy);
                cursors.insert(day, end);
                let end = end.min(visible.end);

                if start > end || start > visible.end || end < visible.start {
                    continue;
                }

                tiles.push(PlacedTile {
                    key: format!("{}-{}", project.id, format_day(day)),
                    project_id: project.id.clone(),
                    resource_index,
                    row,
                    x: geometry.tile_x(start, ctx.center_date, ZoomLevel::Hour, ctx.cols),
                    y: row_y(row, options),
                    width: unit_diff(end, start, ZoomLevel::Hour.unit())
                        * geometry.cell_width(ZoomLevel::Hour),
                    start,
                    end,
                });
            }
        }
    }
}

fn occupied_until(start: NaiveDateTime, occupancy_seconds: u32) -> NaiveDateTime {
    shift_ms(start, occupancy_seconds as i64 * 1000)
}

fn row_y(row: usize, options: &TileOptions) -> f64 {
    row as f64 * options.row_height + options.tile_y_offset
}

