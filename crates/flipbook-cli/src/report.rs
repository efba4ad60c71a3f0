//! Tables printed by the reader.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use flipbook_content::{ContentSource, ContentStore};
use flipbook_core::NavigationState;
use flipbook_model::SectionRegistry;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

/// One row per page, cover included.
pub fn sections_table(registry: &SectionRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Page", "Section", "Fragment"]);
    apply_table_style(&mut table);

    for index in 0..registry.page_count() {
        let Some(section) = registry.id_at(index) else {
            continue;
        };
        let name = if index == 0 {
            Cell::new(section).add_attribute(Attribute::Italic)
        } else {
            Cell::new(section)
        };
        table.add_row(vec![
            Cell::new(index).set_alignment(CellAlignment::Right),
            name,
            Cell::new(section.fragment()),
        ]);
    }
    table
}

/// Current position and cache contents.
pub fn status_table<S: ContentSource>(
    registry: &SectionRegistry,
    state: &NavigationState,
    store: &ContentStore<S>,
) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);

    let section = registry
        .id_at(state.current_index)
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let cached = store
        .cached_sections()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    table.add_row(vec![
        Cell::new("Page"),
        Cell::new(format!("{} ({section})", state.current_index)),
    ]);
    table.add_row(vec![
        Cell::new("Turning"),
        Cell::new(if state.is_animating() { "yes" } else { "no" }),
    ]);
    table.add_row(vec![
        Cell::new("Cached"),
        Cell::new(if cached.is_empty() { "-".to_string() } else { cached }),
    ]);
    table
}
