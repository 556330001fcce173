use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::model::{AppId, LeaderboardEntry};
use crate::normalization::numbers::parse_count;

/// Rank, Name, Current, Last 30 days, Peak, Hours played.
pub const MIN_COLUMNS: usize = 6;
const NAME_COL: usize = 1;
const CURRENT_COL: usize = 2;
const PEAK_COL: usize = 4;

struct Selectors {
    table: Selector,
    row: Selector,
    cell: Selector,
    link: Selector,
}

fn selectors() -> &'static Selectors {
    static SEL: OnceLock<Selectors> = OnceLock::new();
    SEL.get_or_init(|| Selectors {
        table: Selector::parse("table").expect("static selector"),
        row: Selector::parse("tr").expect("static selector"),
        cell: Selector::parse("td").expect("static selector"),
        link: Selector::parse("a[href]").expect("static selector"),
    })
}

fn app_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/app/(\d+)").expect("static regex"))
}

/// Id encoded in a `/app/<digits>` path segment.
pub fn app_id_from_href(href: &str) -> Option<AppId> {
    let caps = app_link_re().captures(href)?;
    caps.get(1)?.as_str().parse::<u64>().ok().and_then(AppId::new)
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_row(row: ElementRef<'_>) -> Option<LeaderboardEntry> {
    let sel = selectors();
    let cells: Vec<ElementRef<'_>> = row.select(&sel.cell).collect();
    if cells.len() < MIN_COLUMNS {
        return None;
    }
    let link = cells[NAME_COL].select(&sel.link).next()?;
    let app_id = app_id_from_href(link.value().attr("href")?)?;
    Some(LeaderboardEntry {
        app_id,
        name: cell_text(&link),
        current_players: parse_count(&cell_text(&cells[CURRENT_COL])),
        peak_players: parse_count(&cell_text(&cells[PEAK_COL])),
    })
}

/// Every usable row of the first table on a leaderboard page, in page order.
///
/// Header rows, short rows and rows without an app link are skipped. Duplicates
/// are kept here; the extractor owns run-wide uniqueness.
pub fn parse_chart_page(html: &str) -> Vec<LeaderboardEntry> {
    let document = Html::parse_document(html);
    let sel = selectors();
    let Some(table) = document.select(&sel.table).next() else {
        return Vec::new();
    };
    table.select(&sel.row).filter_map(parse_row).collect()
}
