//! Turns decoded API records into [`ResultItem`]s.
//!
//! Records missing a name, detail URL or image URL are dropped without an
//! error; so are records whose URLs are not absolute URLs. Order is kept.
use crate::item::ResultItem;
use crate::types::RawItem;
use url::Url;

pub fn complete_items(records: Vec<RawItem>) -> Vec<ResultItem> {
    let total = records.len();
    let items: Vec<ResultItem> = records.into_iter().filter_map(to_result_item).collect();

    if items.len() != total {
        tracing::debug!(
            total,
            kept = items.len(),
            dropped = total - items.len(),
            "okashi.extract.dropped_partial_records"
        );
    }
    items
}

fn to_result_item(raw: RawItem) -> Option<ResultItem> {
    let RawItem { name, url, image } = raw;
    let name = name?;
    let detail_url = parse_url(url?)?;
    let image_url = parse_url(image?)?;
    Some(ResultItem::new(name, detail_url, image_url))
}

fn parse_url(raw: String) -> Option<Url> {
    match Url::parse(raw.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(raw=%raw, error=%e, "okashi.extract.invalid_url");
            None
        }
    }
}
