use shared::protocol::PageLink;
use tracing::warn;

const LAST_REL: &str = "last";
const PAGE_PARAM: &str = "pagina";

/// Total page count from the response's navigation links.
///
/// The `last` link's `pagina` parameter wins. Without a usable `last` link the
/// current page is assumed to be the final one when it has results, and a
/// single empty page is reported otherwise.
pub fn resolve_total_pages(links: &[PageLink], current_page: u32, entity_count: usize) -> u32 {
    let from_link = links
        .iter()
        .find(|link| link.rel == LAST_REL)
        .and_then(|link| {
            let parsed = page_param(&link.href);
            if parsed.is_none() {
                warn!(href = %link.href, "pagination: ignoring last link without a valid page");
            }
            parsed
        });

    match from_link {
        Some(total) => total,
        None if entity_count > 0 => current_page.max(1),
        None => 1,
    }
}

fn page_param(href: &str) -> Option<u32> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
}
