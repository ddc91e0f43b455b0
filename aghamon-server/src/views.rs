//! HTML rendering for the dashboard pages
//!
//! All appliance-sourced strings pass through askama's default HTML
//! escaping. Pre-rendered fragments are the only values inserted with the
//! `safe` filter, and only into the page templates below.

use aghamon_common::{Client, RankedEntry, StatsResponse};
use askama::Template;

/// Template rendering failure, surfaced as HTTP 500 by the router
#[derive(Debug, thiserror::Error)]
#[error("template render failed: {0}")]
pub struct RenderError(#[from] askama::Error);

// ---------------------------------------------------------------------------
// Table fragments
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "clients_table.html")]
struct ClientsTableTemplate<'a> {
    clients: &'a [Client],
}

#[derive(Template)]
#[template(path = "ranked_table.html")]
struct RankedTableTemplate<'a> {
    title: &'a str,
    value_label: &'a str,
    entries: &'a [RankedEntry<u64>],
}

#[derive(Template)]
#[template(path = "upstream_time_table.html")]
struct UpstreamTimeTableTemplate<'a> {
    title: &'a str,
    value_label: &'a str,
    entries: &'a [RankedEntry<f64>],
}

/// Render the clients table: one body row per client, input order preserved
pub fn render_clients_table(clients: &[Client]) -> Result<String, RenderError> {
    Ok(ClientsTableTemplate { clients }.render()?)
}

/// Render a ranked table with a 1-based position column
pub fn render_ranked_table(
    title: &str,
    entries: &[RankedEntry<u64>],
    value_label: &str,
) -> Result<String, RenderError> {
    Ok(RankedTableTemplate {
        title,
        value_label,
        entries,
    }
    .render()?)
}

/// Render an upstream timing table, values formatted to 6 decimal places
pub fn render_upstream_time_table(
    title: &str,
    entries: &[RankedEntry<f64>],
    value_label: &str,
) -> Result<String, RenderError> {
    Ok(UpstreamTimeTableTemplate {
        title,
        value_label,
        entries,
    }
    .render()?)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "base.html")]
struct PageTemplate<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate;

#[derive(Template)]
#[template(path = "clients.html")]
struct ClientsPageTemplate<'a> {
    total_clients: usize,
    table: &'a str,
}

#[derive(Template)]
#[template(path = "stats.html")]
struct StatsPageTemplate<'a> {
    time_units: &'a str,
    num_dns_queries: u64,
    num_blocked_filtering: u64,
    avg_processing_time: f64,
    domains_table: &'a str,
    clients_table: &'a str,
    blocked_table: &'a str,
}

#[derive(Template)]
#[template(path = "upstreams.html")]
struct UpstreamsPageTemplate<'a> {
    responses_table: &'a str,
    avg_time_table: &'a str,
}

/// Wrap a rendered content fragment in the shared page shell
fn page(title: &str, content: &str) -> Result<String, RenderError> {
    Ok(PageTemplate { title, content }.render()?)
}

/// The home page: navigation cards, no appliance data
pub fn home_page() -> Result<String, RenderError> {
    let content = HomeTemplate.render()?;
    page("Aghamon", &content)
}

/// The clients page for an already-concatenated client list
pub fn clients_page(clients: &[Client]) -> Result<String, RenderError> {
    let table = render_clients_table(clients)?;
    let content = ClientsPageTemplate {
        total_clients: clients.len(),
        table: &table,
    }
    .render()?;
    page("DNS Clients - Aghamon", &content)
}

/// The statistics page: summary numbers plus three ranked tables
pub fn stats_page(stats: &StatsResponse) -> Result<String, RenderError> {
    let domains_table =
        render_ranked_table("Top Queried Domains", &stats.top_queried_domains, "Count")?;
    let clients_table = render_ranked_table("Top Clients", &stats.top_clients, "Count")?;
    let blocked_table =
        render_ranked_table("Top Blocked Domains", &stats.top_blocked_domains, "Count")?;

    let content = StatsPageTemplate {
        time_units: &stats.time_units,
        num_dns_queries: stats.num_dns_queries,
        num_blocked_filtering: stats.num_blocked_filtering,
        avg_processing_time: stats.avg_processing_time,
        domains_table: &domains_table,
        clients_table: &clients_table,
        blocked_table: &blocked_table,
    }
    .render()?;
    page("DNS Statistics - Aghamon", &content)
}

/// The upstreams page: response counts and average response times
pub fn upstreams_page(stats: &StatsResponse) -> Result<String, RenderError> {
    let responses_table = render_ranked_table(
        "Top Upstreams by Response Count",
        &stats.top_upstreams_responses,
        "Count",
    )?;
    let avg_time_table = render_upstream_time_table(
        "Top Upstreams by Average Response Time",
        &stats.top_upstreams_avg_time,
        "Time",
    )?;

    let content = UpstreamsPageTemplate {
        responses_table: &responses_table,
        avg_time_table: &avg_time_table,
    }
    .render()?;
    page("DNS Upstreams - Aghamon", &content)
}
