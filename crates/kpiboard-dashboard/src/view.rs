//! Render-ready dashboard view.
//!
//! A [`DashboardView`] is built from a [`LoadState`] and then rendered as
//! plain text (terminal) or HTML (page server). Loading and failure views
//! carry no cards; the loaded view carries exactly four, in fixed order.

use kpiboard_core::{KpiSnapshot, KpiValue, NumberFormatter, PLACEHOLDER};
use serde::Serialize;

use crate::state::LoadState;

pub const DASHBOARD_TITLE: &str = "Retail Analytics Dashboard";
pub const DASHBOARD_TAGLINE: &str =
    "Overview: KPI cards (Total revenue, orders, units, profit)";
pub const LOADING_MESSAGE: &str = "Loading KPIs…";

/// One formatted KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub subtitle: String,
}

impl KpiCard {
    fn new(title: &str, value: String, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value,
            subtitle: subtitle.into(),
        }
    }
}

/// Body of the dashboard below the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewBody {
    Loading { message: String },
    Failed { message: String },
    Loaded { cards: Vec<KpiCard> },
}

/// Complete dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub tagline: String,
    pub body: ViewBody,
}

impl DashboardView {
    pub fn from_state(state: &LoadState, formatter: &NumberFormatter) -> Self {
        let body = match state {
            LoadState::Loading => ViewBody::Loading {
                message: LOADING_MESSAGE.to_string(),
            },
            LoadState::Failed(message) => ViewBody::Failed {
                message: message.clone(),
            },
            LoadState::Loaded(snapshot) => ViewBody::Loaded {
                cards: kpi_cards(snapshot, formatter),
            },
        };

        Self {
            title: DASHBOARD_TITLE.to_string(),
            tagline: DASHBOARD_TAGLINE.to_string(),
            body,
        }
    }

    /// Cards on display; empty unless loaded.
    pub fn cards(&self) -> &[KpiCard] {
        match &self.body {
            ViewBody::Loaded { cards } => cards,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, ViewBody::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn state_label(&self) -> &'static str {
        match self.body {
            ViewBody::Loading { .. } => "loading",
            ViewBody::Failed { .. } => "failed",
            ViewBody::Loaded { .. } => "loaded",
        }
    }

    /// Plain-text rendering for the terminal.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n{}\n\n", self.title, self.tagline);
        match &self.body {
            ViewBody::Loading { message } => {
                out.push_str(message);
                out.push('\n');
            }
            ViewBody::Failed { message } => {
                out.push_str(&format!("Error: {message}\n"));
            }
            ViewBody::Loaded { cards } => {
                for card in cards {
                    out.push_str(&format!(
                        "{:<14} {:>18}   {}\n",
                        card.title, card.value, card.subtitle
                    ));
                }
            }
        }
        out
    }

    /// Standalone HTML page.
    pub fn to_html(&self) -> String {
        let body = match &self.body {
            ViewBody::Loading { message } => {
                format!(r#"<div class="loading">{}</div>"#, escape_html(message))
            }
            ViewBody::Failed { message } => {
                format!(r#"<div class="error">Error: {}</div>"#, escape_html(message))
            }
            ViewBody::Loaded { cards } => {
                let cards: String = cards.iter().map(card_html).collect();
                format!(r#"<div class="grid">{cards}</div>"#)
            }
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<header><h1>{title}</h1><p class="tagline">{tagline}</p></header>
{body}
</main>
</body>
</html>
"#,
            title = escape_html(&self.title),
            tagline = escape_html(&self.tagline),
        )
    }
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#f9fafb;margin:0}\
main{max-width:72rem;margin:0 auto;padding:1.5rem}\
h1{font-size:1.5rem;font-weight:600;margin:0}\
.tagline{font-size:.875rem;color:#6b7280}\
.loading{color:#4b5563}\
.error{color:#dc2626}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr));gap:1rem}\
.kpi-card{background:#fff;border-radius:.75rem;padding:1rem;box-shadow:0 1px 2px rgba(0,0,0,.06)}\
.kpi-head{display:flex;align-items:baseline;justify-content:space-between}\
.kpi-title{font-size:.875rem;font-weight:500;color:#6b7280;margin:0}\
.kpi-sub{font-size:.75rem;color:#9ca3af}\
.kpi-value{margin-top:.75rem;font-size:1.5rem;font-weight:600}";

/// Build the four KPI cards in display order.
pub fn kpi_cards(snapshot: &KpiSnapshot, formatter: &NumberFormatter) -> Vec<KpiCard> {
    vec![
        KpiCard::new(
            "Total Revenue",
            formatter.format(snapshot.total_revenue.as_ref(), true),
            "Selected range",
        ),
        KpiCard::new(
            "Total Orders",
            formatter.format(snapshot.total_orders.as_ref(), false),
            "Unique orders",
        ),
        KpiCard::new(
            "Units Sold",
            formatter.format(snapshot.total_units_sold.as_ref(), false),
            "Total units",
        ),
        KpiCard::new(
            "Gross Profit",
            formatter.format(snapshot.gross_profit.as_ref(), true),
            margin_subtitle(snapshot.profit_margin.as_ref()),
        ),
    ]
}

fn margin_subtitle(margin: Option<&KpiValue>) -> String {
    let pct = NumberFormatter::percent(margin).unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("Profit margin {pct}")
}

fn card_html(card: &KpiCard) -> String {
    format!(
        r#"<div class="kpi-card"><div class="kpi-head"><h3 class="kpi-title">{}</h3><div class="kpi-sub">{}</div></div><div class="kpi-value">{}</div></div>"#,
        escape_html(&card.title),
        escape_html(&card.subtitle),
        escape_html(&card.value),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
