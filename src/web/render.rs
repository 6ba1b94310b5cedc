//! Server-side HTML for the single page. Every piece of dynamic text goes
//! through [`escape`].

use crate::core::catalog::filter_wines;
use crate::core::session::{Cart, SessionContext};
use crate::domain::model::{
    MealType, Occasion, PriceRange, TasteTag, UserPreferences, WineRecord, WineType, MAX_GUESTS,
    MIN_GUESTS,
};

pub const API_KEY_HINT: &str = "Please check your API key and try again.";
pub const CATALOG_UNAVAILABLE: &str = "Unable to load wines from the API. Please try again later.";

const EXAMPLE_QUESTIONS: [&str; 4] = [
    "What's the difference between Cabernet Sauvignon and Merlot?",
    "How do I store wine properly?",
    "What temperature should I serve Chardonnay?",
    "Can you explain wine tannins?",
];

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
    aside { width: 18rem; padding: 1rem; background: #f7f2f2; }
    main { flex: 1; padding: 1rem 2rem; }
    .main-header { font-size: 3rem; color: #8B0000; text-align: center; margin-bottom: 2rem; }
    .tabs a { margin-right: 1rem; padding: 0.5rem; text-decoration: none; color: #444; }
    .tabs a.active { border-bottom: 3px solid #8B0000; color: #8B0000; }
    .wine-card { padding: 1rem; border-radius: 10px; border: 2px solid #ddd; margin: 1rem 0; display: flex; gap: 1rem; }
    .notice { padding: 0.75rem; border-radius: 6px; margin: 1rem 0; }
    .notice.error { background: #fde8e8; }
    .notice.warning { background: #fff6db; }
    .notice.info { background: #e8f0fd; }
    .generated { white-space: pre-wrap; }
    footer { text-align: center; color: #666; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Pairing,
    Browse,
    Ask,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Pairing, Tab::Browse, Tab::Ask];

    /// Unknown or missing values fall back to the meal pairing tab.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("browse") => Tab::Browse,
            Some("ask") => Tab::Ask,
            _ => Tab::Pairing,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Tab::Pairing => "pairing",
            Tab::Browse => "browse",
            Tab::Ask => "ask",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Tab::Pairing => "🎯 Meal Pairing",
            Tab::Browse => "🍇 Browse Wines",
            Tab::Ask => "💬 Ask the Sommelier",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Generated { heading: &'static str, text: String },
    Error(String),
    Warning(String),
    Info(String),
}

pub struct Page<'a> {
    pub tab: Tab,
    pub session: &'a SessionContext,
    pub notices: Vec<Notice>,
    pub question: &'a str,
    /// Loaded catalog, present only on the browse tab.
    pub wines: Option<&'a [WineRecord]>,
    pub search: &'a str,
}

impl<'a> Page<'a> {
    pub fn new(tab: Tab, session: &'a SessionContext) -> Self {
        Self {
            tab,
            session,
            notices: Vec::new(),
            question: "",
            wines: None,
            search: "",
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render_page(page: &Page<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>AI Sommelier Wine Shop</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str(&render_sidebar(&page.session.preferences, &page.session.cart, page.tab));

    html.push_str("<main>\n<h1 class=\"main-header\">🍷 AI Sommelier Wine Shop</h1>\n");
    html.push_str(&render_tabs(page.tab));

    match page.tab {
        Tab::Pairing => html.push_str(&render_pairing_tab(&page.session.preferences)),
        Tab::Browse => html.push_str(&render_browse_tab(page)),
        Tab::Ask => html.push_str(&render_ask_tab(page.question)),
    }
    for notice in &page.notices {
        html.push_str(&render_notice(notice));
    }

    html.push_str(
        "<hr>\n<footer><p>🍷 Powered by Google Gemini AI | Drink Responsibly | Must be 21+ to order</p></footer>\n",
    );
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_tabs(active: Tab) -> String {
    let links: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { " class=\"active\"" } else { "" };
            format!("<a href=\"/?tab={}\"{}>{}</a>", tab.slug(), class, tab.title())
        })
        .collect();
    format!("<nav class=\"tabs\">{}</nav>\n", links.join(""))
}

fn render_sidebar(prefs: &UserPreferences, cart: &Cart, tab: Tab) -> String {
    let mut html = String::from("<aside>\n<h2>Your Wine Preferences</h2>\n");

    html.push_str(&labelled_select(
        "Preferred Wine Type",
        "wine_type",
        WineType::ALL.iter().map(|o| o.label()),
        prefs.wine_type.label(),
    ));
    html.push_str(&labelled_select(
        "Price Range",
        "price_range",
        PriceRange::ALL.iter().map(|o| o.label()),
        prefs.price_range.label(),
    ));

    html.push_str("<fieldset><legend>Taste Preferences</legend>\n");
    for tag in TasteTag::ALL {
        let checked = if prefs.taste_profile.contains(tag) {
            " checked"
        } else {
            ""
        };
        html.push_str(&format!(
            "<label><input type=\"checkbox\" form=\"pairing-form\" name=\"taste\" value=\"{0}\"{1}> {0}</label><br>\n",
            escape(tag.label()),
            checked
        ));
    }
    html.push_str("</fieldset>\n<hr>\n<h2>🛒 Your Cart</h2>\n");

    if cart.is_empty() {
        html.push_str("<p>Your cart is empty</p>\n");
    } else {
        html.push_str("<ul>\n");
        for item in cart.items() {
            html.push_str(&format!("<li>{}</li>\n", escape(item)));
        }
        html.push_str("</ul>\n");
        html.push_str(&format!(
            "<form method=\"post\" action=\"/cart/clear\"><input type=\"hidden\" name=\"tab\" value=\"{}\"><button type=\"submit\">Clear Cart</button></form>\n",
            tab.slug()
        ));
    }

    html.push_str("</aside>\n");
    html
}

/// Sidebar selects belong to the pairing form even though they render outside it.
fn labelled_select<'a>(
    label: &str,
    name: &str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
) -> String {
    let mut html = format!(
        "<label>{}<br><select form=\"pairing-form\" name=\"{}\">\n",
        escape(label),
        name
    );
    html.push_str(&render_options(options, selected));
    html.push_str("</select></label><br>\n");
    html
}

fn render_options<'a>(options: impl Iterator<Item = &'a str>, selected: &str) -> String {
    options
        .map(|option| {
            let marker = if option == selected { " selected" } else { "" };
            format!(
                "<option value=\"{0}\"{1}>{0}</option>\n",
                escape(option),
                marker
            )
        })
        .collect()
}

fn render_pairing_tab(prefs: &UserPreferences) -> String {
    let mut html = String::from("<h2>Find the Perfect Wine for Your Meal</h2>\n");
    html.push_str("<form id=\"pairing-form\" method=\"post\" action=\"/recommend\">\n");

    html.push_str("<label>What are you eating?<br><select name=\"meal_type\">\n");
    html.push_str(&render_options(
        MealType::ALL.iter().map(|o| o.label()),
        prefs.meal_type.label(),
    ));
    html.push_str("</select></label><br>\n");

    html.push_str(&format!(
        "<label>Describe your dish (optional)<br><textarea name=\"meal_description\" rows=\"4\" placeholder=\"e.g., Grilled salmon with lemon butter sauce\">{}</textarea></label><br>\n",
        escape(&prefs.meal_description)
    ));

    html.push_str("<label>What's the occasion?<br><select name=\"occasion\">\n");
    html.push_str(&render_options(
        Occasion::ALL.iter().map(|o| o.label()),
        prefs.occasion.label(),
    ));
    html.push_str("</select></label><br>\n");

    html.push_str(&format!(
        "<label>Number of guests<br><input type=\"number\" name=\"guests\" min=\"{}\" max=\"{}\" value=\"{}\"></label><br>\n",
        MIN_GUESTS, MAX_GUESTS, prefs.guest_count
    ));

    html.push_str("<button type=\"submit\">Get Wine Recommendations</button>\n</form>\n");
    html
}

fn render_browse_tab(page: &Page<'_>) -> String {
    let mut html = String::from("<h2>Browse Our Wine Collection</h2>\n");

    let wines = page.wines.unwrap_or(&[]);
    if wines.is_empty() {
        html.push_str(&render_notice(&Notice::Info(CATALOG_UNAVAILABLE.to_string())));
        return html;
    }

    html.push_str(&format!(
        "<form method=\"get\" action=\"/\"><input type=\"hidden\" name=\"tab\" value=\"browse\"><label>Search wines <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Enter wine name...\"></label> <button type=\"submit\">Search</button></form>\n",
        escape(page.search)
    ));

    if let Some(selected) = &page.session.selected_wine {
        html.push_str(&format!(
            "<section class=\"selected\"><h3>Selected: {}</h3><p>{} · {}</p></section>\n",
            escape(selected.display_name()),
            escape(selected.display_winery()),
            escape(selected.display_location())
        ));
    }

    for (index, wine) in filter_wines(wines, page.search) {
        html.push_str(&render_wine_card(index, wine));
    }
    html
}

fn render_wine_card(index: usize, wine: &WineRecord) -> String {
    let mut html = String::from("<div class=\"wine-card\">\n<div>");
    if let Some(image) = wine.image.as_deref().filter(|url| is_http_url(url)) {
        html.push_str(&format!(
            "<img src=\"{}\" width=\"100\" alt=\"{}\">",
            escape(image),
            escape(wine.display_name())
        ));
    }
    html.push_str("</div>\n<div>\n");
    html.push_str(&format!(
        "<p><strong>{}</strong></p>\n<p>Winery: {}</p>\n<p>Location: {}</p>\n",
        escape(wine.display_name()),
        escape(wine.display_winery()),
        escape(wine.display_location())
    ));
    if let Some(rating) = wine.display_rating() {
        html.push_str(&format!("<p>⭐ Rating: {}</p>\n", escape(rating)));
    }
    html.push_str("</div>\n<div>\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"/wines/{}/select\"><button type=\"submit\">Learn More</button></form>\n",
        index
    ));
    html.push_str(&format!(
        "<form method=\"post\" action=\"/cart/add\"><input type=\"hidden\" name=\"item\" value=\"{}\"><input type=\"hidden\" name=\"tab\" value=\"browse\"><button type=\"submit\">Add to Cart</button></form>\n",
        escape(wine.display_name())
    ));
    html.push_str("</div>\n</div>\n");
    html
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn render_ask_tab(question: &str) -> String {
    let mut html = String::from("<h2>Ask Our AI Sommelier Anything</h2>\n");
    html.push_str("<p>Have a question about wine? Our AI sommelier is here to help!</p>\n");
    html.push_str("<p><strong>Example questions:</strong></p>\n<ul>\n");
    for example in EXAMPLE_QUESTIONS {
        html.push_str(&format!("<li>{}</li>\n", escape(example)));
    }
    html.push_str("</ul>\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"/ask\"><label>Your question:<br><textarea name=\"question\" rows=\"4\" placeholder=\"Ask anything about wine...\">{}</textarea></label><br><button type=\"submit\">Ask Sommelier</button></form>\n",
        escape(question)
    ));
    html
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Generated { heading, text } => format!(
            "<section><h3>{}</h3>\n<div class=\"generated\">{}</div></section>\n",
            escape(heading),
            escape(text)
        ),
        Notice::Error(message) => {
            format!("<div class=\"notice error\">{}</div>\n", escape(message))
        }
        Notice::Warning(message) => {
            format!("<div class=\"notice warning\">{}</div>\n", escape(message))
        }
        Notice::Info(message) => format!("<div class=\"notice info\">{}</div>\n", escape(message)),
    }
}
