//! Server-rendered recommendation page.

use crate::recommend::RecommendationCard;
use std::fmt::Write;

const PAGE_TITLE: &str = "Music Recommender System";

/// What the body of the page shows below the selection form.
pub enum PageContent<'a> {
    Empty,
    Cards(&'a [RecommendationCard]),
    Error(&'a str),
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn render_card(out: &mut String, card: &RecommendationCard) {
    let title = escape_html(&card.title);
    let cover = escape_html(&card.cover_url);

    out.push_str("<div class=\"card\">");
    match &card.listening_url {
        Some(link) => {
            let link = escape_html(link);
            let _ = write!(
                out,
                "<a class=\"title\" href=\"{link}\" target=\"_blank\">{title}</a>\
                 <a href=\"{link}\" target=\"_blank\"><img src=\"{cover}\" alt=\"{title}\"></a>"
            );
        }
        None => {
            let _ = write!(
                out,
                "<span class=\"title\">{title}</span><img src=\"{cover}\" alt=\"{title}\">"
            );
        }
    }
    let _ = write!(
        out,
        "<span class=\"artist\">{}</span>",
        escape_html(&card.artist)
    );
    if let Some(notice) = &card.notice {
        let _ = write!(out, "<span class=\"notice\">{}</span>", escape_html(notice));
    }
    out.push_str("</div>");
}

pub fn render_page<'a>(
    titles: impl Iterator<Item = &'a str>,
    selected: Option<&str>,
    banner: Option<&str>,
    content: PageContent<'_>,
) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title>\
         <style>\
         body{{font-family:sans-serif;margin:2em}}\
         .cards{{display:flex;gap:1em}}\
         .card{{display:flex;flex-direction:column;width:180px}}\
         .card img{{width:180px;height:180px;object-fit:cover}}\
         .banner{{background:#fff3cd;padding:.5em}}\
         .error{{color:#b00020}}\
         .notice{{color:#666;font-size:.8em}}\
         </style></head><body><h1>{PAGE_TITLE}</h1>"
    );

    if let Some(banner) = banner {
        let _ = write!(out, "<p class=\"banner\">{}</p>", escape_html(banner));
    }

    out.push_str(
        "<form method=\"get\" action=\"/\">\
         <label for=\"song\">Type or select a song from the dropdown</label> \
         <select id=\"song\" name=\"song\">",
    );
    for title in titles {
        let escaped = escape_html(title);
        let marker = if selected == Some(title) {
            " selected"
        } else {
            ""
        };
        let _ = write!(out, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }
    out.push_str("</select> <button type=\"submit\">Show Recommendation</button></form>");

    match content {
        PageContent::Empty => {}
        PageContent::Error(message) => {
            let _ = write!(out, "<p class=\"error\">{}</p>", escape_html(message));
        }
        PageContent::Cards(cards) => {
            out.push_str("<div class=\"cards\">");
            for card in cards {
                render_card(&mut out, card);
            }
            out.push_str("</div>");
        }
    }

    out.push_str("</body></html>");
    out
}
