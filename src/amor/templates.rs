//! Maud page templates.

use super::PageContext;
use super::content::{DiaryEntry, Playlist};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const NAV: &[(&str, &str)] = &[
    ("/playlists/", "Playlists"),
    ("/diary/", "Diario"),
    ("/proposal/", "Propuesta"),
];

/// Renders the base HTML document structure
pub fn base_document(ctx: &PageContext, title: &str, current: &str, content: Markup) -> Markup {
    let page_title = if title.is_empty() {
        ctx.title.clone()
    } else {
        format!("{title} · {}", ctx.title)
    };
    html! {
        (DOCTYPE)
        html lang=(ctx.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                link rel="stylesheet" href={ (ctx.static_url) "css/amor.css" };
                link rel="icon" href={ (ctx.static_url) "img/heart.svg" };
            }
            body {
                (site_header(ctx, current))
                main { (content) }
            }
        }
    }
}

/// Renders the site header with the navigation links
fn site_header(ctx: &PageContext, current: &str) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (ctx.title) }
            nav.site-nav {
                ul {
                    @for (href, label) in NAV {
                        li class=[(current == *href).then_some("current")] {
                            a href=(href) { (label) }
                        }
                    }
                }
            }
        }
    }
}

/// Markdown to HTML.
pub fn markdown(body: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(body));
    PreEscaped(out)
}

pub fn home(ctx: &PageContext) -> Markup {
    let content = html! {
        section.hero {
            h1 { "Hola, mi amor" }
            p { "Un rincón pequeño de internet para nosotros dos." }
            a.cta href="/diary/" { "Leer el diario" }
        }
    };
    base_document(ctx, "", "/", content)
}

pub fn playlists(ctx: &PageContext, playlists: &[Playlist]) -> Markup {
    let content = html! {
        h1 { "Playlists" }
        @for playlist in playlists {
            article.playlist {
                h2 { (playlist.name) }
                p.mood { (playlist.mood) }
                ol {
                    @for song in playlist.songs {
                        li { (song.title) " · " span.artist { (song.artist) } }
                    }
                }
            }
        }
    };
    base_document(ctx, "Playlists", "/playlists/", content)
}

fn diary_article(entry: &DiaryEntry) -> Markup {
    html! {
        article.diary-entry id=(entry.slug) {
            header {
                h2 { (entry.title) }
                time datetime=(entry.date) { (entry.date) }
            }
            (markdown(entry.body))
        }
    }
}

pub fn diary(ctx: &PageContext, entries: &[DiaryEntry]) -> Markup {
    let content = html! {
        h1 { "Diario" }
        @for entry in entries {
            (diary_article(entry))
        }
    };
    base_document(ctx, "Diario", "/diary/", content)
}

pub fn diary_entry(ctx: &PageContext, entry: &DiaryEntry) -> Markup {
    base_document(ctx, entry.title, "/diary/", diary_article(entry))
}

pub fn proposal(ctx: &PageContext, question: &str) -> Markup {
    let content = html! {
        section.proposal {
            h1 { (question) }
            div.answers {
                a.answer.yes href="/" { "Sí" }
                a.answer.also-yes href="/" { "¡Claro que sí!" }
            }
        }
    };
    base_document(ctx, "Propuesta", "/proposal/", content)
}

pub fn admin(ctx: &PageContext, heading: &str) -> Markup {
    let content = html! {
        h1 { (heading) }
        p { "Solo para administradores." }
    };
    base_document(ctx, heading, "", content)
}
