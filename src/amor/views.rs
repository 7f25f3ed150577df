//! Views of the amor site.
//!
//! List pages return deferred templates; the rest render immediately.

use super::PageContext;
use super::content::{self, DIARY, PLAYLISTS, PROPOSAL_QUESTION};
use super::templates;
use crate::view::{self, Request, Response, ViewError};

pub fn home(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    Ok(view::html(templates::home(ctx)))
}

pub fn playlists(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    let ctx = ctx.clone();
    Ok(view::template(move || Ok(templates::playlists(&ctx, PLAYLISTS))))
}

pub fn diary(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    let ctx = ctx.clone();
    Ok(view::template(move || Ok(templates::diary(&ctx, DIARY))))
}

/// `/diary/<slug>/`
pub fn diary_entry(ctx: &PageContext, request: &Request) -> Result<Response, ViewError> {
    let path = view::request_path(request);
    let slug = path
        .strip_prefix("/diary/")
        .map(|rest| rest.trim_end_matches('/'))
        .unwrap_or_default();
    let entry =
        content::diary_entry(slug).ok_or_else(|| ViewError::NotFound(path.clone()))?;
    Ok(view::html(templates::diary_entry(ctx, entry)))
}

pub fn proposal(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    Ok(view::html(templates::proposal(ctx, PROPOSAL_QUESTION)))
}

pub fn admin_index(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    Ok(view::html(templates::admin(ctx, "Administración")))
}

pub fn admin_login(ctx: &PageContext, _request: &Request) -> Result<Response, ViewError> {
    Ok(view::html(templates::admin(ctx, "Iniciar sesión")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext {
            title: "Mimili".to_string(),
            language: "es".to_string(),
            static_url: "/static/".to_string(),
        }
    }

    fn body(response: Response) -> String {
        let response = view::render(response).unwrap();
        String::from_utf8(view::content(response, "/").unwrap()).unwrap()
    }

    #[test]
    fn list_views_are_deferred() {
        let req = view::get("/playlists/").unwrap();
        assert!(!playlists(&ctx(), &req).unwrap().body().is_rendered());
        assert!(!diary(&ctx(), &req).unwrap().body().is_rendered());
        assert!(home(&ctx(), &req).unwrap().body().is_rendered());
    }

    #[test]
    fn diary_entry_resolves_slug_from_path() {
        let req = view::get("/diary/la-playa/").unwrap();
        let html = body(diary_entry(&ctx(), &req).unwrap());
        assert!(html.contains("La playa"));
        assert!(html.contains("<title>La playa · Mimili</title>"));
    }

    #[test]
    fn diary_entry_unknown_slug_is_not_found() {
        let req = view::get("/diary/nope/").unwrap();
        assert!(matches!(
            diary_entry(&ctx(), &req),
            Err(ViewError::NotFound(p)) if p == "/diary/nope/"
        ));
    }

    #[test]
    fn proposal_asks_the_question() {
        let req = view::get("/proposal/").unwrap();
        assert!(body(proposal(&ctx(), &req).unwrap()).contains(PROPOSAL_QUESTION));
    }
}
