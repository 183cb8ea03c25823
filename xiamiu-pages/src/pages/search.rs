//! Search form and the three by-name result pages
//!
//! A query that matches nothing (or is blank) renders the bare form.

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::debug;

use super::layout::{html_escape, path_escape, picture, shell};
use crate::error::PageResult;
use crate::procedures::{self, AlbumHit, ArtistHit, SongHit};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ArtistQuery {
    #[serde(rename = "artistQuery", default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    #[serde(rename = "albumQuery", default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SongQuery {
    #[serde(rename = "songQuery", default)]
    pub query: String,
}

fn search_forms() -> &'static str {
    r#"<h1>搜索</h1>
<form method="post" action="/search/artist/">
    <input type="text" name="artistQuery" placeholder="艺人">
    <button type="submit">搜艺人</button>
</form>
<form method="post" action="/search/album/">
    <input type="text" name="albumQuery" placeholder="专辑">
    <button type="submit">搜专辑</button>
</form>
<form method="post" action="/search/song/">
    <input type="text" name="songQuery" placeholder="歌曲">
    <button type="submit">搜歌曲</button>
</form>"#
}

fn render(results: Option<String>) -> Html<String> {
    let body = match results {
        Some(results) => format!("{}\n<h3>搜索结果</h3>\n{}", search_forms(), results),
        None => search_forms().to_string(),
    };
    Html(shell("搜索", &body))
}

fn artist_results(hits: &[ArtistHit]) -> String {
    let rows: String = hits
        .iter()
        .map(|h| {
            format!(
                "    <tr><td>{}</td><td><a href=\"/artist/{}/\">{}</a></td><td>{}</td></tr>\n",
                picture(h.pic_address.as_deref(), &h.artist_name),
                path_escape(&h.artist_id),
                html_escape(&h.artist_name),
                html_escape(&h.reign)
            )
        })
        .collect();
    format!("<table class=\"artist-results\">\n{}</table>", rows)
}

fn album_results(hits: &[AlbumHit]) -> String {
    let rows: String = hits
        .iter()
        .map(|h| {
            format!(
                "    <tr><td>{}</td><td><a href=\"/album/{}/\">{}</a></td><td><a href=\"/artist/{}/\">{}</a></td><td>{}</td><td>{}</td></tr>\n",
                picture(h.pic_address.as_deref(), &h.album_name),
                path_escape(&h.album_id),
                html_escape(&h.album_name),
                path_escape(&h.artist_id),
                html_escape(&h.artist_name),
                h.star,
                h.release_date
            )
        })
        .collect();
    format!("<table class=\"album-results\">\n{}</table>", rows)
}

fn song_results(hits: &[SongHit]) -> String {
    let rows: String = hits
        .iter()
        .map(|h| {
            let artist = match (&h.artist_id, &h.artist_name) {
                (Some(id), Some(name)) => format!(
                    "<a href=\"/artist/{}/\">{}</a>",
                    path_escape(id),
                    html_escape(name)
                ),
                _ => "-".to_string(),
            };
            format!(
                "    <tr><td>{}</td><td><a href=\"/song/{}/\">{}</a></td><td>{}</td><td><a href=\"/album/{}/\">{}</a></td></tr>\n",
                picture(h.pic_address.as_deref(), &h.album_name),
                path_escape(&h.song_id),
                html_escape(&h.song_name),
                artist,
                path_escape(&h.album_id),
                html_escape(&h.album_name)
            )
        })
        .collect();
    format!("<table class=\"song-results\">\n{}</table>", rows)
}

/// GET /search/
pub async fn search_page() -> Html<String> {
    render(None)
}

/// POST /search/artist/
pub async fn search_artist(
    State(state): State<AppState>,
    Form(form): Form<ArtistQuery>,
) -> PageResult<Html<String>> {
    let query = form.query.trim();
    if query.is_empty() {
        return Ok(render(None));
    }
    let hits = procedures::search_artist_by_name(&state.db, query).await?;
    debug!("Artist search '{}': {} hits", query, hits.len());
    Ok(render((!hits.is_empty()).then(|| artist_results(&hits))))
}

/// POST /search/album/
pub async fn search_album(
    State(state): State<AppState>,
    Form(form): Form<AlbumQuery>,
) -> PageResult<Html<String>> {
    let query = form.query.trim();
    if query.is_empty() {
        return Ok(render(None));
    }
    let hits = procedures::search_album_by_name(&state.db, query).await?;
    debug!("Album search '{}': {} hits", query, hits.len());
    Ok(render((!hits.is_empty()).then(|| album_results(&hits))))
}

/// POST /search/song/
pub async fn search_song(
    State(state): State<AppState>,
    Form(form): Form<SongQuery>,
) -> PageResult<Html<String>> {
    let query = form.query.trim();
    if query.is_empty() {
        return Ok(render(None));
    }
    let hits = procedures::search_song_by_name(&state.db, query).await?;
    debug!("Song search '{}': {} hits", query, hits.len());
    Ok(render((!hits.is_empty()).then(|| song_results(&hits))))
}
