//! GET /genre/:id/

use axum::{
    extract::{Path, State},
    response::Html,
};
use xiamiu_common::db::genres;

use super::layout::{html_escape, path_escape, shell};
use crate::error::{PageError, PageResult};
use crate::procedures;
use crate::AppState;

/// Artists listed on a genre page
const GENRE_ARTIST_LIMIT: i64 = 50;

/// Non-numeric ids are treated like unknown ones
pub async fn genre_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> PageResult<Html<String>> {
    let not_found = || PageError::NotFound("Genre".to_string());

    let genre_id: i64 = raw_id.parse().map_err(|_| not_found())?;
    let genre = procedures::show_genre(&state.db, genre_id)
        .await?
        .ok_or_else(not_found)?;

    let artists = genres::list_genre_artists(&state.db, genre_id, 0, GENRE_ARTIST_LIMIT).await?;
    let artist_items: String = artists
        .iter()
        .map(|a| {
            format!(
                "    <li><a href=\"/artist/{}/\">{}</a></li>\n",
                path_escape(&a.artist_id),
                html_escape(&a.name)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>{name}</h1>
<p>{info}</p>
<h3>艺人</h3>
<ul>
{artists}</ul>"#,
        name = html_escape(&genre.name),
        info = html_escape(&genre.info),
        artists = artist_items,
    );

    Ok(Html(shell(&genre.name, &body)))
}
