//! GET /song/:id/

use axum::{
    extract::{Path, State},
    response::Html,
};

use super::layout::{hot_comment, html_escape, path_escape, picture, shell};
use crate::error::{PageError, PageResult};
use crate::procedures;
use crate::AppState;

pub async fn song_page(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> PageResult<Html<String>> {
    let db = &state.db;

    let details = procedures::show_song_details(db, &song_id).await?;
    let Some(song) = details.first() else {
        return Err(PageError::NotFound("Song".to_string()));
    };

    let pic = procedures::show_song_pic(db, &song_id).await?;
    let lyrics = procedures::show_song_lyrics(db, &song_id).await?;
    let cmt = procedures::show_song_cmt(db, &song_id).await?;

    let artists: Vec<String> = details
        .iter()
        .filter_map(|d| match (&d.artist_id, &d.artist_name) {
            (Some(id), Some(name)) => Some(format!(
                r#"<a href="/artist/{}/">{}</a>"#,
                path_escape(id),
                html_escape(name)
            )),
            _ => None,
        })
        .collect();

    let lyrics_html = match lyrics.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            format!("<pre class=\"lyrics\">{}</pre>", html_escape(text))
        }
        _ => r#"<p class="empty">暂无歌词</p>"#.to_string(),
    };

    let body = format!(
        r#"<section class="song">
    {pic}
    <h1>{name}</h1>
    <p>演唱者: {artists}</p>
    <p>所属专辑: <a href="/album/{album_link}/">{album}</a></p>
</section>
{cmt}
<h3>歌词</h3>
{lyrics}"#,
        pic = picture(pic.as_deref(), &song.album_name),
        name = html_escape(&song.song_name),
        artists = artists.join(" / "),
        album_link = path_escape(&song.album_id),
        album = html_escape(&song.album_name),
        cmt = hot_comment(cmt.as_ref()),
        lyrics = lyrics_html,
    );

    Ok(Html(shell(&song.song_name, &body)))
}
