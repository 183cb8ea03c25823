//! GET /album/:id/

use axum::{
    extract::{Path, State},
    response::Html,
};

use super::layout::{hot_comment, html_escape, path_escape, picture, shell, star_glyphs};
use crate::error::{PageError, PageResult};
use crate::procedures;
use crate::AppState;

pub async fn album_page(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> PageResult<Html<String>> {
    let db = &state.db;

    let details = procedures::show_album_details(db, &album_id).await?;
    let Some(album) = details.first() else {
        return Err(PageError::NotFound("Album".to_string()));
    };

    let pic = procedures::show_album_pic(db, &album_id).await?;
    let info = procedures::show_album_info(db, &album_id).await?;
    let cmt = procedures::show_album_cmt(db, &album_id).await?;
    let songs = procedures::show_album_songlist(db, &album_id).await?;

    let genres: Vec<String> = details
        .iter()
        .filter_map(|d| match (d.genre_id, &d.genre_name) {
            (Some(id), Some(name)) => Some(format!(
                r#"<a href="/genre/{}/">{}</a>"#,
                id,
                html_escape(name)
            )),
            _ => None,
        })
        .collect();

    let listen_date = album
        .listen_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

    let song_rows: String = songs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                r#"        <tr><td>{}</td><td><a href="/song/{}/">{}</a></td><td class="stars">{}</td></tr>
"#,
                i + 1,
                path_escape(&s.song_id),
                html_escape(&s.song_name),
                star_glyphs(s.star)
            )
        })
        .collect();

    let body = format!(
        r#"<section class="album">
    {pic}
    <h1>{name}</h1>
    <p>艺人: <a href="/artist/{artist_link}/">{artist}</a></p>
    <p>语种: {lan}</p>
    <p>唱片公司: {label}</p>
    <p>发行时间: {release}</p>
    <p>专辑类别: {category}</p>
    <p>专辑风格: {genres}</p>
    <p>评分: {star}</p>
    <p>收听时间: {listen}</p>
    <p>{info}</p>
</section>
{cmt}
<h3>曲目</h3>
<table>
    <tr><th>#</th><th>歌曲</th><th>评分</th></tr>
{song_rows}</table>"#,
        pic = picture(pic.as_deref(), &album.album_name),
        name = html_escape(&album.album_name),
        artist_link = path_escape(&album.artist_id),
        artist = html_escape(&album.artist_name),
        lan = html_escape(&album.album_lan),
        label = html_escape(&album.record_label),
        release = album.release_date,
        category = html_escape(&album.album_category),
        genres = genres.join(" / "),
        star = album.star,
        listen = listen_date,
        info = html_escape(info.as_deref().unwrap_or_default()),
        cmt = hot_comment(cmt.as_ref()),
        song_rows = song_rows,
    );

    Ok(Html(shell(&album.album_name, &body)))
}
