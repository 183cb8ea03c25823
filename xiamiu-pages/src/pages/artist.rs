//! GET /artist/:id/

use axum::{
    extract::{Path, State},
    response::Html,
};

use super::layout::{hot_comment, html_escape, path_escape, picture, shell};
use crate::error::{PageError, PageResult};
use crate::procedures;
use crate::AppState;

pub async fn artist_page(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> PageResult<Html<String>> {
    let db = &state.db;

    let details = procedures::show_artist_details(db, &artist_id).await?;
    let Some(first) = details.first() else {
        return Err(PageError::NotFound("Artist".to_string()));
    };

    let pic = procedures::show_artist_pic(db, &artist_id).await?;
    let info = procedures::show_artist_info(db, &artist_id).await?;
    let cmt = procedures::show_artist_cmt(db, &artist_id).await?;
    let albums = procedures::show_artist_albumlist(db, &artist_id).await?;

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

    let album_rows: String = albums
        .iter()
        .map(|a| {
            format!(
                r#"        <tr><td><a href="/album/{}/">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>
"#,
                path_escape(&a.album_id),
                html_escape(&a.album_name),
                a.release_date,
                html_escape(&a.album_category),
                a.star
            )
        })
        .collect();

    let body = format!(
        r#"<section class="artist">
    {pic}
    <h1>{name}</h1>
    <p>地区: {reign}</p>
    <p>风格: {genres}</p>
    <p>{info}</p>
</section>
{cmt}
<h3>专辑</h3>
<table>
    <tr><th>专辑</th><th>发行时间</th><th>类型</th><th>评分</th></tr>
{album_rows}</table>"#,
        pic = picture(pic.as_deref(), &first.artist_name),
        name = html_escape(&first.artist_name),
        reign = html_escape(&first.reign),
        genres = genres.join(" / "),
        info = html_escape(info.as_deref().unwrap_or_default()),
        cmt = hot_comment(cmt.as_ref()),
        album_rows = album_rows,
    );

    Ok(Html(shell(&first.artist_name, &body)))
}
