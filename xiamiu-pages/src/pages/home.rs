//! GET /

use axum::{extract::State, response::Html};
use xiamiu_common::db::genres;

use super::layout::{html_escape, shell};
use crate::error::PageResult;
use crate::AppState;

pub async fn home_page(State(state): State<AppState>) -> PageResult<Html<String>> {
    let all_genres = genres::list_genres(&state.db, 0, 100).await?;

    let genre_links: String = all_genres
        .iter()
        .map(|g| {
            format!(
                "    <li><a href=\"/genre/{}/\">{}</a></li>\n",
                g.id,
                html_escape(&g.name)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>虾米音乐</h1>
<p><a href="/search/">搜索艺人、专辑和歌曲</a></p>
<h3>风格</h3>
<ul class="genres">
{}</ul>"#,
        genre_links
    );

    Ok(Html(shell("首页", &body)))
}
