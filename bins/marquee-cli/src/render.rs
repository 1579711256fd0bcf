// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Terminal rendering.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use marquee_app_core::config::ConfigStore;
use marquee_app_core::favorites::{FavoritesStore, RemoteFavorites};
use marquee_client::tmdb::{image_url, Credits, ImageSize, MovieDetails, MoviePage, ReviewPage};

const TOP_CAST: usize = 5;
const REVIEW_PREVIEW: usize = 3;
const REVIEW_CHARS: usize = 240;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

fn heart(favorite: bool) -> &'static str {
    if favorite {
        "♥"
    } else {
        ""
    }
}

pub(crate) fn movie_page<R, S>(
    out: &mut impl Write,
    page: &MoviePage,
    favs: &FavoritesStore<R, S>,
) -> io::Result<()>
where
    R: RemoteFavorites,
    S: ConfigStore + Send,
{
    let mut t = table(&["", "ID", "Title", "Year", "Rating"]);
    for movie in &page.results {
        t.add_row(vec![
            heart(favs.is_favorite(movie.id)).to_owned(),
            movie.id.to_string(),
            movie.title.clone(),
            movie.year().unwrap_or("").to_owned(),
            rating(movie.vote_average),
        ]);
    }
    writeln!(out, "{t}")?;
    match page.next_page() {
        Some(next) => writeln!(
            out,
            "Page {} of {} ({} results). Next: --page {next}",
            page.page, page.total_pages, page.total_results
        ),
        None => writeln!(
            out,
            "Page {} of {} ({} results).",
            page.page, page.total_pages, page.total_results
        ),
    }
}

pub(crate) fn movie(
    out: &mut impl Write,
    details: &MovieDetails,
    credits: &Credits,
    reviews: &ReviewPage,
    favorite: bool,
) -> io::Result<()> {
    let m = &details.movie;
    match m.year() {
        Some(year) => writeln!(out, "{} ({year})", m.title)?,
        None => writeln!(out, "{}", m.title)?,
    }
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        writeln!(out, "\"{tagline}\"")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", m.overview)?;
    writeln!(out)?;
    writeln!(
        out,
        "Rating:   {} ({} votes)",
        rating(m.vote_average),
        m.vote_count
    )?;
    if let Some(runtime) = details.runtime {
        writeln!(out, "Runtime:  {runtime} minutes")?;
    }
    writeln!(out, "Genres:   {}", details.genre_names())?;
    let directors: Vec<_> = credits.directors().collect();
    if !directors.is_empty() {
        writeln!(out, "Director: {}", directors.join(", "))?;
    }
    writeln!(out, "Poster:   {}", image_url(m.poster_path.as_deref(), ImageSize::W500))?;
    writeln!(out, "Favorite: {}", if favorite { "yes" } else { "no" })?;

    if !credits.cast.is_empty() {
        writeln!(out)?;
        let mut t = table(&["Actor", "Character"]);
        for member in credits.cast.iter().take(TOP_CAST) {
            t.add_row(vec![member.name.clone(), member.character.clone()]);
        }
        writeln!(out, "{t}")?;
    }

    if !reviews.results.is_empty() {
        writeln!(out)?;
        writeln!(out, "Reviews ({}):", reviews.total_results)?;
        for review in reviews.results.iter().take(REVIEW_PREVIEW) {
            let text: String = review.content.chars().take(REVIEW_CHARS).collect();
            let ellipsis = if review.content.chars().count() > REVIEW_CHARS {
                "…"
            } else {
                ""
            };
            writeln!(out, "- {}: {text}{ellipsis}", review.author)?;
        }
    }
    Ok(())
}

pub(crate) fn favorites(out: &mut impl Write, details: &[MovieDetails]) -> io::Result<()> {
    let mut t = table(&["ID", "Title", "Year", "Runtime", "Genres"]);
    for d in details {
        t.add_row(vec![
            d.movie.id.to_string(),
            d.movie.title.clone(),
            d.movie.year().unwrap_or("").to_owned(),
            d.runtime.map(|r| format!("{r} min")).unwrap_or_default(),
            d.genre_names(),
        ]);
    }
    writeln!(out, "{t}")
}

/// One line: count, backend mode, ids.
pub(crate) fn summary<R, S>(out: &mut impl Write, favs: &FavoritesStore<R, S>) -> io::Result<()>
where
    R: RemoteFavorites,
    S: ConfigStore + Send,
{
    let ids: Vec<String> = favs.favorites().iter().map(ToString::to_string).collect();
    writeln!(
        out,
        "{} favorite(s) [{}]: {}",
        ids.len(),
        favs.mode(),
        ids.join(", ")
    )
}
