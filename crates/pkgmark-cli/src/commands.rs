// Command handlers - the search view and the favorites view, minus the browser
//
// Handlers write to any `io::Write` so tests can capture output.

use anyhow::Context;
use pkgmark_core::{search::search_with_favorites, FavoritesStore, SearchHit, SearchProvider};
use pkgmark_storage::KeyValueStore;
use std::io::{BufRead, Write};

pub async fn search<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    provider: &dyn SearchProvider,
    query: &str,
    limit: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let current = favorites.get_favorites()?;
    let hits = search_with_favorites(provider, query, limit, &current)
        .await
        .with_context(|| format!("Search for {:?} failed", query))?;

    if hits.is_empty() {
        writeln!(out, "No packages found for {:?}", query)?;
        return Ok(());
    }

    for hit in &hits {
        write_hit(out, hit)?;
    }

    Ok(())
}

fn write_hit(out: &mut impl Write, hit: &SearchHit) -> std::io::Result<()> {
    let marker = if hit.is_favorite { "★" } else { " " };
    let pkg = &hit.package;

    match &pkg.version {
        Some(version) => writeln!(out, "{} {} ({})", marker, pkg.name, version)?,
        None => writeln!(out, "{} {}", marker, pkg.name)?,
    }
    if let Some(description) = &pkg.description {
        writeln!(out, "    {}", description)?;
    }
    writeln!(out, "    {}", pkg.url())
}

pub fn add<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    name: &str,
    reason: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let name = checked_name(name)?;

    if favorites.add_to_favorites(name, reason)? {
        writeln!(out, "Added {} to favorites", name)?;
    } else {
        writeln!(
            out,
            "{} is already a favorite; reason unchanged (use `pkgmark reason set` to edit it)",
            name
        )?;
    }

    Ok(())
}

pub fn list<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    with_reasons: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let entries = favorites.favorites_with_reasons()?;

    if entries.is_empty() {
        writeln!(out, "No favorites yet.")?;
        return Ok(());
    }

    for entry in entries {
        match (with_reasons, entry.reason.as_deref()) {
            (true, Some(reason)) if !reason.is_empty() => {
                writeln!(out, "{} - {}", entry.name, reason)?
            }
            _ => writeln!(out, "{}", entry.name)?,
        }
    }

    Ok(())
}

/// Unfavorite `name`, asking on `input` first unless `assume_yes`
pub fn remove<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    name: &str,
    keep_reason: bool,
    assume_yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let name = checked_name(name)?;

    if !favorites.is_favorite(name)? {
        writeln!(out, "{} is not a favorite", name)?;
        return Ok(());
    }

    if !assume_yes && !confirm(input, out, &format!("Remove {} from favorites?", name))? {
        writeln!(out, "Kept {}", name)?;
        return Ok(());
    }

    if keep_reason {
        favorites.remove_from_favorites(name)?;
    } else {
        favorites.forget(name)?;
    }
    writeln!(out, "Removed {} from favorites", name)?;

    Ok(())
}

pub fn show_reason<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    name: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let name = checked_name(name)?;
    match favorites.get_favorite_reason(name)? {
        Some(reason) => writeln!(out, "{}", reason)?,
        None => writeln!(out, "No reason recorded for {}", name)?,
    }
    Ok(())
}

pub fn set_reason<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    name: &str,
    reason: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let name = checked_name(name)?;
    favorites.add_favorite_reason(name, reason)?;

    if favorites.is_favorite(name)? {
        writeln!(out, "Updated reason for {}", name)?;
    } else {
        writeln!(out, "Saved reason for {} (not currently a favorite)", name)?;
    }
    Ok(())
}

pub fn clear_reason<S: KeyValueStore>(
    favorites: &FavoritesStore<S>,
    name: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let name = checked_name(name)?;
    favorites.remove_favorite_reason(name)?;
    writeln!(out, "Cleared reason for {}", name)?;
    Ok(())
}

// y/N prompt. Anything but an explicit yes, EOF included, declines.
fn confirm(
    input: &mut impl BufRead,
    out: &mut impl Write,
    question: &str,
) -> anyhow::Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn checked_name(name: &str) -> anyhow::Result<&str> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "Package name cannot be empty");
    Ok(name)
}
