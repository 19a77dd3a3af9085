//! Typeface loading
//!
//! Fonts are parsed once per [`FontSource`] and leaked for the life of the
//! process, so every worker can hold a `&'static Font`. Failed loads are cached
//! too; asking again for a missing font returns the same error without
//! touching the disk.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::Font;
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    sync::{Mutex, OnceLock},
};
use trackforge_core::{AssetError, FontSource};

type FontResult = Result<&'static Font<'static>, AssetError>;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Font database loaded with {} faces", db.len());
        db
    })
}

/// Families known to the system font database, sorted
pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Load (or fetch from cache) the font behind `source`
pub fn load_font(source: &FontSource) -> FontResult {
    static CACHE: OnceLock<Mutex<HashMap<FontSource, FontResult>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(cached) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(source) {
        return cached.clone();
    }

    let result = match source {
        FontSource::File { path } => load_font_file(path),
        FontSource::System { family } => load_font_from_system(family),
    }
    .map(|font| -> &'static Font<'static> { Box::leak(Box::new(font)) })
    .map_err(|reason| AssetError::FontUnavailable {
        font: source.to_string(),
        reason,
    });

    match &result {
        Ok(_) => tracing::info!("Loaded {}", source),
        Err(e) => tracing::warn!("{}", e),
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(source.clone(), result.clone());
    result
}

/// Load a font on the blocking pool
pub async fn load_font_async(source: FontSource) -> FontResult {
    let description = source.to_string();
    tokio::task::spawn_blocking(move || load_font(&source))
        .await
        .unwrap_or_else(|e| {
            Err(AssetError::FontUnavailable {
                font: description,
                reason: format!("font loader panicked: {e}"),
            })
        })
}

fn parse(bytes: Vec<u8>) -> Result<Font<'static>, String> {
    Font::try_from_vec(bytes).ok_or_else(|| "not a TrueType/OpenType font".to_string())
}

fn load_font_file(path: &Path) -> Result<Font<'static>, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    parse(bytes)
}

fn load_font_from_system(family: &str) -> Result<Font<'static>, String> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db()
        .query(&query)
        .ok_or_else(|| "no matching face installed".to_string())?;
    let face = db()
        .face(id)
        .ok_or_else(|| "face vanished from database".to_string())?;

    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => load_font_file(path),
        fontdb::Source::Binary(bytes) => parse(bytes.as_ref().as_ref().to_vec()),
    }
}
