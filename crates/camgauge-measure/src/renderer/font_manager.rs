use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::{point as rt_point, Font, Scale};
use std::{collections::HashMap, fs, sync::OnceLock};

/// Average advance of a glyph relative to the font size, used only if the
/// bundled font fails to parse.
const FALLBACK_ADVANCE: f32 = 0.55;

/// DejaVu Sans Mono, compiled into the binary so labels render on hosts
/// without any installed fonts.
pub fn default_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font_data = include_bytes!("../../../../assets/fonts/dejavu/DejaVuSansMono.ttf");
        let font = Font::try_from_bytes(font_data as &[u8]);
        if font.is_none() {
            tracing::error!("Bundled label font is invalid; labels render as boxes only");
        }
        font
    })
    .as_ref()
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Font for measurement labels.
///
/// `family` names an installed font that overrides the bundled one; an
/// unknown family falls back to the bundled font.
pub fn label_font(family: Option<&str>) -> Option<&'static Font<'static>> {
    family.and_then(system_font).or_else(default_font)
}

fn system_font(family: &str) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let mut cache = CACHE.get_or_init(Default::default).lock();
    if let Some(font) = cache.get(family) {
        return *font;
    }

    let loaded: Option<&'static Font<'static>> =
        load_font_from_system(family).map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        tracing::warn!("Font family '{}' not found; using the bundled font", family);
    }
    cache.insert(family.to_string(), loaded);
    loaded
}

fn load_font_from_system(family: &str) -> Option<Font<'static>> {
    let families = [match family.trim() {
        "" | "Sans" => Family::SansSerif,
        "Serif" => Family::Serif,
        "Monospace" => Family::Monospace,
        other => Family::Name(other),
    }];
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    let id = db().query(&query)?;
    let face = db().face(id)?;
    let index = face.index;
    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, index)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), index)
        }
    }
}

/// Width and height in pixels of `text` at `size`.
///
/// Without a font the width is estimated from the character count.
pub fn measure_text(font: Option<&Font<'_>>, text: &str, size: f32) -> (f32, f32) {
    let Some(font) = font else {
        return (text.chars().count() as f32 * size * FALLBACK_ADVANCE, size);
    };
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, rt_point(0.0, v_metrics.ascent))
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .fold(0.0f32, f32::max);
    (width.ceil(), (v_metrics.ascent - v_metrics.descent).ceil())
}
