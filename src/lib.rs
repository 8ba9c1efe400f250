// Library exports for glyphrun
//
// # Locking
//
// The engine is shared across host threads. Two lock levels exist:
//
//   - the handle table's `parking_lot::RwLock`, held only while a handle is
//     looked up, inserted or removed;
//   - one `parking_lot::Mutex` per font, held for the whole of an operation
//     on that font.
//
// No code path takes the table lock while holding a font lock, so the two
// can never deadlock against each other.

pub mod engine;
pub mod error;
pub mod handle_table;
mod loaded_font;

pub use engine::Engine;
pub use error::{EngineError, Result};
pub use handle_table::FontHandle;

pub use glyphrun_atlas::{AtlasLocation, AtlasPageRef, GlyphBbox, GlyphId};
pub use glyphrun_config::FontOptions;
pub use glyphrun_fonts::{
    Annotation, Annotations, FeatureSet, FontMetrics, GlyphRecord, ScriptTag, ShapingResult,
    TextDirection,
};

/// Crate version, for hosts that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
