pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod key;
pub mod keyboard;
pub mod layout;
pub mod quantize;
pub mod render;
pub mod sheet;
pub mod view;

pub use api::{convert_bytes, convert_file, convert_song, convert_str, output_path_for};
pub use config::{ResourceConfig, Resources};
pub use error::*;
pub use key::{parse_key, KeySlot};
pub use keyboard::{LayoutName, LayoutSet};
pub use layout::{assemble, ChordRole, SheetLayout, SongStats};
pub use quantize::{quantize, Interval, Note, Quantized};
pub use render::to_html;
pub use sheet::{decode_song, load_song, parse_song, Song};
pub use view::{LayoutChange, ViewState};
