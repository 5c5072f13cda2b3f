pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, file, header, outline, section, success, warn};
pub use table::{entity_table, stats_table, EntityRow, TableBuilder};
pub use theme::{theme, Theme};
