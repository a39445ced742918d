// GPA Ledger - Core Library
// Exposes all modules for use in the CLI, terminal UI, and tests

pub mod config;
pub mod grades;
pub mod ledger;
pub mod logging;
pub mod standing;
pub mod storage;
pub mod theme;
pub mod transcript;

// Re-export commonly used types
pub use config::Config;
pub use grades::{label_for_points, CreditHours, Grade, GradeError};
pub use ledger::{CourseRecord, Ledger};
pub use logging::{init_logging, LogTarget};
pub use standing::{format_average, GpaTier};
pub use storage::{
    load_ledger, load_theme, save_ledger, save_theme,
    KeyValueStore, MemoryStore, SqliteStore,
    COURSES_KEY, THEME_KEY,
};
pub use theme::{Palette, Theme};
pub use transcript::{export_csv, import_csv, import_into};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
