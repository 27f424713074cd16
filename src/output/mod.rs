pub mod export;
pub mod formatter;
pub mod theme;

pub use export::{default_export_name, save_export, write_matrix_csv, write_roster_csv};
pub use formatter::{
    format_aid_stats, format_breakdown, format_matrix_table, format_matrix_tsv,
    format_orphan_table, format_orphan_tsv, format_roster_table, format_roster_tsv, format_stats,
    should_use_colors,
};
