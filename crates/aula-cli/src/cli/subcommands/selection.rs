use clap::Subcommand;

/// Subject selection commands for the logged-in student.
#[derive(Clone, Debug, Subcommand)]
pub enum SelectionCommands {
    /// Show the catalog, the draft selection, and the credit summary.
    Show,
    /// Add or remove a subject from the draft selection.
    Toggle { subject_id: String },
    /// Persist the draft selection atomically.
    Save,
    /// Discard the draft and re-pull the persisted selection.
    Refresh,
}
